//! Nessan: a Ricoh 2A03 (NES 6502) CPU core written in Rust.
//!
//! Implements the CPU side of the NES as documented on the
//! [NESdev Wiki](https://www.nesdev.org/wiki/NES_reference_guide): instruction decoding,
//! addressing modes, the execution engine and the mirrored CPU address space.
//!
//! ## Modules (NESdev references)
//!
//! - **bus** – [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map): RAM and PPU I/O
//!   mirroring, NROM-128/256 PRG windows
//! - **cartridge** – [iNES](https://www.nesdev.org/wiki/INES) header parsing and PRG loading
//! - **cpu** – [6502](https://www.nesdev.org/wiki/CPU) / 2A03: official + stable undocumented
//!   opcodes, [status flags](https://www.nesdev.org/wiki/Status_flags)
//! - **storage** – flat 64 KiB backing store behind the bus
//! - **error** – error types for every layer

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod error;
pub mod storage;

use crate::{
    bus::Mtu,
    cartridge::cartridge::Cartridge,
    cpu::cpu::CPU,
    error::{CartridgeError, Error},
    storage::Storage,
};

/// Power on storage, install the cartridge's PRG ROM and power on the CPU.
pub fn boot(cart: &Cartridge) -> Result<CPU<Mtu>, CartridgeError> {
    let mode = cart.memory_mode()?;

    let mut storage = Storage::new();
    storage.power_on().map_err(Error::from)?;
    cart.install(&mut storage)?;

    let mut cpu = CPU::new(Mtu::new(storage));
    cpu.power_on(mode)?;
    Ok(cpu)
}
