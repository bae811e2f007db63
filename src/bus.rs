//! Memory bus and address translation for the 2A03.
//!
//! The CPU never touches [`Storage`] directly: every access goes through a
//! [`Bus`], and the production bus is the [`Mtu`], which folds the mirrored
//! regions of the [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map)
//! onto the flat 64KB store.

use crate::{error::AllocError, storage::Storage};

/// Internal RAM: 2KB mirrored four times.
pub const SYSTEM_RAM_END: u16 = 0x1FFF;
pub const SYSTEM_RAM_SIZE: u16 = 0x0800;
/// PPU I/O registers: 8 bytes mirrored through $3FFF.
pub const PPU_IO_BEGIN: u16 = 0x2000;
pub const PPU_IO_END: u16 = 0x3FFF;
/// Cartridge PRG ROM window.
pub const PRG_ROM_BEGIN: u16 = 0x8000;
pub const PRG_BANK_SIZE: u16 = 0x4000;

/// How the PRG window is wired, fixed at power-on from the cartridge's PRG size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryMode {
    /// One 16KB bank, visible at both $8000 and $C000.
    Nrom128,
    /// Two 16KB banks filling $8000-$FFFF.
    #[default]
    Nrom256,
}

/// Trait for memory-mapped access used by the CPU.
pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8);

    /// Called once by [`CPU::power_on`](crate::cpu::cpu::CPU::power_on) before
    /// any other access.
    fn power_on(&mut self, _mode: MemoryMode) -> Result<(), AllocError> {
        Ok(())
    }
}

/// Map a logical CPU address to its physical offset in storage. First match wins.
pub fn translate(addr: u16, mode: MemoryMode) -> u16 {
    match addr {
        0x0000..=SYSTEM_RAM_END => addr % SYSTEM_RAM_SIZE,
        PPU_IO_BEGIN..=PPU_IO_END => PPU_IO_BEGIN + (addr % 8),
        PRG_ROM_BEGIN..=0xFFFF if mode == MemoryMode::Nrom128 => {
            PRG_ROM_BEGIN + (addr % PRG_BANK_SIZE)
        }
        _ => addr,
    }
}

/// Memory translation unit: owns the storage and the configured memory mode.
#[derive(Default)]
pub struct Mtu {
    storage: Storage,
    mode: MemoryMode,
}

impl Mtu {
    /// Wrap a store, usually one the cartridge loader has already filled.
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            mode: MemoryMode::default(),
        }
    }

    pub fn configure(&mut self, mode: MemoryMode) {
        self.mode = mode;
    }

    pub fn mode(&self) -> MemoryMode {
        self.mode
    }

    /// Release the backing store.
    pub fn shutdown(&mut self) {
        self.storage.shutdown();
    }
}

impl Bus for Mtu {
    fn read(&mut self, addr: u16) -> u8 {
        self.storage.read(translate(addr, self.mode))
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.storage.write(translate(addr, self.mode), data);
    }

    fn power_on(&mut self, mode: MemoryMode) -> Result<(), AllocError> {
        self.storage.power_on()?;
        self.configure(mode);
        Ok(())
    }
}
