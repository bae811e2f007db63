//! NES cartridge loading from iNES format (.nes files).
//!
//! Implements the [iNES](https://www.nesdev.org/wiki/INES) header: magic "NES\x1A", PRG size in
//! 16 KiB units, CHR size in 8 KiB units, flags 6/7/9. An optional 512-byte trainer sits between
//! the header and PRG ROM. Only NROM PRG layouts (16 or 32 KiB) can be mapped by the core.

use std::fs::File;
use std::io::Read;

use crate::bus::{MemoryMode, PRG_ROM_BEGIN};
use crate::error::{CartridgeError, Error};
use crate::storage::Storage;

pub const INES_MAGIC: &[u8; 4] = b"NES\x1A";
pub const HEADER_SIZE: usize = 16;
pub const TRAINER_SIZE: usize = 512;
pub const PRG_ROM_UNIT: usize = 16 * 1024;
pub const CHR_ROM_UNIT: usize = 8 * 1024;

/// Nametable mirroring wired on the board (flags 6 bit 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvSystem {
    Ntsc,
    Pal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InesHeader {
    /// PRG ROM size in 16 KiB units.
    pub prg_size: u8,
    /// CHR ROM size in 8 KiB units; 0 means the board uses CHR RAM.
    pub chr_size: u8,
    pub mirroring: Mirroring,
    pub persistent_memory: bool,
    pub trainer_present: bool,
    pub ignore_mirror_control: bool,
    pub vs_unisystem: bool,
    pub playchoice: bool,
    /// Flags 7 bits 2-3 equal 2.
    pub nes2: bool,
    pub tv_system: TvSystem,
    pub mapper: u8,
}

impl InesHeader {
    pub fn parse(bytes: &[u8; HEADER_SIZE]) -> Result<Self, CartridgeError> {
        if &bytes[0..4] != INES_MAGIC {
            return Err(CartridgeError::BadMagic);
        }

        let prg_size = bytes[4];
        if prg_size == 0 {
            return Err(CartridgeError::EmptyPrg);
        }

        let flags6 = bytes[6];
        let flags7 = bytes[7];
        let flags9 = bytes[9];

        Ok(Self {
            prg_size,
            chr_size: bytes[5],
            mirroring: if flags6 & 0x01 != 0 {
                Mirroring::Vertical
            } else {
                Mirroring::Horizontal
            },
            persistent_memory: flags6 & 0x02 != 0,
            trainer_present: flags6 & 0x04 != 0,
            ignore_mirror_control: flags6 & 0x08 != 0,
            vs_unisystem: flags7 & 0x01 != 0,
            playchoice: flags7 & 0x02 != 0,
            nes2: (flags7 >> 2) & 0b11 == 2,
            tv_system: if flags9 & 0x01 != 0 {
                TvSystem::Pal
            } else {
                TvSystem::Ntsc
            },
            mapper: (flags6 >> 4) | (flags7 & 0xF0),
        })
    }

    /// One PRG bank mirrors across the window; two fill it.
    pub fn memory_mode(&self) -> Result<MemoryMode, CartridgeError> {
        match self.prg_size {
            1 => Ok(MemoryMode::Nrom128),
            2 => Ok(MemoryMode::Nrom256),
            n => Err(CartridgeError::UnsupportedPrgSize(n)),
        }
    }

    fn prg_offset(&self) -> usize {
        if self.trainer_present {
            HEADER_SIZE + TRAINER_SIZE
        } else {
            HEADER_SIZE
        }
    }
}

/// Parsed header plus PRG ROM, ready to be copied into storage.
pub struct Cartridge {
    pub header: InesHeader,
    pub prg_rom: Vec<u8>,
}

impl Cartridge {
    /// Load an iNES file from disk.
    pub fn load(path: &str) -> Result<Self, CartridgeError> {
        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, CartridgeError> {
        let raw: &[u8; HEADER_SIZE] = data
            .get(..HEADER_SIZE)
            .and_then(|h| h.try_into().ok())
            .ok_or(CartridgeError::Truncated {
                expected: HEADER_SIZE,
                actual: data.len(),
            })?;
        let header = InesHeader::parse(raw)?;

        let prg_start = header.prg_offset();
        let prg_end = prg_start + header.prg_size as usize * PRG_ROM_UNIT;
        let prg_rom = data
            .get(prg_start..prg_end)
            .ok_or(CartridgeError::Truncated {
                expected: prg_end,
                actual: data.len(),
            })?
            .to_vec();

        log::debug!(
            "iNES header: PRG {}x16KB, CHR {}x8KB, mapper {}, {:?} mirroring, trainer: {}",
            header.prg_size,
            header.chr_size,
            header.mapper,
            header.mirroring,
            header.trainer_present
        );

        Ok(Self { header, prg_rom })
    }

    pub fn memory_mode(&self) -> Result<MemoryMode, CartridgeError> {
        self.header.memory_mode()
    }

    /// Copy PRG ROM to the cartridge base ($8000) of a powered-on store.
    pub fn install(&self, storage: &mut Storage) -> Result<(), Error> {
        storage.load(PRG_ROM_BEGIN, &self.prg_rom)
    }
}
