//! NES cartridge loading.
//!
//! - **cartridge**: Parses iNES (.nes) headers and extracts PRG ROM for installation at $8000.

pub mod cartridge;
