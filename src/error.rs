//! Error types shared by the decoder, storage, engine and cartridge loader.

use thiserror::Error;

/// Why an instruction could not be decoded.
///
/// Both variants stop the CPU; `TruncatedBuffer` is recoverable for callers
/// that can supply more bytes (see [`crate::cpu::decode::instruction_width`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown opcode ${opcode:02X}")]
    UnknownOpcode { opcode: u8 },
    #[error("opcode ${opcode:02X} needs {needed} bytes, only {available} available")]
    TruncatedBuffer {
        opcode: u8,
        needed: u8,
        available: usize,
    },
}

/// The 64KB backing buffer could not be reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("failed to allocate {size} bytes of backing storage")]
pub struct AllocError {
    pub size: usize,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("cpu is not powered on")]
    NotPoweredOn,
    #[error(transparent)]
    Alloc(#[from] AllocError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("load of {len} bytes at ${offset:04X} runs past the end of the address space")]
    LoadOutOfRange { offset: u16, len: usize },
}

/// Failures while reading an iNES image.
#[derive(Debug, Error)]
pub enum CartridgeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing iNES magic")]
    BadMagic,
    #[error("image has no PRG ROM")]
    EmptyPrg,
    #[error("unsupported PRG size of {0} x 16KB (NROM only)")]
    UnsupportedPrgSize(u8),
    #[error("image truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error(transparent)]
    Core(#[from] Error),
}
