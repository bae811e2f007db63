//! Instruction decoder: raw bytes to `{opcode, size, operand}`.
//!
//! Pure functions with no access to memory; the CPU and any disassembler
//! feed them whatever bytes they have fetched.

use crate::{
    cpu::dispatch::{DispatchEntry, lookup},
    error::DecodeError,
};

/// Longest 2A03 instruction, opcode included.
pub const MAX_INSTRUCTION_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionDescription {
    pub opcode: u8,
    /// 1..=3 bytes.
    pub size: u8,
    /// Little-endian operand; 0 for one-byte instructions.
    pub operand: u16,
    /// Table row the opcode decoded to.
    pub entry: DispatchEntry,
}

/// Bytes an instruction occupies. Unknown opcodes count as one byte so a
/// caller scanning a stream can step past them.
pub fn instruction_width(opcode: u8) -> u8 {
    lookup(opcode).map_or(1, |entry| entry.mode.width())
}

pub fn decode(bytes: &[u8]) -> Result<InstructionDescription, DecodeError> {
    let Some(&opcode) = bytes.first() else {
        return Err(DecodeError::TruncatedBuffer {
            opcode: 0,
            needed: 1,
            available: 0,
        });
    };

    let entry = lookup(opcode).ok_or(DecodeError::UnknownOpcode { opcode })?;
    let size = entry.mode.width();

    if bytes.len() < size as usize {
        return Err(DecodeError::TruncatedBuffer {
            opcode,
            needed: size,
            available: bytes.len(),
        });
    }

    let operand = match size {
        2 => bytes[1] as u16,
        3 => u16::from_le_bytes([bytes[1], bytes[2]]),
        _ => 0,
    };

    Ok(InstructionDescription {
        opcode,
        size,
        operand,
        entry,
    })
}
