//! The 2A03 register file.

use crate::cpu::flags::Status;

/// Stack page base; S indexes into $0100-$01FF.
pub const STACK_BASE: u16 = 0x0100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegisterFile {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    /// Stack pointer.
    pub s: u8,
    pub pc: u16,
    pub p: Status,
}

impl RegisterFile {
    /// Address the next push will write to.
    pub fn stack_addr(&self) -> u16 {
        STACK_BASE | self.s as u16
    }
}
