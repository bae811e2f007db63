//! Effective-address computation for each addressing mode.

use crate::{
    bus::Bus,
    cpu::{dispatch::AddressingMode, registers::RegisterFile},
};

/// Compute the effective address of a decoded operand.
///
/// Implied, Accumulator, Immediate and Relative operands are not addresses;
/// for those the operand is returned unchanged and callers use it directly.
pub fn resolve<B: Bus>(
    mode: AddressingMode,
    operand: u16,
    regs: &RegisterFile,
    bus: &mut B,
) -> u16 {
    match mode {
        AddressingMode::ZeroPage | AddressingMode::Absolute => operand,
        AddressingMode::AbsoluteX => operand.wrapping_add(regs.x as u16),
        AddressingMode::AbsoluteY => operand.wrapping_add(regs.y as u16),
        AddressingMode::ZeroPageX => (operand as u8).wrapping_add(regs.x) as u16,
        AddressingMode::ZeroPageY => (operand as u8).wrapping_add(regs.y) as u16,
        AddressingMode::Indirect => {
            let lo = bus.read(operand) as u16;
            // Page-boundary bug: the high byte never carries into the next page.
            let hi_addr = (operand & 0xFF00) | (operand.wrapping_add(1) & 0x00FF);
            let hi = bus.read(hi_addr) as u16;
            (hi << 8) | lo
        }
        AddressingMode::IndexedIndirect => {
            let ptr = (operand as u8).wrapping_add(regs.x);
            zero_page_pointer(ptr, bus)
        }
        AddressingMode::IndirectIndexed => {
            let base = zero_page_pointer(operand as u8, bus);
            base.wrapping_add(regs.y as u16)
        }
        AddressingMode::Implied
        | AddressingMode::Accumulator
        | AddressingMode::Immediate
        | AddressingMode::Relative => operand,
    }
}

/// 16-bit little-endian pointer from two adjacent zero-page bytes, wrapping at $FF.
fn zero_page_pointer<B: Bus>(ptr: u8, bus: &mut B) -> u16 {
    let lo = bus.read(ptr as u16) as u16;
    let hi = bus.read(ptr.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}
