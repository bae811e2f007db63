//! Per-opcode dispatch table.
//!
//! Every opcode maps to an addressing mode, a destination kind and an
//! [`Operation`]. Official 6502 opcodes are all present, plus the stable
//! undocumented ones NES software relies on (LAX, SAX, DCP, ISC, SLO, RLA,
//! SRE, RRA, the multi-byte NOPs and SBC $EB). JAM and the unstable
//! opcodes have no entry and decode as unknown.
//!
//! Reference: [6502 instructions](https://www.nesdev.org/wiki/Instruction_reference),
//! [unofficial opcodes](https://www.nesdev.org/wiki/CPU_unofficial_opcodes).

/// How an instruction finds its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    /// Zero page ("DP").
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    /// Signed 8-bit branch displacement.
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// JMP ($nnnn), with the page-wrap bug.
    Indirect,
    /// ($nn,X)
    IndexedIndirect,
    /// ($nn),Y
    IndirectIndexed,
}

impl AddressingMode {
    /// Total instruction size in bytes, opcode included.
    pub const fn width(self) -> u8 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 1,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::Relative
            | AddressingMode::IndexedIndirect
            | AddressingMode::IndirectIndexed => 2,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 3,
        }
    }
}

/// Where an instruction's result lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Registers or flags only.
    Register,
    /// Written back to the effective address.
    Memory,
    /// Sets PC itself; the engine skips the width advance.
    ControlFlow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    // Loads and stores
    Lda,
    Ldx,
    Ldy,
    Lax,
    Sta,
    Stx,
    Sty,
    Sax,
    // Transfers
    Tax,
    Tay,
    Txa,
    Tya,
    Tsx,
    Txs,
    // Stack
    Pha,
    Php,
    Pla,
    Plp,
    // Logic and arithmetic
    And,
    Ora,
    Eor,
    Bit,
    Adc,
    Sbc,
    Cmp,
    Cpx,
    Cpy,
    // Increments
    Inc,
    Dec,
    Inx,
    Iny,
    Dex,
    Dey,
    // Shifts
    Asl,
    Lsr,
    Rol,
    Ror,
    // Undocumented read-modify-write combos
    Slo,
    Rla,
    Sre,
    Rra,
    Dcp,
    Isc,
    // Flags
    Clc,
    Sec,
    Cli,
    Sei,
    Cld,
    Sed,
    Clv,
    Nop,
    // Control flow
    Jmp,
    Jsr,
    Rts,
    Rti,
    Brk,
    Bcc,
    Bcs,
    Beq,
    Bne,
    Bmi,
    Bpl,
    Bvc,
    Bvs,
}

impl Operation {
    /// Stores never look at the old memory contents.
    pub const fn reads_operand(self) -> bool {
        !matches!(
            self,
            Operation::Sta | Operation::Stx | Operation::Sty | Operation::Sax
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchEntry {
    pub mode: AddressingMode,
    pub destination: Destination,
    pub operation: Operation,
}

const fn reg(operation: Operation, mode: AddressingMode) -> Option<DispatchEntry> {
    Some(DispatchEntry {
        mode,
        destination: Destination::Register,
        operation,
    })
}

const fn mem(operation: Operation, mode: AddressingMode) -> Option<DispatchEntry> {
    Some(DispatchEntry {
        mode,
        destination: Destination::Memory,
        operation,
    })
}

const fn flow(operation: Operation, mode: AddressingMode) -> Option<DispatchEntry> {
    Some(DispatchEntry {
        mode,
        destination: Destination::ControlFlow,
        operation,
    })
}

/// Look up an opcode. `None` marks an illegal or unimplemented opcode.
pub const fn lookup(opcode: u8) -> Option<DispatchEntry> {
    use AddressingMode::*;
    use Operation::*;

    match opcode {
        0xA9 => reg(Lda, Immediate),
        0xA5 => reg(Lda, ZeroPage),
        0xB5 => reg(Lda, ZeroPageX),
        0xAD => reg(Lda, Absolute),
        0xBD => reg(Lda, AbsoluteX),
        0xB9 => reg(Lda, AbsoluteY),
        0xA1 => reg(Lda, IndexedIndirect),
        0xB1 => reg(Lda, IndirectIndexed),
        0xA2 => reg(Ldx, Immediate),
        0xA6 => reg(Ldx, ZeroPage),
        0xB6 => reg(Ldx, ZeroPageY),
        0xAE => reg(Ldx, Absolute),
        0xBE => reg(Ldx, AbsoluteY),
        0xA0 => reg(Ldy, Immediate),
        0xA4 => reg(Ldy, ZeroPage),
        0xB4 => reg(Ldy, ZeroPageX),
        0xAC => reg(Ldy, Absolute),
        0xBC => reg(Ldy, AbsoluteX),
        0xA7 => reg(Lax, ZeroPage),
        0xB7 => reg(Lax, ZeroPageY),
        0xAF => reg(Lax, Absolute),
        0xBF => reg(Lax, AbsoluteY),
        0xA3 => reg(Lax, IndexedIndirect),
        0xB3 => reg(Lax, IndirectIndexed),

        0x85 => mem(Sta, ZeroPage),
        0x95 => mem(Sta, ZeroPageX),
        0x8D => mem(Sta, Absolute),
        0x9D => mem(Sta, AbsoluteX),
        0x99 => mem(Sta, AbsoluteY),
        0x81 => mem(Sta, IndexedIndirect),
        0x91 => mem(Sta, IndirectIndexed),
        0x86 => mem(Stx, ZeroPage),
        0x96 => mem(Stx, ZeroPageY),
        0x8E => mem(Stx, Absolute),
        0x84 => mem(Sty, ZeroPage),
        0x94 => mem(Sty, ZeroPageX),
        0x8C => mem(Sty, Absolute),
        0x87 => mem(Sax, ZeroPage),
        0x97 => mem(Sax, ZeroPageY),
        0x8F => mem(Sax, Absolute),
        0x83 => mem(Sax, IndexedIndirect),

        0xAA => reg(Tax, Implied),
        0xA8 => reg(Tay, Implied),
        0x8A => reg(Txa, Implied),
        0x98 => reg(Tya, Implied),
        0xBA => reg(Tsx, Implied),
        0x9A => reg(Txs, Implied),

        0x48 => reg(Pha, Implied),
        0x08 => reg(Php, Implied),
        0x68 => reg(Pla, Implied),
        0x28 => reg(Plp, Implied),

        0x29 => reg(And, Immediate),
        0x25 => reg(And, ZeroPage),
        0x35 => reg(And, ZeroPageX),
        0x2D => reg(And, Absolute),
        0x3D => reg(And, AbsoluteX),
        0x39 => reg(And, AbsoluteY),
        0x21 => reg(And, IndexedIndirect),
        0x31 => reg(And, IndirectIndexed),
        0x09 => reg(Ora, Immediate),
        0x05 => reg(Ora, ZeroPage),
        0x15 => reg(Ora, ZeroPageX),
        0x0D => reg(Ora, Absolute),
        0x1D => reg(Ora, AbsoluteX),
        0x19 => reg(Ora, AbsoluteY),
        0x01 => reg(Ora, IndexedIndirect),
        0x11 => reg(Ora, IndirectIndexed),
        0x49 => reg(Eor, Immediate),
        0x45 => reg(Eor, ZeroPage),
        0x55 => reg(Eor, ZeroPageX),
        0x4D => reg(Eor, Absolute),
        0x5D => reg(Eor, AbsoluteX),
        0x59 => reg(Eor, AbsoluteY),
        0x41 => reg(Eor, IndexedIndirect),
        0x51 => reg(Eor, IndirectIndexed),
        0x24 => reg(Bit, ZeroPage),
        0x2C => reg(Bit, Absolute),

        0x69 => reg(Adc, Immediate),
        0x65 => reg(Adc, ZeroPage),
        0x75 => reg(Adc, ZeroPageX),
        0x6D => reg(Adc, Absolute),
        0x7D => reg(Adc, AbsoluteX),
        0x79 => reg(Adc, AbsoluteY),
        0x61 => reg(Adc, IndexedIndirect),
        0x71 => reg(Adc, IndirectIndexed),
        0xE9 | 0xEB => reg(Sbc, Immediate),
        0xE5 => reg(Sbc, ZeroPage),
        0xF5 => reg(Sbc, ZeroPageX),
        0xED => reg(Sbc, Absolute),
        0xFD => reg(Sbc, AbsoluteX),
        0xF9 => reg(Sbc, AbsoluteY),
        0xE1 => reg(Sbc, IndexedIndirect),
        0xF1 => reg(Sbc, IndirectIndexed),

        0xC9 => reg(Cmp, Immediate),
        0xC5 => reg(Cmp, ZeroPage),
        0xD5 => reg(Cmp, ZeroPageX),
        0xCD => reg(Cmp, Absolute),
        0xDD => reg(Cmp, AbsoluteX),
        0xD9 => reg(Cmp, AbsoluteY),
        0xC1 => reg(Cmp, IndexedIndirect),
        0xD1 => reg(Cmp, IndirectIndexed),
        0xE0 => reg(Cpx, Immediate),
        0xE4 => reg(Cpx, ZeroPage),
        0xEC => reg(Cpx, Absolute),
        0xC0 => reg(Cpy, Immediate),
        0xC4 => reg(Cpy, ZeroPage),
        0xCC => reg(Cpy, Absolute),

        0xE6 => mem(Inc, ZeroPage),
        0xF6 => mem(Inc, ZeroPageX),
        0xEE => mem(Inc, Absolute),
        0xFE => mem(Inc, AbsoluteX),
        0xC6 => mem(Dec, ZeroPage),
        0xD6 => mem(Dec, ZeroPageX),
        0xCE => mem(Dec, Absolute),
        0xDE => mem(Dec, AbsoluteX),
        0xE8 => reg(Inx, Implied),
        0xC8 => reg(Iny, Implied),
        0xCA => reg(Dex, Implied),
        0x88 => reg(Dey, Implied),

        0x0A => reg(Asl, Accumulator),
        0x06 => mem(Asl, ZeroPage),
        0x16 => mem(Asl, ZeroPageX),
        0x0E => mem(Asl, Absolute),
        0x1E => mem(Asl, AbsoluteX),
        0x4A => reg(Lsr, Accumulator),
        0x46 => mem(Lsr, ZeroPage),
        0x56 => mem(Lsr, ZeroPageX),
        0x4E => mem(Lsr, Absolute),
        0x5E => mem(Lsr, AbsoluteX),
        0x2A => reg(Rol, Accumulator),
        0x26 => mem(Rol, ZeroPage),
        0x36 => mem(Rol, ZeroPageX),
        0x2E => mem(Rol, Absolute),
        0x3E => mem(Rol, AbsoluteX),
        0x6A => reg(Ror, Accumulator),
        0x66 => mem(Ror, ZeroPage),
        0x76 => mem(Ror, ZeroPageX),
        0x6E => mem(Ror, Absolute),
        0x7E => mem(Ror, AbsoluteX),

        0x07 => mem(Slo, ZeroPage),
        0x17 => mem(Slo, ZeroPageX),
        0x0F => mem(Slo, Absolute),
        0x1F => mem(Slo, AbsoluteX),
        0x1B => mem(Slo, AbsoluteY),
        0x03 => mem(Slo, IndexedIndirect),
        0x13 => mem(Slo, IndirectIndexed),
        0x27 => mem(Rla, ZeroPage),
        0x37 => mem(Rla, ZeroPageX),
        0x2F => mem(Rla, Absolute),
        0x3F => mem(Rla, AbsoluteX),
        0x3B => mem(Rla, AbsoluteY),
        0x23 => mem(Rla, IndexedIndirect),
        0x33 => mem(Rla, IndirectIndexed),
        0x47 => mem(Sre, ZeroPage),
        0x57 => mem(Sre, ZeroPageX),
        0x4F => mem(Sre, Absolute),
        0x5F => mem(Sre, AbsoluteX),
        0x5B => mem(Sre, AbsoluteY),
        0x43 => mem(Sre, IndexedIndirect),
        0x53 => mem(Sre, IndirectIndexed),
        0x67 => mem(Rra, ZeroPage),
        0x77 => mem(Rra, ZeroPageX),
        0x6F => mem(Rra, Absolute),
        0x7F => mem(Rra, AbsoluteX),
        0x7B => mem(Rra, AbsoluteY),
        0x63 => mem(Rra, IndexedIndirect),
        0x73 => mem(Rra, IndirectIndexed),
        0xC7 => mem(Dcp, ZeroPage),
        0xD7 => mem(Dcp, ZeroPageX),
        0xCF => mem(Dcp, Absolute),
        0xDF => mem(Dcp, AbsoluteX),
        0xDB => mem(Dcp, AbsoluteY),
        0xC3 => mem(Dcp, IndexedIndirect),
        0xD3 => mem(Dcp, IndirectIndexed),
        0xE7 => mem(Isc, ZeroPage),
        0xF7 => mem(Isc, ZeroPageX),
        0xEF => mem(Isc, Absolute),
        0xFF => mem(Isc, AbsoluteX),
        0xFB => mem(Isc, AbsoluteY),
        0xE3 => mem(Isc, IndexedIndirect),
        0xF3 => mem(Isc, IndirectIndexed),

        0x18 => reg(Clc, Implied),
        0x38 => reg(Sec, Implied),
        0x58 => reg(Cli, Implied),
        0x78 => reg(Sei, Implied),
        0xD8 => reg(Cld, Implied),
        0xF8 => reg(Sed, Implied),
        0xB8 => reg(Clv, Implied),

        0xEA | 0x1A | 0x3A | 0x5A | 0x7A | 0xDA | 0xFA => reg(Nop, Implied),
        0x80 | 0x82 | 0x89 | 0xC2 | 0xE2 => reg(Nop, Immediate),
        0x04 | 0x44 | 0x64 => reg(Nop, ZeroPage),
        0x14 | 0x34 | 0x54 | 0x74 | 0xD4 | 0xF4 => reg(Nop, ZeroPageX),
        0x0C => reg(Nop, Absolute),
        0x1C | 0x3C | 0x5C | 0x7C | 0xDC | 0xFC => reg(Nop, AbsoluteX),

        0x4C => flow(Jmp, Absolute),
        0x6C => flow(Jmp, Indirect),
        0x20 => flow(Jsr, Absolute),
        0x60 => flow(Rts, Implied),
        0x40 => flow(Rti, Implied),
        0x00 => flow(Brk, Implied),
        0x90 => flow(Bcc, Relative),
        0xB0 => flow(Bcs, Relative),
        0xF0 => flow(Beq, Relative),
        0xD0 => flow(Bne, Relative),
        0x30 => flow(Bmi, Relative),
        0x10 => flow(Bpl, Relative),
        0x50 => flow(Bvc, Relative),
        0x70 => flow(Bvs, Relative),

        // JAM, ANC, ALR, ARR, ANE, LXA, SBX, SHA, SHX, SHY, TAS, LAS
        _ => None,
    }
}
