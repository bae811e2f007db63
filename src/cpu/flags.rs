//! 6502 processor status register (P) flag bits.

pub const FLAG_CARRY: u8 = 1 << 0;
pub const FLAG_ZERO: u8 = 1 << 1;
pub const FLAG_INTERRUPT_DISABLE: u8 = 1 << 2;
pub const FLAG_DECIMAL: u8 = 1 << 3;  // Stored but ignored by the 2A03 ALU
pub const FLAG_BREAK: u8 = 1 << 4;    // Set in the pushed copy by BRK / PHP
pub const FLAG_UNUSED: u8 = 1 << 5;   // Kept verbatim across push/pop
pub const FLAG_OVERFLOW: u8 = 1 << 6;
pub const FLAG_NEGATIVE: u8 = 1 << 7;

/// P as a single byte with stable bit positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Status(pub u8);

macro_rules! flag_accessors {
    ($($get:ident, $set:ident => $bit:expr;)*) => {
        $(
            pub fn $get(self) -> bool {
                self.0 & $bit != 0
            }

            pub fn $set(&mut self, on: bool) {
                self.set(on, $bit);
            }
        )*
    };
}

impl Status {
    flag_accessors! {
        carry, set_carry => FLAG_CARRY;
        zero, set_zero => FLAG_ZERO;
        interrupt_disable, set_interrupt_disable => FLAG_INTERRUPT_DISABLE;
        decimal, set_decimal => FLAG_DECIMAL;
        brk, set_brk => FLAG_BREAK;
        unused, set_unused => FLAG_UNUSED;
        overflow, set_overflow => FLAG_OVERFLOW;
        negative, set_negative => FLAG_NEGATIVE;
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    fn set(&mut self, on: bool, bit: u8) {
        if on {
            self.0 |= bit;
        } else {
            self.0 &= !bit;
        }
    }

    pub fn update_zero_and_negative(&mut self, value: u8) {
        self.set_zero(value == 0);
        self.set_negative(value & 0x80 != 0);
    }

    /// Merge a byte pulled off the stack: break and unused keep their current values.
    pub fn restore(&mut self, pulled: u8) {
        const KEPT: u8 = FLAG_BREAK | FLAG_UNUSED;
        self.0 = (self.0 & KEPT) | (pulled & !KEPT);
    }
}
