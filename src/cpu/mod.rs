//! 2A03 CPU: decoder, dispatch table, addressing modes and execution engine.
//!
//! Official 6502 instruction set plus the stable undocumented opcodes; no
//! decimal mode. All memory goes through the [`Bus`](crate::bus::Bus) trait.

pub mod addressing;
pub mod cpu;
pub mod decode;
pub mod dispatch;
pub mod flags;
pub mod registers;

#[cfg(test)]
mod tests;
