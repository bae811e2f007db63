//! Flat 64KB backing store for the CPU address space.
//!
//! Storage knows nothing about mirroring; every access arrives already
//! translated by the [MTU](crate::bus::Mtu). Until [`Storage::power_on`] has
//! succeeded, reads return zero and writes are dropped.

use crate::error::{AllocError, Error};

/// Size of the backing buffer: the whole 16-bit address space.
pub const STORAGE_SIZE: usize = 0x10000;

#[derive(Default)]
pub struct Storage {
    mem: Option<Box<[u8]>>,
}

impl Storage {
    /// Create an unpowered store. No memory is reserved yet.
    pub fn new() -> Self {
        Self { mem: None }
    }

    /// Reserve and zero-fill the buffer. A second call keeps the existing
    /// contents and succeeds.
    pub fn power_on(&mut self) -> Result<(), AllocError> {
        if self.mem.is_some() {
            return Ok(());
        }

        let mut buf = Vec::new();
        buf.try_reserve_exact(STORAGE_SIZE)
            .map_err(|_| AllocError { size: STORAGE_SIZE })?;
        buf.resize(STORAGE_SIZE, 0);

        self.mem = Some(buf.into_boxed_slice());
        Ok(())
    }

    /// Release the buffer. Later accesses behave as before power-on.
    pub fn shutdown(&mut self) {
        self.mem = None;
    }

    pub fn is_powered_on(&self) -> bool {
        self.mem.is_some()
    }

    pub fn read(&self, offset: u16) -> u8 {
        match &self.mem {
            Some(mem) => mem[offset as usize],
            None => 0,
        }
    }

    pub fn write(&mut self, offset: u16, data: u8) {
        if let Some(mem) = &mut self.mem {
            mem[offset as usize] = data;
        }
    }

    /// Bulk copy used by the cartridge loader.
    pub fn load(&mut self, offset: u16, bytes: &[u8]) -> Result<(), Error> {
        let start = offset as usize;
        let end = start + bytes.len();
        if end > STORAGE_SIZE {
            return Err(Error::LoadOutOfRange {
                offset,
                len: bytes.len(),
            });
        }

        let mem = self.mem.as_mut().ok_or(Error::NotPoweredOn)?;
        mem[start..end].copy_from_slice(bytes);
        Ok(())
    }
}
