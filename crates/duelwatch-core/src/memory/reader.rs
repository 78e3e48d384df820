//! Memory read primitives over an open process handle.

use crate::error::{Error, Result};
use crate::memory::ProcessHandle;

/// Read access to another process's address space.
///
/// Implemented by [`MemoryReader`] for a live process and by the test mock.
/// `read_bytes` returns exactly `len` bytes or an error; a short read is an
/// error, never a truncated buffer.
pub trait ReadMemory {
    fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>>;

    /// Read a little-endian u32 at `address`.
    fn read_u32(&self, address: u64) -> Result<u32> {
        let bytes = self.read_bytes(address, 4)?;
        let raw: [u8; 4] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| Error::MemoryReadFailed {
                    address,
                    message: format!("short read: {} of 4 bytes", bytes.len()),
                })?;
        Ok(u32::from_le_bytes(raw))
    }

    /// Read a little-endian u64 at `address`.
    fn read_u64(&self, address: u64) -> Result<u64> {
        let bytes = self.read_bytes(address, 8)?;
        let raw: [u8; 8] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| Error::MemoryReadFailed {
                    address,
                    message: format!("short read: {} of 8 bytes", bytes.len()),
                })?;
        Ok(u64::from_le_bytes(raw))
    }
}

impl<R: ReadMemory + ?Sized> ReadMemory for &R {
    fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>> {
        (**self).read_bytes(address, len)
    }
}

/// Reads memory from a live process through its open handle.
pub struct MemoryReader<'a> {
    process: &'a ProcessHandle,
}

impl<'a> MemoryReader<'a> {
    pub fn new(process: &'a ProcessHandle) -> Self {
        Self { process }
    }
}

impl ReadMemory for MemoryReader<'_> {
    fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>> {
        self.process.read_bytes(address, len)
    }
}
