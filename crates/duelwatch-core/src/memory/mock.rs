//! In-memory fake of the target process for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::memory::ReadMemory;

/// Builder for a sparse fake address space.
#[derive(Default)]
pub struct MockMemoryBuilder {
    bytes: HashMap<u64, u8>,
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_bytes(mut self, address: u64, data: &[u8]) -> Self {
        for (i, byte) in data.iter().enumerate() {
            self.bytes.insert(address + i as u64, *byte);
        }
        self
    }

    pub fn set_u32(self, address: u64, value: u32) -> Self {
        self.set_bytes(address, &value.to_le_bytes())
    }

    pub fn set_u64(self, address: u64, value: u64) -> Self {
        self.set_bytes(address, &value.to_le_bytes())
    }

    pub fn build(self) -> MockMemoryReader {
        MockMemoryReader {
            bytes: Mutex::new(self.bytes),
            fail_remaining: Mutex::new(0),
        }
    }
}

/// Fake `ReadMemory` backed by a byte map.
///
/// Reads touching unmapped addresses fail like an invalid read against the
/// real process. Tests can rewrite values between cycles (the game mutates
/// memory under us) and inject a number of failures before reads succeed.
pub struct MockMemoryReader {
    bytes: Mutex<HashMap<u64, u8>>,
    fail_remaining: Mutex<u32>,
}

impl MockMemoryReader {
    /// Overwrite a u32 in place, as the game would between samples.
    pub fn write_u32(&self, address: u64, value: u32) {
        let mut bytes = self.bytes.lock().unwrap();
        for (i, byte) in value.to_le_bytes().iter().enumerate() {
            bytes.insert(address + i as u64, *byte);
        }
    }

    /// Overwrite a pointer in place, moving an intermediate chain link.
    pub fn write_u64(&self, address: u64, value: u64) {
        let mut bytes = self.bytes.lock().unwrap();
        for (i, byte) in value.to_le_bytes().iter().enumerate() {
            bytes.insert(address + i as u64, *byte);
        }
    }

    /// Unmap a byte range, making reads that touch it fail.
    pub fn clear(&self, address: u64, len: usize) {
        let mut bytes = self.bytes.lock().unwrap();
        for i in 0..len as u64 {
            bytes.remove(&(address + i));
        }
    }

    /// Make the next `n` reads fail before normal behavior resumes.
    pub fn fail_next_reads(&self, n: u32) {
        *self.fail_remaining.lock().unwrap() = n;
    }
}

impl ReadMemory for MockMemoryReader {
    fn read_bytes(&self, address: u64, len: usize) -> Result<Vec<u8>> {
        {
            let mut remaining = self.fail_remaining.lock().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Error::MemoryReadFailed {
                    address,
                    message: "injected failure".to_string(),
                });
            }
        }

        let bytes = self.bytes.lock().unwrap();
        let mut out = Vec::with_capacity(len);
        for i in 0..len as u64 {
            match bytes.get(&(address + i)) {
                Some(byte) => out.push(*byte),
                None => {
                    return Err(Error::MemoryReadFailed {
                        address,
                        message: "address not mapped".to_string(),
                    });
                }
            }
        }
        Ok(out)
    }
}
