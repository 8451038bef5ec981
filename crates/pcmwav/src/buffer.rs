//! Reusable scratch space for sample conversion.

use crate::error::{WavError, WavResult};

/// Byte buffer reused across read and write calls.
///
/// Grows to the largest request seen and never shrinks. Each reader and
/// writer owns one, so no conversion call allocates once the buffer has
/// reached its working size.
#[derive(Debug, Default)]
pub struct ScratchBuffer {
    bytes: Vec<u8>,
}

impl ScratchBuffer {
    /// Creates an empty buffer. Nothing is allocated until first use.
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Returns a region of at least `min_len` bytes.
    ///
    /// The contents are whatever the previous call left behind.
    pub fn acquire(&mut self, min_len: usize) -> WavResult<&mut [u8]> {
        if min_len > self.bytes.len() {
            let additional = min_len - self.bytes.len();
            self.bytes
                .try_reserve_exact(additional)
                .map_err(|_| WavError::OutOfMemory { requested: min_len })?;
            self.bytes.resize(min_len, 0);
        }
        Ok(&mut self.bytes[..])
    }

    /// Current usable size in bytes.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }
}
