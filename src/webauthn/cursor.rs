//! Sequential reader over authenticator byte buffers
//!
//! Every multi-byte integer in the `WebAuthn` authenticator-data layout is
//! big-endian; the cursor centralizes the byte assembly so offset arithmetic
//! never leaks into the parsers.

use super::errors::DecodeError;

/// Cursor over a borrowed byte buffer.
#[derive(Debug)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes not yet consumed
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Non-throwing guard for the optional regions of the layout
    #[must_use]
    pub fn has_at_least(&self, n: usize) -> bool {
        self.remaining() >= n
    }

    /// Current position from the start of the buffer
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read the next `n` bytes and advance.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::OutOfRange` if fewer than `n` bytes remain.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if !self.has_at_least(n) {
            return Err(DecodeError::OutOfRange {
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Look at the next byte without advancing.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::OutOfRange` at the end of the buffer.
    pub fn peek_byte(&self) -> Result<u8, DecodeError> {
        if !self.has_at_least(1) {
            return Err(DecodeError::OutOfRange {
                needed: 1,
                remaining: 0,
            });
        }
        Ok(self.data[self.pos])
    }

    /// Read a single byte and advance.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::OutOfRange` at the end of the buffer.
    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(1)?[0])
    }

    /// Read a big-endian u16 and advance.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::OutOfRange` if fewer than 2 bytes remain.
    pub fn read_u16_be(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Read a big-endian u32 and advance.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::OutOfRange` if fewer than 4 bytes remain.
    pub fn read_u32_be(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Consume and return everything left in the buffer.
    pub fn rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }
}
