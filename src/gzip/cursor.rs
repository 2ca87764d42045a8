//! Forward-only cursor over the member bytes.
//!
//! The cursor tracks two numbers: the read position and the minimum buffer
//! length the fields seen so far require. Every optional section first
//! grows that bound with [`ByteCursor::require`] and only then reads, so a
//! truncated buffer fails with [`GzipError::TooShort`] before any field
//! byte past the end is touched.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{GzipError, Result};

use super::structures::MIN_MEMBER_SIZE;

pub(crate) struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
    required: usize,
}

impl<'a> ByteCursor<'a> {
    /// Starts with the 18-byte minimum member size already required.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            required: MIN_MEMBER_SIZE,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Bytes from the start of the buffer up to the cursor.
    pub fn consumed(&self) -> &'a [u8] {
        &self.data[..self.position]
    }

    /// Bytes from the cursor to the end of the buffer.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    /// Grow the required length by `n` and fail if the buffer is shorter.
    pub fn require(&mut self, n: usize) -> Result<()> {
        self.required = self.required.saturating_add(n);
        self.check()
    }

    /// Fail if the buffer is shorter than the bound accumulated so far.
    pub fn check(&self) -> Result<()> {
        if self.data.len() < self.required {
            return Err(GzipError::TooShort {
                required: self.required,
                available: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .position
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or(GzipError::TooShort {
                required: self.position.saturating_add(n),
                available: self.data.len(),
            })?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i32_le(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }
}
