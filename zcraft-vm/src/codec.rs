//! # Word Codec
//!
//! Big-endian 16- and 32-bit access at arbitrary byte offsets of a
//! [`StoryBuffer`]. Every byte a call would touch is bounds checked before
//! anything is read or written, so a failed call leaves the buffer as it was.
//!
//! The codec does not know about memory regions. Guarded writes go through
//! [`ExecutionContext`](crate::ExecutionContext).

use crate::error::Result;
use crate::story::StoryBuffer;

impl StoryBuffer {
    /// `(b[offset] << 8) | b[offset + 1]`
    pub fn get16(&self, offset: usize) -> Result<u16> {
        let end = self
            .check(offset, 2)
            .map_err(|e| e.with_operation("story::get16"))?;
        let word = &self.as_bytes()[offset..end];
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }

    /// Four bytes at `offset`, most significant first
    pub fn get32(&self, offset: usize) -> Result<u32> {
        let end = self
            .check(offset, 4)
            .map_err(|e| e.with_operation("story::get32"))?;
        let word = &self.as_bytes()[offset..end];
        Ok(u32::from_be_bytes([word[0], word[1], word[2], word[3]]))
    }

    /// Writes `value >> 8` at `offset` and `value & 0xFF` at `offset + 1`
    pub fn set16(&mut self, offset: usize, value: u16) -> Result<()> {
        self.slice_mut(offset, 2)
            .map_err(|e| e.with_operation("story::set16"))?
            .copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    pub fn set32(&mut self, offset: usize, value: u32) -> Result<()> {
        self.slice_mut(offset, 4)
            .map_err(|e| e.with_operation("story::set32"))?
            .copy_from_slice(&value.to_be_bytes());
        Ok(())
    }
}
