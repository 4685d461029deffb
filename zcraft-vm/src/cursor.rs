//! # Fetch Cursor
//!
//! The instruction pointer: a single offset into the story that opcode
//! decoding consumes sequentially. Reads advance it by exactly the number of
//! bytes consumed; a read that faults leaves it where it was.

use crate::error::Result;
use crate::story::StoryBuffer;
use serde::{Deserialize, Serialize};

/// Next byte to fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cursor {
    offset: usize,
}

impl Cursor {
    /// Cursor at `offset`
    pub fn new(offset: usize) -> Self {
        Self { offset }
    }

    /// Offset of the next byte to fetch
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Jump. The new offset is not checked until the next read.
    pub fn set(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Skip `n` bytes without reading them
    pub fn advance(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n);
    }

    /// Byte at the cursor, without advancing
    pub fn peek_byte(&self, story: &StoryBuffer) -> Result<u8> {
        story
            .get_byte(self.offset)
            .map_err(|e| e.with_operation("cursor::peek_byte"))
    }

    /// Word at the cursor, without advancing
    pub fn peek_u16(&self, story: &StoryBuffer) -> Result<u16> {
        story
            .get16(self.offset)
            .map_err(|e| e.with_operation("cursor::peek_u16"))
    }

    /// Byte at the cursor, then advance by 1
    pub fn read_byte(&mut self, story: &StoryBuffer) -> Result<u8> {
        let value = story
            .get_byte(self.offset)
            .map_err(|e| e.with_operation("cursor::read_byte"))?;
        self.offset += 1;
        Ok(value)
    }

    /// Big-endian word at the cursor, then advance by 2
    pub fn read_u16(&mut self, story: &StoryBuffer) -> Result<u16> {
        let value = story
            .get16(self.offset)
            .map_err(|e| e.with_operation("cursor::read_u16"))?;
        self.offset += 2;
        Ok(value)
    }

    /// Big-endian double word at the cursor, then advance by 4
    pub fn read_u32(&mut self, story: &StoryBuffer) -> Result<u32> {
        let value = story
            .get32(self.offset)
            .map_err(|e| e.with_operation("cursor::read_u32"))?;
        self.offset += 4;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn story(bytes: &[u8]) -> StoryBuffer {
        StoryBuffer::new(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_sequential_words() {
        let story = story(&[0x01, 0x02, 0x03, 0x04]);
        let mut cursor = Cursor::new(0);

        assert_eq!(cursor.read_u16(&story).unwrap(), 0x0102);
        assert_eq!(cursor.offset(), 2);
        assert_eq!(cursor.read_u16(&story).unwrap(), 0x0304);
        assert_eq!(cursor.offset(), 4);

        let result = cursor.read_byte(&story);
        assert!(result.is_err_and(|e| e.kind() == ErrorKind::MemoryFault));
        assert_eq!(cursor.offset(), 4);
    }

    #[test]
    fn test_read_byte_advances_by_one() {
        let story = story(&[0x03, 0x10, 0x20, 0x30, 0x40]);
        let mut cursor = Cursor::new(1);

        let bytes: Vec<u8> = (0..4).map(|_| cursor.read_byte(&story).unwrap()).collect();
        assert_eq!(bytes, vec![0x10, 0x20, 0x30, 0x40]);
        assert_eq!(cursor.offset(), 5);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let story = story(&[0x03, 0xAA, 0xBB]);
        let cursor = Cursor::new(1);

        for _ in 0..3 {
            assert_eq!(cursor.peek_byte(&story).unwrap(), 0xAA);
        }
        assert_eq!(cursor.peek_u16(&story).unwrap(), 0xAABB);
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn test_partial_word_does_not_advance() {
        let story = story(&[0x03, 0x00, 0x7F]);
        let mut cursor = Cursor::new(2);

        let result = cursor.read_u16(&story);
        assert!(result.is_err_and(|e| e.kind() == ErrorKind::MemoryFault));
        assert_eq!(cursor.offset(), 2);

        let result = cursor.read_u32(&story);
        assert!(result.is_err());
        assert_eq!(cursor.offset(), 2);

        assert_eq!(cursor.read_byte(&story).unwrap(), 0x7F);
    }

    #[test]
    fn test_jump() {
        let story = story(&[0x03, 0x11, 0x22, 0x33]);
        let mut cursor = Cursor::default();

        cursor.set(3);
        assert_eq!(cursor.read_byte(&story).unwrap(), 0x33);

        cursor.set(100);
        assert!(cursor.peek_byte(&story).is_err());
        assert_eq!(cursor.offset(), 100);

        cursor.set(1);
        cursor.advance(1);
        assert_eq!(cursor.read_byte(&story).unwrap(), 0x22);
    }

    #[test]
    fn test_read_u32() {
        let story = story(&[0x05, 0xCA, 0xFE, 0xBA, 0xBE]);
        let mut cursor = Cursor::new(1);
        assert_eq!(cursor.read_u32(&story).unwrap(), 0xCAFE_BABE);
        assert_eq!(cursor.offset(), 5);
    }
}
