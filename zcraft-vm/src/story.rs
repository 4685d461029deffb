//! # Story Buffer
//!
//! The single owner of a story image. Its length is fixed at construction,
//! and every access is bounds checked against it. The header, codec, cursor
//! and translator are all views over this buffer; none of them copies it.

use crate::error::{self, Result};
use crate::header::{Header, Version, HEADER_SIZE};
use std::fmt;

/// An owned, fixed-length story image together with its parsed header
#[derive(Clone, PartialEq, Eq)]
pub struct StoryBuffer {
    bytes: Vec<u8>,
    header: Header,
}

impl StoryBuffer {
    /// Take ownership of a story image.
    ///
    /// Fails with `UnsupportedVersion` if the version byte is not defined,
    /// or `MemoryFault` if the image is empty.
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        let header = Header::parse(&bytes)?;
        Ok(Self { bytes, header })
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for a constructed buffer, which holds at least the version byte
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Header parsed at construction
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Format version from the header
    pub fn version(&self) -> Version {
        self.header.version()
    }

    /// The whole image, read only
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Give the image back, e.g. to hand it to a save routine
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Verify that `width` bytes starting at `offset` lie inside the buffer.
    /// Returns the exclusive end offset.
    pub(crate) fn check(&self, offset: usize, width: usize) -> Result<usize> {
        offset
            .checked_add(width)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| error::memory_fault(offset, width, self.bytes.len()))
    }

    /// Read one byte
    pub fn get_byte(&self, offset: usize) -> Result<u8> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or_else(|| error::memory_fault(offset, 1, self.bytes.len()).with_operation("story::get_byte"))
    }

    /// Write one byte. Does not consult memory regions.
    pub fn set_byte(&mut self, offset: usize, value: u8) -> Result<()> {
        let len = self.bytes.len();
        let slot = self
            .bytes
            .get_mut(offset)
            .ok_or_else(|| error::memory_fault(offset, 1, len).with_operation("story::set_byte"))?;
        *slot = value;
        Ok(())
    }

    /// Borrow `len` bytes starting at `offset`
    pub fn slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let end = self
            .check(offset, len)
            .map_err(|e| e.with_operation("story::slice"))?;
        Ok(&self.bytes[offset..end])
    }

    pub(crate) fn slice_mut(&mut self, offset: usize, len: usize) -> Result<&mut [u8]> {
        let end = self.check(offset, len)?;
        Ok(&mut self.bytes[offset..end])
    }

    /// Sum of every byte after the header up to the declared file length,
    /// modulo 0x10000. Compare with the header checksum to verify a story.
    pub fn checksum(&self) -> u16 {
        let declared = self
            .header
            .layout()
            .map(|l| l.file_length)
            .filter(|&n| n > 0)
            .unwrap_or(self.bytes.len());
        let end = declared.min(self.bytes.len());
        self.bytes
            .get(HEADER_SIZE..end)
            .unwrap_or(&[])
            .iter()
            .fold(0u16, |sum, &b| sum.wrapping_add(b as u16))
    }
}

impl fmt::Debug for StoryBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoryBuffer")
            .field("version", &self.header.version())
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::fixtures::StoryImage;

    fn ten_bytes() -> StoryBuffer {
        let mut bytes = vec![0u8; 10];
        bytes[0] = 3;
        StoryBuffer::new(bytes).unwrap()
    }

    #[test]
    fn test_get_set_byte() {
        let mut story = ten_bytes();

        story.set_byte(9, 0xAB).unwrap();
        assert_eq!(story.get_byte(9).unwrap(), 0xAB);
        assert_eq!(story.get_byte(0).unwrap(), 3);
        assert_eq!(story.len(), 10);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut story = ten_bytes();

        let result = story.get_byte(10);
        assert!(result.is_err_and(|e| e.kind() == ErrorKind::MemoryFault));

        let result = story.set_byte(10, 1);
        assert!(result.is_err_and(|e| e.kind() == ErrorKind::MemoryFault));
        assert_eq!(story.len(), 10);

        let result = story.get_byte(usize::MAX);
        assert!(result.is_err_and(|e| e.kind() == ErrorKind::MemoryFault));
    }

    #[test]
    fn test_rejects_bad_version() {
        let mut bytes = vec![0u8; 10];
        bytes[0] = 9;
        let result = StoryBuffer::new(bytes);
        assert!(result.is_err_and(|e| e.kind() == ErrorKind::UnsupportedVersion));

        let result = StoryBuffer::new(Vec::new());
        assert!(result.is_err_and(|e| e.kind() == ErrorKind::MemoryFault));
    }

    #[test]
    fn test_slice() {
        let story = StoryBuffer::new(StoryImage::new(3, 128).build()).unwrap();

        assert_eq!(story.slice(0x12, 6).unwrap(), b"840726");
        assert_eq!(story.slice(128, 0).unwrap(), &[] as &[u8]);
        assert!(story.slice(127, 2).is_err_and(|e| e.kind() == ErrorKind::MemoryFault));
        assert!(story.slice(1, usize::MAX).is_err());
    }

    #[test]
    fn test_checksum() {
        let mut image = StoryImage::new(3, 256).build();
        image[0x40] = 0xFF;
        image[0xFF] = 0x02;
        let story = StoryBuffer::new(image).unwrap();
        assert_eq!(story.checksum(), 0x101);
    }

    #[test]
    fn test_checksum_without_layout() {
        let story = ten_bytes();
        assert_eq!(story.checksum(), 0);
    }

    #[test]
    fn test_debug_is_compact() {
        let story = ten_bytes();
        let debug = format!("{:?}", story);
        assert!(debug.contains("V3"));
        assert!(debug.contains("len: 10"));
    }
}
