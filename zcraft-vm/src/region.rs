//! # Memory Regions
//!
//! Dynamic memory runs from 0 up to the static base and is the only part an
//! executing story may write. Static memory follows it, and high memory
//! starts at the high base (it may overlap static memory). Both are read only
//! at run time.

use crate::error::{self, Result};
use crate::header::Header;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Dynamic,
    Static,
    High,
}

/// Region boundaries for one story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemoryMap {
    static_base: usize,
    high_base: usize,
    len: usize,
}

impl MemoryMap {
    /// Boundaries from the header. Without a header layout there is nothing
    /// to go on, so the whole buffer counts as dynamic.
    pub fn new(header: &Header, len: usize) -> Self {
        let static_base = header.static_base().unwrap_or(len).min(len);
        let high_base = header.high_base().unwrap_or(len).clamp(static_base, len);
        Self {
            static_base,
            high_base,
            len,
        }
    }

    pub fn static_base(&self) -> usize {
        self.static_base
    }

    pub fn high_base(&self) -> usize {
        self.high_base
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of dynamic memory, which is what a save captures
    pub fn dynamic_len(&self) -> usize {
        self.static_base
    }

    /// Region containing `offset`, or `None` past the end
    pub fn region_of(&self, offset: usize) -> Option<Region> {
        if offset >= self.len {
            None
        } else if offset < self.static_base {
            Some(Region::Dynamic)
        } else if offset < self.high_base {
            Some(Region::Static)
        } else {
            Some(Region::High)
        }
    }

    pub fn is_writable(&self, offset: usize) -> bool {
        self.region_of(offset) == Some(Region::Dynamic)
    }

    /// Check a write of `width` bytes at `offset`.
    ///
    /// `MemoryFault` if any byte is past the end, `ReadOnlyMemory` if any
    /// byte is outside dynamic memory.
    pub fn check_write(&self, offset: usize, width: usize) -> Result<()> {
        let end = offset
            .checked_add(width)
            .filter(|&end| end <= self.len)
            .ok_or_else(|| error::memory_fault(offset, width, self.len))?;
        if end > self.static_base {
            return Err(error::read_only(offset, self.static_base));
        }
        Ok(())
    }
}
