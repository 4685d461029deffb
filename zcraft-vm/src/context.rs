//! # Execution Context
//!
//! Everything one running story owns: the story buffer, the fetch cursor,
//! the region map and the packed-address translator. There is no global
//! machine; each session holds its own context and nothing is shared between
//! contexts, so independent sessions can live on separate threads.

use crate::address::{PackedAddress, Translator};
use crate::cursor::Cursor;
use crate::error::{self, Result};
use crate::header::Version;
use crate::region::MemoryMap;
use crate::story::StoryBuffer;
use serde::{Deserialize, Serialize};

/// Dynamic memory and cursor captured from a running story.
///
/// How a snapshot is written to disk is up to the save/restore code; this
/// type only guarantees that restoring it is all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u8,
    pub release: Option<u16>,
    pub pc: usize,
    pub dynamic: Vec<u8>,
}

/// Per-story execution state
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    story: StoryBuffer,
    cursor: Cursor,
    map: MemoryMap,
    translator: Translator,
}

impl ExecutionContext {
    /// Wrap a story with the cursor on its entry point.
    ///
    /// The entry point is the header's initial PC, unpacked as a routine
    /// address in version 6. Stories without a full header start at 0.
    pub fn new(story: StoryBuffer) -> Self {
        let translator = Translator::new(story.header());
        let entry = match story.header().initial_pc() {
            Some(pc) if story.version() == Version::V6 => translator.routine_address(pc),
            Some(pc) => pc as usize,
            None => 0,
        };
        Self::with_cursor(story, entry)
    }

    /// Wrap a story with the cursor at `pc`
    pub fn with_cursor(story: StoryBuffer, pc: usize) -> Self {
        let map = MemoryMap::new(story.header(), story.len());
        let translator = Translator::new(story.header());
        tracing::debug!(
            version = %story.version(),
            len = story.len(),
            static_base = map.static_base(),
            pc,
            "execution context ready"
        );
        Self {
            story,
            cursor: Cursor::new(pc),
            map,
            translator,
        }
    }

    pub fn story(&self) -> &StoryBuffer {
        &self.story
    }

    /// Unguarded access for collaborators that legitimately write outside
    /// dynamic memory, such as the loader patching header fields.
    pub fn story_mut(&mut self) -> &mut StoryBuffer {
        &mut self.story
    }

    pub fn into_story(self) -> StoryBuffer {
        self.story
    }

    pub fn map(&self) -> &MemoryMap {
        &self.map
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    // =========================================================================
    // Fetch
    // =========================================================================

    pub fn pc(&self) -> usize {
        self.cursor.offset()
    }

    pub fn jump(&mut self, pc: usize) {
        tracing::trace!(from = self.cursor.offset(), to = pc, "jump");
        self.cursor.set(pc);
    }

    pub fn peek_byte(&self) -> Result<u8> {
        self.cursor.peek_byte(&self.story)
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        self.cursor.read_byte(&self.story)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.cursor.read_u16(&self.story)
    }

    // =========================================================================
    // Data access
    // =========================================================================

    pub fn load_byte(&self, offset: usize) -> Result<u8> {
        self.story.get_byte(offset)
    }

    pub fn load_word(&self, offset: usize) -> Result<u16> {
        self.story.get16(offset)
    }

    /// Write a byte, refusing anything outside dynamic memory
    pub fn store_byte(&mut self, offset: usize, value: u8) -> Result<()> {
        self.map
            .check_write(offset, 1)
            .map_err(|e| e.with_operation("context::store_byte"))?;
        self.story.set_byte(offset, value)
    }

    /// Write a word, refusing anything outside dynamic memory
    pub fn store_word(&mut self, offset: usize, value: u16) -> Result<()> {
        self.map
            .check_write(offset, 2)
            .map_err(|e| e.with_operation("context::store_word"))?;
        self.story.set16(offset, value)
    }

    pub fn unpack_routine(&self, packed: impl Into<PackedAddress>) -> usize {
        self.translator.routine_address(packed)
    }

    pub fn unpack_string(&self, packed: impl Into<PackedAddress>) -> usize {
        self.translator.string_address(packed)
    }

    // =========================================================================
    // Save / restore
    // =========================================================================

    pub fn snapshot(&self) -> Snapshot {
        let dynamic = self.story.as_bytes()[..self.map.dynamic_len()].to_vec();
        Snapshot {
            version: self.story.version().number(),
            release: self.story.header().release(),
            pc: self.cursor.offset(),
            dynamic,
        }
    }

    /// Replace dynamic memory and the cursor with `snapshot`.
    ///
    /// Either everything is replaced or, on error, nothing is.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        if snapshot.version != self.story.version().number() {
            return Err(error::snapshot_mismatch(format!(
                "snapshot is for version {}, story is {}",
                snapshot.version,
                self.story.version()
            )));
        }
        if snapshot.release != self.story.header().release() {
            return Err(error::snapshot_mismatch("snapshot is for another release"));
        }
        if snapshot.dynamic.len() != self.map.dynamic_len() {
            return Err(error::snapshot_mismatch(format!(
                "snapshot has {} bytes of dynamic memory, story has {}",
                snapshot.dynamic.len(),
                self.map.dynamic_len()
            )));
        }
        if snapshot.pc >= self.story.len() {
            return Err(error::snapshot_mismatch(format!(
                "snapshot pc {:#06x} is outside the story",
                snapshot.pc
            )));
        }

        // Build the replacement first so a bad header leaves us untouched.
        let mut bytes = self.story.as_bytes().to_vec();
        bytes[..snapshot.dynamic.len()].copy_from_slice(&snapshot.dynamic);
        let story = StoryBuffer::new(bytes).map_err(|e| e.with_operation("context::restore"))?;

        tracing::debug!(pc = snapshot.pc, bytes = snapshot.dynamic.len(), "restored snapshot");
        *self = Self::with_cursor(story, snapshot.pc);
        Ok(())
    }
}
