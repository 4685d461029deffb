//! # Story Loader
//!
//! Turns a file, reader or byte vector into a [`StoryBuffer`], applying the
//! checks selected in [`LoaderConfig`].

use crate::error::{self, Result};
use crate::story::StoryBuffer;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Largest story the architecture can address (version 8)
pub const MAX_STORY_SIZE: usize = 512 * 1024;

/// Loader options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Reject stories whose checksum does not match the header
    pub verify_checksum: bool,
    /// Reject stories shorter than the header's file length
    pub enforce_file_length: bool,
    /// Upper bound on the image size in bytes
    pub max_story_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            verify_checksum: false,
            enforce_file_length: false,
            max_story_size: MAX_STORY_SIZE,
        }
    }
}

impl LoaderConfig {
    /// Every check turned on
    pub fn strict() -> Self {
        Self {
            verify_checksum: true,
            enforce_file_length: true,
            ..Self::default()
        }
    }
}

/// Load a story from a byte vector
pub fn load_bytes(bytes: Vec<u8>, config: &LoaderConfig) -> Result<StoryBuffer> {
    if bytes.is_empty() {
        return Err(error::empty_story().with_operation("loader::load"));
    }
    if bytes.len() > config.max_story_size {
        return Err(
            error::story_too_large(bytes.len(), config.max_story_size).with_operation("loader::load")
        );
    }

    let story = StoryBuffer::new(bytes).map_err(|e| e.with_operation("loader::load"))?;

    if let Some(layout) = story.header().layout() {
        if layout.file_length > story.len() {
            if config.enforce_file_length {
                return Err(error::story_truncated(layout.file_length, story.len())
                    .with_operation("loader::load"));
            }
            tracing::warn!(
                declared = layout.file_length,
                actual = story.len(),
                "story is shorter than its header claims"
            );
        }

        if config.verify_checksum {
            let actual = story.checksum();
            if actual != layout.checksum {
                tracing::warn!(expected = layout.checksum, actual, "checksum mismatch");
                return Err(error::checksum_mismatch(layout.checksum, actual)
                    .with_operation("loader::load"));
            }
        }
    }

    tracing::info!(version = %story.version(), len = story.len(), "loaded story");
    Ok(story)
}

/// Load a story from any reader
pub fn load_reader<R: Read>(mut reader: R, config: &LoaderConfig) -> Result<StoryBuffer> {
    let mut bytes = Vec::new();
    // Read one byte past the limit so oversize input is detected without
    // buffering all of it.
    let limit = config.max_story_size.saturating_add(1) as u64;
    reader
        .by_ref()
        .take(limit)
        .read_to_end(&mut bytes)
        .map_err(|e| error::Error::from(e).with_operation("loader::load_reader"))?;
    load_bytes(bytes, config)
}

/// Load a story file from disk
pub fn load_file(path: impl AsRef<Path>, config: &LoaderConfig) -> Result<StoryBuffer> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "opening story file");
    let file = std::fs::File::open(path).map_err(|e| {
        error::Error::from(e)
            .with_operation("loader::load_file")
            .with_context("path", path.display().to_string())
    })?;
    load_reader(file, config).map_err(|e| e.with_context("path", path.display().to_string()))
}
