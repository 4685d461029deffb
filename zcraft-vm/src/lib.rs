//! # zcraft VM
//!
//! Memory and addressing layer for interpreters of versioned story files.
//!
//! ## Core Concepts
//! - **Story buffer**: the owned, fixed-length story image; every access is bounds checked
//! - **Header**: version byte plus, when present, the fixed 64-byte field layout
//! - **Codec**: big-endian 16/32-bit reads and writes at any offset
//! - **Cursor**: the instruction pointer that opcode decoding consumes
//! - **Translator**: packed routine/string addresses to byte addresses, per version band
//! - **Execution context**: one story's buffer, cursor and region map, owned per session
//!
//! ```rust
//! use zcraft_vm::{ExecutionContext, StoryBuffer, Translator};
//!
//! let story = StoryBuffer::new(vec![0x03, 0x01, 0x02, 0x03, 0x04]).unwrap();
//! assert_eq!(Translator::new(story.header()).to_byte_address(100u16), 200);
//!
//! let mut ctx = ExecutionContext::with_cursor(story, 1);
//! assert_eq!(ctx.read_u16().unwrap(), 0x0102);
//! assert_eq!(ctx.pc(), 3);
//! ```

pub mod address;
pub mod codec;
pub mod context;
pub mod cursor;
pub mod error;
pub mod header;
pub mod loader;
pub mod region;
pub mod story;

#[cfg(test)]
mod fixtures;

pub use address::{AddressKind, PackedAddress, Translator};
pub use context::{ExecutionContext, Snapshot};
pub use cursor::Cursor;
pub use error::{Error, ErrorKind, ErrorStatus, Result};
pub use header::{Header, Layout, Version, VersionBand, HEADER_SIZE};
pub use loader::{load_bytes, load_file, load_reader, LoaderConfig, MAX_STORY_SIZE};
pub use region::{MemoryMap, Region};
pub use story::StoryBuffer;
