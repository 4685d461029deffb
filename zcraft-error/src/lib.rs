//! # zcraft-error
//!
//! Unified error handling for zcraft, in the style of OpenDAL's error handling.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what went wrong (e.g., MemoryFault, UnsupportedVersion)
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary, Persistent)
//! - **Error Context**: Locate the cause (offset, width, story length, ...)
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use zcraft_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::MemoryFault, "read past end of story")
//!         .with_operation("story::get16")
//!         .with_context("offset", "0x1fffe")
//!         .with_context("len", "131072"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All functions return `Result<T, zcraft_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context
//! - Don't abuse `From<OtherError>` to prevent raw error leakage

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using zcraft Error
pub type Result<T> = std::result::Result<T, Error>;
