//! Story VM error types
//!
//! Re-exports zcraft-error and provides memory-layer conveniences.

// Re-export the core error types
pub use zcraft_error::{Error, ErrorKind, ErrorStatus, Result};

// =============================================================================
// Memory-layer error constructors
// =============================================================================

/// Create a MemoryFault error for a `width`-byte access at `offset`
pub fn memory_fault(offset: usize, width: usize, len: usize) -> Error {
    Error::memory_fault(offset, width, len)
}

/// Create a ReadOnlyMemory error
pub fn read_only(offset: usize, static_base: usize) -> Error {
    Error::read_only_memory(offset, static_base)
}

/// Create an UnsupportedVersion error
pub fn unsupported_version(version: u8) -> Error {
    Error::unsupported_version(version)
}

/// Create a ChecksumMismatch error
pub fn checksum_mismatch(expected: u16, actual: u16) -> Error {
    Error::checksum_mismatch(expected, actual)
}

/// Create a ParseFailed error for an empty story image
pub fn empty_story() -> Error {
    Error::parse_failed("story image is empty")
}

/// Create an InvalidArgument error for an oversized story image
pub fn story_too_large(size: usize, max: usize) -> Error {
    Error::invalid_argument(format!("story of {} bytes exceeds max {}", size, max))
        .with_context("size", size.to_string())
        .with_context("max", max.to_string())
}

/// Create a ParseFailed error for a story shorter than its header claims
pub fn story_truncated(declared: usize, actual: usize) -> Error {
    Error::parse_failed(format!(
        "header declares {} bytes but story has {}",
        declared, actual
    ))
    .with_context("declared", declared.to_string())
    .with_context("actual", actual.to_string())
}

/// Create an InvalidArgument error for a snapshot that belongs to another story
pub fn snapshot_mismatch(reason: impl Into<String>) -> Error {
    Error::invalid_argument(reason).with_operation("context::restore")
}
