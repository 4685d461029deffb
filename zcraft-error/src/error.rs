//! The main Error type for zcraft

use crate::{ErrorKind, ErrorStatus};
use std::fmt;

/// The unified error type for all zcraft operations.
///
/// This error type provides:
/// - `kind`: What type of error occurred
/// - `message`: Human-readable description
/// - `status`: Whether the error is retryable (memory faults never are)
/// - `operation`: What operation caused the error
/// - `context`: Key-value pairs for debugging
/// - `source`: The underlying error (if any)
///
/// # Example
///
/// ```rust
/// use zcraft_error::{Error, ErrorKind, ErrorStatus};
///
/// let err = Error::new(ErrorKind::MemoryFault, "word read past end of story")
///     .with_operation("story::get16")
///     .with_context("offset", "0x0009")
///     .with_context("len", "10");
///
/// assert_eq!(err.kind(), ErrorKind::MemoryFault);
/// assert_eq!(err.status(), ErrorStatus::Permanent);
/// assert!(!err.status().is_retryable());
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: ErrorStatus,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let status = if kind.is_retryable() {
            ErrorStatus::Temporary
        } else {
            ErrorStatus::Permanent
        };

        Self {
            kind,
            message: message.into(),
            status,
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the error status
    pub fn status(&self) -> ErrorStatus {
        self.status
    }

    /// Get the operation that caused this error
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the context key-value pairs
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Get the source error (if any)
    pub fn source_ref(&self) -> Option<&anyhow::Error> {
        self.source.as_ref()
    }

    // =========================================================================
    // Builders (chainable)
    // =========================================================================

    /// Set the error status
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Mark as temporary (retryable)
    pub fn temporary(mut self) -> Self {
        self.status = ErrorStatus::Temporary;
        self
    }

    /// Set the operation that caused this error.
    ///
    /// If an operation was already set, the previous one is moved to context
    /// as "called" to preserve the call chain.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Set the source error.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if source was already set.
    pub fn set_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(source.into());
        self
    }

    // =========================================================================
    // Status mutations
    // =========================================================================

    /// Mark as persistent after failed retries
    pub fn persist(mut self) -> Self {
        self.status = self.status.persist();
        self
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.status.is_retryable()
    }
}

// =============================================================================
// Display - compact, single-line format for logs
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) at {}", self.kind, self.status, self.operation)?;

        if !self.context.is_empty() {
            write!(f, ", context {{ ")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key, value)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

// =============================================================================
// Debug - verbose, multi-line format for debugging
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}) at {}", self.kind, self.status, self.operation)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {:?}", source)?;
        }

        Ok(())
    }
}

// =============================================================================
// std::error::Error implementation
// =============================================================================

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

// =============================================================================
// Convenient From implementations (be careful not to leak raw errors!)
// =============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        let interrupted = err.kind() == std::io::ErrorKind::Interrupted;
        let error = Error::new(kind, err.to_string())
            .with_operation("io")
            .set_source(err);
        if interrupted {
            error.temporary()
        } else {
            error
        }
    }
}

// =============================================================================
// Convenience constructors
// =============================================================================

impl Error {
    /// Create an Unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Create an Unsupported error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unsupported, message)
    }

    /// Create a MemoryFault error for an access of `width` bytes at `offset`
    /// into a buffer of `len` bytes
    pub fn memory_fault(offset: usize, width: usize, len: usize) -> Self {
        Self::new(
            ErrorKind::MemoryFault,
            format!("{}-byte access at {:#06x} outside story of {} bytes", width, offset, len),
        )
        .with_context("offset", format!("{:#06x}", offset))
        .with_context("width", width.to_string())
        .with_context("len", len.to_string())
    }

    /// Create a ReadOnlyMemory error
    pub fn read_only_memory(offset: usize, static_base: usize) -> Self {
        Self::new(
            ErrorKind::ReadOnlyMemory,
            format!("write at {:#06x} into static memory (starts at {:#06x})", offset, static_base),
        )
        .with_context("offset", format!("{:#06x}", offset))
        .with_context("static_base", format!("{:#06x}", static_base))
    }

    /// Create an UnsupportedVersion error
    pub fn unsupported_version(version: u8) -> Self {
        Self::new(
            ErrorKind::UnsupportedVersion,
            format!("story file version {} is not defined", version),
        )
        .with_context("version", version.to_string())
    }

    /// Create a ChecksumMismatch error
    pub fn checksum_mismatch(expected: u16, actual: u16) -> Self {
        Self::new(
            ErrorKind::ChecksumMismatch,
            format!("header checksum {:#06x}, computed {:#06x}", expected, actual),
        )
        .with_context("expected", format!("{:#06x}", expected))
        .with_context("actual", format!("{:#06x}", actual))
    }

    /// Create a ParseFailed error
    pub fn parse_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ParseFailed, message)
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::new(ErrorKind::MemoryFault, "offset out of range");
        assert_eq!(err.kind(), ErrorKind::MemoryFault);
        assert_eq!(err.message(), "offset out of range");
        assert_eq!(err.status(), ErrorStatus::Permanent);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::new(ErrorKind::ReadOnlyMemory, "write into static memory")
            .with_operation("context::store_word")
            .with_context("offset", "0x0800")
            .with_context("static_base", "0x0800");

        assert_eq!(err.operation(), "context::store_word");
        assert_eq!(err.context().len(), 2);
        assert_eq!(err.context()[0], ("offset", "0x0800".to_string()));
    }

    #[test]
    fn test_operation_chaining() {
        let err = Error::new(ErrorKind::MemoryFault, "read failed")
            .with_operation("story::get16")
            .with_operation("cursor::read_u16");

        assert_eq!(err.operation(), "cursor::read_u16");
        assert_eq!(err.context().len(), 1);
        assert_eq!(err.context()[0], ("called", "story::get16".to_string()));
    }

    #[test]
    fn test_default_status() {
        let err = Error::new(ErrorKind::MemoryFault, "out of range");
        assert!(!err.is_retryable());

        let err = Error::new(ErrorKind::IoFailed, "disk hiccup").temporary();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_persist() {
        let err = Error::new(ErrorKind::IoFailed, "interrupted").temporary();
        assert!(err.is_retryable());

        let err = err.persist();
        assert!(!err.is_retryable());
        assert_eq!(err.status(), ErrorStatus::Persistent);
    }

    #[test]
    fn test_display() {
        let err = Error::memory_fault(9, 2, 10).with_operation("story::get16");

        let display = format!("{}", err);
        assert!(display.contains("MemoryFault"));
        assert!(display.contains("permanent"));
        assert!(display.contains("story::get16"));
        assert!(display.contains("offset: 0x0009"));
        assert!(display.contains("len: 10"));
    }

    #[test]
    fn test_convenience_constructors() {
        let err = Error::unsupported_version(9);
        assert_eq!(err.kind(), ErrorKind::UnsupportedVersion);
        assert!(err.message().contains('9'));

        let err = Error::read_only_memory(0x0900, 0x0800);
        assert_eq!(err.kind(), ErrorKind::ReadOnlyMemory);

        let err = Error::checksum_mismatch(0x1234, 0x4321);
        assert_eq!(err.kind(), ErrorKind::ChecksumMismatch);
        assert!(err.message().contains("0x1234"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "zork1.z3");
        let err = Error::from(io_err);
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        assert_eq!(err.operation(), "io");
        assert!(err.source_ref().is_some());

        let io_err = std::io::Error::new(std::io::ErrorKind::Interrupted, "signal");
        assert!(Error::from(io_err).is_retryable());
    }
}
