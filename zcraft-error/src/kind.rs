//! Error kinds for zcraft operations

use std::fmt;

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to tell a corrupt story file apart from a bug
/// in the interpreter above the memory layer, or from a host I/O problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// The requested feature or operation is not supported
    Unsupported,

    /// Invalid configuration or parameters
    ConfigInvalid,

    // =========================================================================
    // Memory errors
    // =========================================================================
    /// A byte or word access touched an offset outside the story buffer
    MemoryFault,

    /// A write targeted static or high memory
    ReadOnlyMemory,

    // =========================================================================
    // Story file errors
    // =========================================================================
    /// The header's version byte is not a defined architecture version
    UnsupportedVersion,

    /// The computed checksum does not match the header checksum
    ChecksumMismatch,

    // =========================================================================
    // IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    // =========================================================================
    // Parse errors
    // =========================================================================
    /// Failed to parse input
    ParseFailed,

    /// Serialization/deserialization failed
    SerializationFailed,

    /// Invalid argument passed to function
    InvalidArgument,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            // General
            ErrorKind::Unexpected => "Unexpected",
            ErrorKind::Unsupported => "Unsupported",
            ErrorKind::ConfigInvalid => "ConfigInvalid",

            // Memory
            ErrorKind::MemoryFault => "MemoryFault",
            ErrorKind::ReadOnlyMemory => "ReadOnlyMemory",

            // Story file
            ErrorKind::UnsupportedVersion => "UnsupportedVersion",
            ErrorKind::ChecksumMismatch => "ChecksumMismatch",

            // IO
            ErrorKind::FileNotFound => "FileNotFound",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::IoFailed => "IoFailed",

            // Parse
            ErrorKind::ParseFailed => "ParseFailed",
            ErrorKind::SerializationFailed => "SerializationFailed",
            ErrorKind::InvalidArgument => "InvalidArgument",
        }
    }

    /// Check if this error kind is retryable by default.
    ///
    /// Nothing the memory layer reports is transient, so no kind is.
    /// Interrupted I/O is marked temporary per error instead.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Faults raised while touching story memory
    pub fn is_memory_fault(&self) -> bool {
        matches!(self, ErrorKind::MemoryFault | ErrorKind::ReadOnlyMemory)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::MemoryFault.to_string(), "MemoryFault");
        assert_eq!(ErrorKind::UnsupportedVersion.to_string(), "UnsupportedVersion");
    }

    #[test]
    fn test_is_retryable() {
        assert!(!ErrorKind::MemoryFault.is_retryable());
        assert!(!ErrorKind::ReadOnlyMemory.is_retryable());
        assert!(!ErrorKind::IoFailed.is_retryable());
    }

    #[test]
    fn test_is_memory_fault() {
        assert!(ErrorKind::MemoryFault.is_memory_fault());
        assert!(ErrorKind::ReadOnlyMemory.is_memory_fault());
        assert!(!ErrorKind::UnsupportedVersion.is_memory_fault());
    }
}
