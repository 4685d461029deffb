//! Error status: how the caller should treat an error

use std::fmt;

/// Whether an error may go away if the operation is attempted again.
///
/// Memory faults and version errors are always `Permanent`: the same story
/// image fed to the same operation fails the same way every time. Only
/// host-side I/O can be `Temporary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorStatus {
    /// Retrying will not help
    #[default]
    Permanent,

    /// Retrying may succeed
    Temporary,

    /// Was temporary, but retries have already been exhausted
    Persistent,
}

impl ErrorStatus {
    /// Returns the status as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorStatus::Permanent => "permanent",
            ErrorStatus::Temporary => "temporary",
            ErrorStatus::Persistent => "persistent",
        }
    }

    /// Check if the operation may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorStatus::Temporary)
    }

    /// Temporary errors become persistent; the others stay as they are.
    pub fn persist(self) -> Self {
        match self {
            ErrorStatus::Temporary => ErrorStatus::Persistent,
            other => other,
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
