use std::fmt;

/// A background failure the user should hear about without being
/// interrupted (e.g. a write-through save that did not reach the disk).
///
/// The in-memory change that triggered it has already been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    /// The failed write is remembered and `retry_save` attempts it again
    pub retryable: bool,
}

impl Notice {
    pub fn persistence(action: &str, error: &crate::Error) -> Self {
        Self {
            message: format!("Could not save {action}: {error}"),
            retryable: true,
        }
    }

    /// Stored data that could not be read; nothing will be written over it
    pub fn unreadable(what: &str, error: &crate::Error) -> Self {
        Self {
            message: format!("Could not read {what}: {error}"),
            retryable: false,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
