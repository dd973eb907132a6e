//! Error type for text-format emission.

use std::fmt;

/// An error encountered while emitting text format.
///
/// The only failing tokens are identifiers: empty, or containing a character
/// outside the permitted set.
#[derive(Debug, Clone)]
#[must_use]
pub struct EmitError {
    /// Human-readable description of the error.
    pub message: String,
}

impl EmitError {
    /// Create a new emit error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EmitError {}
