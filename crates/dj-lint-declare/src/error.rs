//! Declaration errors.

use thiserror::Error;

/// A rejected table definition.
///
/// Only the message is meaningful: it reproduces the text DataJoint raises
/// for the same definition, which downstream checks match against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DeclareError {
    message: String,
}

impl DeclareError {
    /// Creates an error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}
