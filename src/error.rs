//! Error type shared by every library operation.

/// Convenience alias used throughout the crate.
pub type Result<T, E = LibraryError> = std::result::Result<T, E>;

/// Errors raised by books, members and the library aggregate.
///
/// Every failing operation leaves the object it was called on unchanged.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// The caller supplied an invalid argument: a blank string, an out of
    /// range number, an unknown or duplicate identifier.
    #[error("validation error: {0}")]
    Validation(String),

    /// The operation conflicts with the current state of the object,
    /// e.g. checking out a book that is already checked out.
    #[error("state error: {0}")]
    State(String),

    /// A report could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LibraryError {
    /// Build a validation error from anything printable.
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a state error from anything printable.
    pub(crate) fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Whether this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether this is a state error.
    #[must_use]
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State(_))
    }
}

/// Returns the trimmed value, or a validation error naming `field` when the
/// value is empty after trimming.
pub(crate) fn require_non_blank(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LibraryError::validation(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}
