use serde::Serialize;

/// Circulation state of a single book
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum BookState {
    /// Book is on the shelf and can be checked out
    #[default]
    Available,
    /// Book is checked out by a member
    CheckedOut,
}

impl BookState {
    /// Get a human-readable description of the current state
    #[must_use]
    pub fn get_description(self) -> &'static str {
        match self {
            Self::Available => "available for checkout",
            Self::CheckedOut => "checked out",
        }
    }
}
