use serde::Serialize;

/// A successful change to the library's books or members
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum LibraryEvent {
    /// A book was added to the collection
    BookAdded {
        /// Id of the added book
        book_id: String,
    },
    /// A book was removed from the collection
    BookRemoved {
        /// Id of the removed book
        book_id: String,
    },
    /// A member was registered
    MemberRegistered {
        /// Id of the new member
        member_id: String,
    },
    /// A member was unregistered
    MemberUnregistered {
        /// Id of the removed member
        member_id: String,
    },
    /// A member checked out a book
    CheckedOut {
        /// Id of the book
        book_id: String,
        /// Id of the borrowing member
        member_id: String,
    },
    /// A member returned a book
    Returned {
        /// Id of the book
        book_id: String,
        /// Id of the returning member
        member_id: String,
    },
}

impl LibraryEvent {
    /// Short name of the event kind, used as a log field
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BookAdded { .. } => "book_added",
            Self::BookRemoved { .. } => "book_removed",
            Self::MemberRegistered { .. } => "member_registered",
            Self::MemberUnregistered { .. } => "member_unregistered",
            Self::CheckedOut { .. } => "checked_out",
            Self::Returned { .. } => "returned",
        }
    }

    /// The book this event concerns, if any
    #[must_use]
    pub fn book_id(&self) -> Option<&str> {
        match self {
            Self::BookAdded { book_id }
            | Self::BookRemoved { book_id }
            | Self::CheckedOut { book_id, .. }
            | Self::Returned { book_id, .. } => Some(book_id),
            Self::MemberRegistered { .. } | Self::MemberUnregistered { .. } => None,
        }
    }

    /// The member this event concerns, if any
    #[must_use]
    pub fn member_id(&self) -> Option<&str> {
        match self {
            Self::MemberRegistered { member_id }
            | Self::MemberUnregistered { member_id }
            | Self::CheckedOut { member_id, .. }
            | Self::Returned { member_id, .. } => Some(member_id),
            Self::BookAdded { .. } | Self::BookRemoved { .. } => None,
        }
    }
}
