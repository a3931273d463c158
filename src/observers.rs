use crate::{events::LibraryEvent, library::Library, member::Member};

/// Trait for observing changes made through a [`Library`]
pub trait LibraryObserver {
    /// Called after a mutation has been applied; `library` reflects the new state
    fn on_event(&self, event: &LibraryEvent, library: &Library);
}

/// Logs every library event as a structured `tracing` record
#[derive(Debug)]
pub struct EventLogger;

impl LibraryObserver for EventLogger {
    fn on_event(&self, event: &LibraryEvent, _library: &Library) {
        tracing::info!(
            kind = event.kind(),
            book_id = event.book_id(),
            member_id = event.member_id(),
            "library event"
        );
    }
}

/// Warns when a checkout leaves a member with no borrowing capacity left
#[derive(Debug)]
pub struct CapacityWatcher;

impl CapacityWatcher {
    /// The member a checkout just filled to capacity, if any
    #[must_use]
    pub fn filled_member<'a>(event: &LibraryEvent, library: &'a Library) -> Option<&'a Member> {
        let LibraryEvent::CheckedOut { member_id, .. } = event else {
            return None;
        };
        library.find_member_by_id(member_id).filter(|member| member.is_at_capacity())
    }
}

impl LibraryObserver for CapacityWatcher {
    fn on_event(&self, event: &LibraryEvent, library: &Library) {
        if let Some(member) = Self::filled_member(event, library) {
            tracing::warn!(
                member_id = member.id(),
                limit = member.max_books_allowed(),
                "member has reached their borrowing limit"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{book::Book, error::Result};

    #[test]
    fn test_capacity_watcher_only_fires_on_full_checkout() -> Result<()> {
        let mut library = Library::new();
        library.add_book(Book::new("B1", "1984", "George Orwell", 1949, 340)?)?;
        library.add_book(Book::new("B2", "Dune", "Frank Herbert", 1965, 412)?)?;
        library.register_member(Member::new("M1", "Alice", 2)?)?;

        let first = LibraryEvent::CheckedOut { book_id: "B1".into(), member_id: "M1".into() };
        library.checkout_book("B1", "M1")?;
        assert!(CapacityWatcher::filled_member(&first, &library).is_none());

        let second = LibraryEvent::CheckedOut { book_id: "B2".into(), member_id: "M1".into() };
        library.checkout_book("B2", "M1")?;
        let filled = CapacityWatcher::filled_member(&second, &library);
        assert_eq!(filled.map(Member::id), Some("M1"));

        let returned = LibraryEvent::Returned { book_id: "B2".into(), member_id: "M1".into() };
        assert!(CapacityWatcher::filled_member(&returned, &library).is_none());
        Ok(())
    }
}
