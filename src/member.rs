//! A library member and the books they currently hold.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::error::{LibraryError, Result, require_non_blank};

/// A person allowed to borrow books.
///
/// Members hold book ids only; the library resolves them back to books.
/// Two members are equal when their ids are equal.
#[derive(Debug, Clone)]
pub struct Member {
    /// Trimmed, non-blank identifier; never changes
    id: String,
    /// Trimmed, non-blank display name
    name: String,
    /// How many books the member may hold at once
    max_books_allowed: usize,
    /// Ids of held books, in borrow order
    borrowed_book_ids: Vec<String>,
}

impl Member {
    /// Create a member holding no books.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if `id` or `name` is blank, or if
    /// `max_books_allowed` is zero.
    pub fn new(id: &str, name: &str, max_books_allowed: usize) -> Result<Self> {
        let id = require_non_blank(id, "id")?;
        let name = require_non_blank(name, "name")?;
        if max_books_allowed == 0 {
            return Err(LibraryError::validation("max books allowed must be positive"));
        }
        Ok(Self { id, name, max_books_allowed, borrowed_book_ids: Vec::new() })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the display name.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if `name` is blank.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = require_non_blank(name, "name")?;
        Ok(())
    }

    #[must_use]
    pub fn max_books_allowed(&self) -> usize {
        self.max_books_allowed
    }

    /// Change the borrowing limit.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if `max` is zero or lower than the
    /// number of books currently held.
    pub fn set_max_books_allowed(&mut self, max: usize) -> Result<()> {
        if max == 0 {
            return Err(LibraryError::validation("max books allowed must be positive"));
        }
        if max < self.borrowed_count() {
            return Err(LibraryError::validation(format!(
                "new limit {max} is lower than the {} books currently borrowed",
                self.borrowed_count()
            )));
        }
        self.max_books_allowed = max;
        Ok(())
    }

    /// Ids of the books currently held, oldest borrow first
    #[must_use]
    pub fn borrowed_book_ids(&self) -> &[String] {
        &self.borrowed_book_ids
    }

    #[must_use]
    pub fn borrowed_count(&self) -> usize {
        self.borrowed_book_ids.len()
    }

    #[must_use]
    pub fn has_borrowed(&self, book_id: &str) -> bool {
        self.borrowed_book_ids.iter().any(|id| id == book_id)
    }

    /// Record that the member now holds `book_id`.
    ///
    /// Only blankness is checked on the trimmed id; `book_id` is stored as
    /// given, so callers pass ids exactly as the library keys them.
    ///
    /// # Errors
    ///
    /// - `LibraryError::Validation` if `book_id` is blank or already held
    /// - `LibraryError::State` if the member is at capacity
    pub fn borrow_book(&mut self, book_id: &str) -> Result<()> {
        if book_id.trim().is_empty() {
            return Err(LibraryError::validation("book id must not be blank"));
        }
        if self.is_at_capacity() {
            return Err(LibraryError::state(format!(
                "member {} has reached the limit of {} books",
                self.id, self.max_books_allowed
            )));
        }
        if self.has_borrowed(book_id) {
            return Err(LibraryError::validation(format!(
                "member {} already borrowed book {book_id}",
                self.id
            )));
        }
        self.borrowed_book_ids.push(book_id.to_string());
        Ok(())
    }

    /// Record that the member gave `book_id` back.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if the member does not hold `book_id`.
    pub fn return_book(&mut self, book_id: &str) -> Result<()> {
        let Some(pos) = self.borrowed_book_ids.iter().position(|id| id == book_id) else {
            return Err(LibraryError::validation(format!(
                "member {} did not borrow book {book_id}",
                self.id
            )));
        };
        self.borrowed_book_ids.remove(pos);
        Ok(())
    }

    #[must_use]
    pub fn is_at_capacity(&self) -> bool {
        self.borrowed_count() >= self.max_books_allowed
    }

    /// Whether the member holds at least `threshold` books at once.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if `threshold` is zero.
    pub fn is_power_reader(&self, threshold: usize) -> Result<bool> {
        if threshold == 0 {
            return Err(LibraryError::validation("threshold must be positive"));
        }
        Ok(self.borrowed_count() >= threshold)
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}/{} books: {})",
            self.id,
            self.name,
            self.borrowed_count(),
            self.max_books_allowed,
            self.borrowed_book_ids.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction() -> Result<()> {
        let member = Member::new(" M1 ", " Alice ", 2)?;
        assert_eq!(member.id(), "M1");
        assert_eq!(member.name(), "Alice");
        assert_eq!(member.max_books_allowed(), 2);
        assert!(member.borrowed_book_ids().is_empty());

        assert!(Member::new(" ", "Alice", 2).is_err_and(|e| e.is_validation()));
        assert!(Member::new("M1", "", 2).is_err_and(|e| e.is_validation()));
        assert!(Member::new("M1", "Alice", 0).is_err_and(|e| e.is_validation()));
        Ok(())
    }

    #[test]
    fn test_set_name() -> Result<()> {
        let mut member = Member::new("M1", "Alice", 2)?;
        member.set_name("  Alicia ")?;
        assert_eq!(member.name(), "Alicia");
        assert!(member.set_name("\t").is_err_and(|e| e.is_validation()));
        assert_eq!(member.name(), "Alicia");
        Ok(())
    }

    #[test]
    fn test_borrow_keeps_order_and_enforces_capacity() -> Result<()> {
        let mut member = Member::new("M1", "Alice", 2)?;
        member.borrow_book("B2")?;
        member.borrow_book("B1")?;
        assert_eq!(member.borrowed_book_ids(), ["B2", "B1"]);
        assert!(member.is_at_capacity());

        assert!(member.borrow_book("B3").is_err_and(|e| e.is_state()));
        assert_eq!(member.borrowed_count(), 2);
        Ok(())
    }

    #[test]
    fn test_borrow_rejects_blank_and_duplicate() -> Result<()> {
        let mut member = Member::new("M1", "Alice", 3)?;
        assert!(member.borrow_book("  ").is_err_and(|e| e.is_validation()));
        member.borrow_book("B1")?;
        assert!(member.borrow_book("B1").is_err_and(|e| e.is_validation()));
        assert_eq!(member.borrowed_book_ids(), ["B1"]);
        Ok(())
    }

    #[test]
    fn test_borrowed_id_is_stored_as_given() -> Result<()> {
        let mut member = Member::new("M1", "Alice", 3)?;
        member.borrow_book(" B1 ")?;
        assert_eq!(member.borrowed_book_ids(), [" B1 "]);
        assert!(!member.has_borrowed("B1"));
        Ok(())
    }

    #[test]
    fn test_return_book() -> Result<()> {
        let mut member = Member::new("M1", "Alice", 3)?;
        member.borrow_book("B1")?;
        member.borrow_book("B2")?;
        member.borrow_book("B3")?;

        member.return_book("B2")?;
        assert_eq!(member.borrowed_book_ids(), ["B1", "B3"]);
        assert!(member.return_book("B2").is_err_and(|e| e.is_validation()));
        Ok(())
    }

    #[test]
    fn test_max_books_cannot_drop_below_borrowed() -> Result<()> {
        let mut member = Member::new("M1", "Alice", 3)?;
        member.borrow_book("B1")?;
        member.borrow_book("B2")?;

        assert!(member.set_max_books_allowed(1).is_err_and(|e| e.is_validation()));
        assert!(member.set_max_books_allowed(0).is_err_and(|e| e.is_validation()));
        assert_eq!(member.max_books_allowed(), 3);

        member.set_max_books_allowed(2)?;
        assert!(member.is_at_capacity());
        Ok(())
    }

    #[test]
    fn test_power_reader() -> Result<()> {
        let mut member = Member::new("M1", "Alice", 5)?;
        assert!(member.is_power_reader(0).is_err_and(|e| e.is_validation()));
        assert!(!member.is_power_reader(2)?);
        member.borrow_book("B1")?;
        member.borrow_book("B2")?;
        assert!(member.is_power_reader(2)?);
        assert!(!member.is_power_reader(3)?);
        Ok(())
    }

    #[test]
    fn test_equality_uses_id_only() -> Result<()> {
        assert_eq!(Member::new("M1", "Alice", 2)?, Member::new("M1", "Bob", 9)?);
        assert_ne!(Member::new("M1", "Alice", 2)?, Member::new("M2", "Alice", 2)?);
        Ok(())
    }
}
