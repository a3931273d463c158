//! A single lendable title and its circulation state.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    book_state::BookState,
    error::{LibraryError, Result, require_non_blank},
};

/// Age in years from which a book counts as a classic.
pub const CLASSIC_AGE_YEARS: i32 = 50;

/// Earliest year accepted when revising the publication year of an existing book.
///
/// Construction only requires a positive year; this floor applies to updates.
pub const MIN_REVISED_PUBLICATION_YEAR: i32 = 1400;

/// A book owned by the library.
///
/// Two books are equal when their ids are equal, regardless of the rest of
/// their state.
#[derive(Debug, Clone)]
pub struct Book {
    /// Trimmed, non-blank identifier; never changes
    id: String,
    /// Trimmed, non-blank title
    title: String,
    /// Trimmed, non-blank author
    author: String,
    /// Year of publication
    publication_year: i32,
    /// Number of pages, always positive
    page_count: u32,
    /// Whether the book is on the shelf or lent out
    state: BookState,
    /// Number of successful checkouts over the lifetime of the book
    times_borrowed: u32,
}

impl Book {
    /// Create a new, available book that has never been borrowed.
    ///
    /// String fields are stored trimmed.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if any string is blank, or if the
    /// publication year or page count is not positive.
    pub fn new(
        id: &str,
        title: &str,
        author: &str,
        publication_year: i32,
        page_count: u32,
    ) -> Result<Self> {
        let id = require_non_blank(id, "id")?;
        let title = require_non_blank(title, "title")?;
        let author = require_non_blank(author, "author")?;
        if publication_year <= 0 {
            return Err(LibraryError::validation("publication year must be positive"));
        }
        if page_count == 0 {
            return Err(LibraryError::validation("page count must be positive"));
        }

        Ok(Self {
            id,
            title,
            author,
            publication_year,
            page_count,
            state: BookState::Available,
            times_borrowed: 0,
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the title.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if `title` is blank.
    pub fn set_title(&mut self, title: &str) -> Result<()> {
        self.title = require_non_blank(title, "title")?;
        Ok(())
    }

    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Replace the author.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if `author` is blank.
    pub fn set_author(&mut self, author: &str) -> Result<()> {
        self.author = require_non_blank(author, "author")?;
        Ok(())
    }

    #[must_use]
    pub fn publication_year(&self) -> i32 {
        self.publication_year
    }

    /// Revise the publication year.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if `year` is earlier than
    /// [`MIN_REVISED_PUBLICATION_YEAR`].
    pub fn set_publication_year(&mut self, year: i32) -> Result<()> {
        if year < MIN_REVISED_PUBLICATION_YEAR {
            return Err(LibraryError::validation(format!(
                "publication year must be >= {MIN_REVISED_PUBLICATION_YEAR}"
            )));
        }
        self.publication_year = year;
        Ok(())
    }

    #[must_use]
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Replace the page count.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if `count` is zero.
    pub fn set_page_count(&mut self, count: u32) -> Result<()> {
        if count == 0 {
            return Err(LibraryError::validation("page count must be positive"));
        }
        self.page_count = count;
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> BookState {
        self.state
    }

    #[must_use]
    pub fn is_checked_out(&self) -> bool {
        self.state == BookState::CheckedOut
    }

    #[must_use]
    pub fn times_borrowed(&self) -> u32 {
        self.times_borrowed
    }

    /// Move the book from `Available` to `CheckedOut`, counting one more borrow.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::State` if the book is already checked out.
    pub fn check_out(&mut self) -> Result<()> {
        if self.is_checked_out() {
            return Err(LibraryError::state(format!("book is already checked out: {}", self.id)));
        }
        self.state = BookState::CheckedOut;
        self.times_borrowed = self.times_borrowed.saturating_add(1);
        Ok(())
    }

    /// Move the book from `CheckedOut` back to `Available`.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::State` if the book is not checked out.
    pub fn check_in(&mut self) -> Result<()> {
        if !self.is_checked_out() {
            return Err(LibraryError::state(format!(
                "book is not currently checked out: {}",
                self.id
            )));
        }
        self.state = BookState::Available;
        Ok(())
    }

    /// Whether the book is at least [`CLASSIC_AGE_YEARS`] old in `current_year`.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if `current_year` is before the
    /// publication year.
    pub fn is_classic(&self, current_year: i32) -> Result<bool> {
        if current_year < self.publication_year {
            return Err(LibraryError::validation(
                "current year cannot be before the publication year",
            ));
        }
        Ok(current_year.saturating_sub(self.publication_year) >= CLASSIC_AGE_YEARS)
    }

    /// Reading difficulty: half a point per page plus a tenth per year of age.
    ///
    /// A publication year in the future counts as age zero.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn calculate_difficulty_score(&self, current_year: i32) -> f64 {
        let age = current_year.saturating_sub(self.publication_year).max(0);
        f64::from(self.page_count) * 0.5 + f64::from(age) * 0.1
    }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Book {}

impl Hash for Book {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] \"{}\" by {} ({}, {} pages) - {}, borrowed {} times",
            self.id,
            self.title,
            self.author,
            self.publication_year,
            self.page_count,
            self.state.get_description(),
            self.times_borrowed
        )
    }
}
