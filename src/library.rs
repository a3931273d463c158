use std::{
    cmp::Reverse,
    collections::{BTreeMap, VecDeque},
    fmt,
};

use crate::{
    book::Book,
    error::{LibraryError, Result},
    events::LibraryEvent,
    member::Member,
    observers::LibraryObserver,
};

/// Number of events kept by [`Library::new`]
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// The library aggregate: owns every book and member and coordinates
/// checkouts and returns between them.
///
/// A book is checked out exactly when one member lists its id among their
/// borrowed books. Only [`Library::checkout_book`] and
/// [`Library::return_book`] change either side, so the two never drift apart.
///
/// Books and members are kept in id order; every query that walks a
/// collection returns results in ascending id order.
pub struct Library {
    /// All books, keyed by id
    books: BTreeMap<String, Book>,
    /// All members, keyed by id
    members: BTreeMap<String, Member>,
    /// Most recent events, oldest first
    history: VecDeque<LibraryEvent>,
    /// Maximum number of history entries to keep
    max_history_size: usize,
    /// Registered observers, notified after every successful mutation
    observers: Vec<Box<dyn LibraryObserver>>,
}

// Manual implementation of Debug for Library
impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("books", &self.books)
            .field("members", &self.members)
            .field("history", &self.history)
            .field("max_history_size", &self.max_history_size)
            .field("observers_count", &self.observers.len())
            .finish()
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl Library {
    /// Create an empty library keeping the last [`DEFAULT_MAX_HISTORY`] events
    #[must_use]
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_MAX_HISTORY)
    }

    /// Create an empty library keeping at most `max_history_size` events.
    ///
    /// A limit of zero disables the history.
    #[must_use]
    pub fn with_history_limit(max_history_size: usize) -> Self {
        Self {
            books: BTreeMap::new(),
            members: BTreeMap::new(),
            history: VecDeque::new(),
            max_history_size,
            observers: Vec::new(),
        }
    }

    /// Register an observer to be notified of every successful change
    pub fn register_observer(&mut self, observer: Box<dyn LibraryObserver>) {
        self.observers.push(observer);
    }

    /// Add a book to the collection.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if a book with the same id exists.
    pub fn add_book(&mut self, book: Book) -> Result<()> {
        if self.books.contains_key(book.id()) {
            return Err(LibraryError::validation(format!(
                "book with id {} already exists",
                book.id()
            )));
        }
        let book_id = book.id().to_string();
        self.books.insert(book_id.clone(), book);
        self.record(LibraryEvent::BookAdded { book_id });
        Ok(())
    }

    /// Remove a book from the collection.
    ///
    /// Returns `false` if there was no such book.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::State` if the book is checked out.
    pub fn remove_book(&mut self, book_id: &str) -> Result<bool> {
        let Some(book) = self.books.get(book_id) else {
            return Ok(false);
        };
        if book.is_checked_out() {
            return Err(LibraryError::state(format!(
                "cannot remove book {book_id} while it is checked out"
            )));
        }
        self.books.remove(book_id);
        self.record(LibraryEvent::BookRemoved { book_id: book_id.to_string() });
        Ok(true)
    }

    /// Register a new member.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if a member with the same id exists.
    pub fn register_member(&mut self, member: Member) -> Result<()> {
        if self.members.contains_key(member.id()) {
            return Err(LibraryError::validation(format!(
                "member with id {} already exists",
                member.id()
            )));
        }
        let member_id = member.id().to_string();
        self.members.insert(member_id.clone(), member);
        self.record(LibraryEvent::MemberRegistered { member_id });
        Ok(())
    }

    /// Unregister a member.
    ///
    /// Returns `false` if there was no such member.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::State` if the member still holds books.
    pub fn unregister_member(&mut self, member_id: &str) -> Result<bool> {
        let Some(member) = self.members.get(member_id) else {
            return Ok(false);
        };
        if member.borrowed_count() > 0 {
            return Err(LibraryError::state(format!(
                "cannot unregister member {member_id} with borrowed books"
            )));
        }
        self.members.remove(member_id);
        self.record(LibraryEvent::MemberUnregistered { member_id: member_id.to_string() });
        Ok(true)
    }

    #[must_use]
    pub fn find_book_by_id(&self, book_id: &str) -> Option<&Book> {
        self.books.get(book_id)
    }

    #[must_use]
    pub fn find_member_by_id(&self, member_id: &str) -> Option<&Member> {
        self.members.get(member_id)
    }

    /// Every book, in id order
    pub fn get_all_books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// Every member, in id order
    pub fn get_all_members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Books whose title contains `query`, ignoring case
    #[must_use]
    pub fn find_books_by_title(&self, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        self.books.values().filter(|book| book.title().to_lowercase().contains(&needle)).collect()
    }

    /// Books whose author equals `author`, ignoring case
    #[must_use]
    pub fn find_books_by_author(&self, author: &str) -> Vec<&Book> {
        let wanted = author.to_lowercase();
        self.books.values().filter(|book| book.author().to_lowercase() == wanted).collect()
    }

    #[must_use]
    pub fn get_available_books(&self) -> Vec<&Book> {
        self.books.values().filter(|book| !book.is_checked_out()).collect()
    }

    #[must_use]
    pub fn get_checked_out_books(&self) -> Vec<&Book> {
        self.books.values().filter(|book| book.is_checked_out()).collect()
    }

    /// Lend a book to a member.
    ///
    /// Either both the book and the member are updated, or neither is.
    ///
    /// # Errors
    ///
    /// - `LibraryError::Validation` if the book or member is unknown, or the
    ///   member already lists the book
    /// - `LibraryError::State` if the book is checked out or the member is at
    ///   capacity
    pub fn checkout_book(&mut self, book_id: &str, member_id: &str) -> Result<()> {
        let book = self
            .books
            .get_mut(book_id)
            .ok_or_else(|| LibraryError::validation(format!("no such book: {book_id}")))?;
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| LibraryError::validation(format!("no such member: {member_id}")))?;

        if book.is_checked_out() {
            return Err(LibraryError::state(format!("book is already checked out: {book_id}")));
        }
        if member.is_at_capacity() {
            return Err(LibraryError::state(format!("member is at capacity: {member_id}")));
        }
        if member.has_borrowed(book_id) {
            return Err(LibraryError::validation(format!(
                "member {member_id} already borrowed book {book_id}"
            )));
        }

        book.check_out()?;
        member.borrow_book(book_id)?;

        self.record(LibraryEvent::CheckedOut {
            book_id: book_id.to_string(),
            member_id: member_id.to_string(),
        });
        Ok(())
    }

    /// Take a book back from the member who borrowed it.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if the book or member is unknown, or
    /// the member did not borrow the book.
    pub fn return_book(&mut self, book_id: &str, member_id: &str) -> Result<()> {
        let book = self
            .books
            .get_mut(book_id)
            .ok_or_else(|| LibraryError::validation(format!("no such book: {book_id}")))?;
        let member = self
            .members
            .get_mut(member_id)
            .ok_or_else(|| LibraryError::validation(format!("no such member: {member_id}")))?;

        if !member.has_borrowed(book_id) {
            return Err(LibraryError::validation(format!(
                "member {member_id} did not borrow book {book_id}"
            )));
        }

        book.check_in()?;
        member.return_book(book_id)?;

        self.record(LibraryEvent::Returned {
            book_id: book_id.to_string(),
            member_id: member_id.to_string(),
        });
        Ok(())
    }

    /// The books a member holds, in borrow order.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if the member is unknown.
    pub fn get_books_borrowed_by_member(&self, member_id: &str) -> Result<Vec<&Book>> {
        let member = self
            .members
            .get(member_id)
            .ok_or_else(|| LibraryError::validation(format!("no such member: {member_id}")))?;
        Ok(member.borrowed_book_ids().iter().filter_map(|id| self.books.get(id)).collect())
    }

    /// Up to `limit` books, most borrowed first.
    ///
    /// Books borrowed equally often keep their id order.
    #[must_use]
    pub fn get_most_popular_books(&self, limit: usize) -> Vec<&Book> {
        if limit == 0 {
            return Vec::new();
        }
        let mut books: Vec<&Book> = self.books.values().collect();
        books.sort_by_key(|book| Reverse(book.times_borrowed()));
        books.truncate(limit);
        books
    }

    #[must_use]
    pub fn get_total_book_count(&self) -> usize {
        self.books.len()
    }

    #[must_use]
    pub fn get_total_member_count(&self) -> usize {
        self.members.len()
    }

    /// Number of books currently held across all members
    #[must_use]
    pub fn get_total_borrowed_book_count(&self) -> usize {
        self.members.values().map(Member::borrowed_count).sum()
    }

    /// Whether the library has books, members, and at least one open loan
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.books.is_empty()
            && !self.members.is_empty()
            && self.get_total_borrowed_book_count() > 0
    }

    /// Recent events, oldest first
    #[must_use]
    pub fn get_history(&self) -> &VecDeque<LibraryEvent> {
        &self.history
    }

    /// Notify observers of `event` and append it to the history
    fn record(&mut self, event: LibraryEvent) {
        for observer in &self.observers {
            observer.on_event(&event, self);
        }

        if self.max_history_size == 0 {
            return;
        }
        self.history.push_back(event);
        while self.history.len() > self.max_history_size {
            self.history.pop_front();
        }
    }
}
