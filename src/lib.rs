//! In-memory lending library: books, members, checkouts and returns.
//!
//! A [`Library`] owns every [`Book`] and [`Member`] by id and keeps the two
//! sides of a loan in step. The [`statistics`] module computes aggregates over
//! any collection of books, and [`LibraryReport`] bundles them into a
//! printable, serializable snapshot.

pub mod book;
pub mod book_state;
pub mod error;
pub mod events;
pub mod library;
pub mod member;
pub mod observers;
pub mod report;
pub mod statistics;

pub use book::Book;
pub use book_state::BookState;
pub use error::{LibraryError, Result};
pub use events::LibraryEvent;
pub use library::Library;
pub use member::Member;
pub use observers::{CapacityWatcher, EventLogger, LibraryObserver};
pub use report::{LibraryReport, ReportOptions};
