//! Aggregates over a set of books.
//!
//! Every function accepts any iterable of book entries: plain books,
//! references, or `Option`s of either. Missing entries (`None`) are skipped,
//! so a partially populated collection can be passed as is. None of these
//! functions keep state between calls.

use std::collections::BTreeMap;

use crate::book::Book;

/// Something that may hold a book
pub trait BookEntry {
    /// The book, or `None` for a missing entry
    fn as_book(&self) -> Option<&Book>;
}

impl BookEntry for Book {
    fn as_book(&self) -> Option<&Book> {
        Some(self)
    }
}

impl<T: BookEntry + ?Sized> BookEntry for &T {
    fn as_book(&self) -> Option<&Book> {
        (**self).as_book()
    }
}

impl<T: BookEntry> BookEntry for Option<T> {
    fn as_book(&self) -> Option<&Book> {
        self.as_ref().and_then(BookEntry::as_book)
    }
}

/// Running totals over the present entries of a collection
#[derive(Debug, Default)]
struct Totals {
    /// Number of present books
    books: u64,
    /// Sum of page counts
    pages: u64,
    /// Sum of times borrowed
    borrows: u64,
    /// Number of books currently checked out
    checked_out: u64,
}

impl Totals {
    /// Walk `books` once, skipping missing entries
    fn collect<I>(books: I) -> Self
    where
        I: IntoIterator,
        I::Item: BookEntry,
    {
        let mut totals = Self::default();
        for entry in books {
            let Some(book) = entry.as_book() else {
                continue;
            };
            totals.books = totals.books.saturating_add(1);
            totals.pages = totals.pages.saturating_add(u64::from(book.page_count()));
            totals.borrows = totals.borrows.saturating_add(u64::from(book.times_borrowed()));
            if book.is_checked_out() {
                totals.checked_out = totals.checked_out.saturating_add(1);
            }
        }
        totals
    }

    /// `numerator / books`, or 0.0 when there are no books
    #[allow(clippy::cast_precision_loss, clippy::arithmetic_side_effects)]
    fn per_book(&self, numerator: u64) -> f64 {
        if self.books == 0 {
            return 0.0;
        }
        numerator as f64 / self.books as f64
    }
}

/// Sum of page counts; 0 for an empty collection
pub fn count_total_pages<I>(books: I) -> u64
where
    I: IntoIterator,
    I::Item: BookEntry,
{
    Totals::collect(books).pages
}

/// Mean page count; 0.0 when there are no books
pub fn calculate_average_pages<I>(books: I) -> f64
where
    I: IntoIterator,
    I::Item: BookEntry,
{
    let totals = Totals::collect(books);
    totals.per_book(totals.pages)
}

/// The author whose books were borrowed most often in total.
///
/// Authors are compared exactly. On a tie the alphabetically first author
/// wins. Returns `None` when there are no books.
pub fn find_most_popular_author<I>(books: I) -> Option<String>
where
    I: IntoIterator,
    I::Item: BookEntry,
{
    let mut borrows_by_author: BTreeMap<&str, u64> = BTreeMap::new();
    let entries: Vec<I::Item> = books.into_iter().collect();
    for book in entries.iter().filter_map(BookEntry::as_book) {
        let count = borrows_by_author.entry(book.author()).or_default();
        *count = count.saturating_add(u64::from(book.times_borrowed()));
    }

    let mut best: Option<(&str, u64)> = None;
    for (author, count) in borrows_by_author {
        if best.is_none_or(|(_, max)| count > max) {
            best = Some((author, count));
        }
    }
    best.map(|(author, _)| author.to_string())
}

/// Share of books currently checked out, between 0.0 and 100.0
#[allow(clippy::arithmetic_side_effects)]
pub fn calculate_checked_out_percentage<I>(books: I) -> f64
where
    I: IntoIterator,
    I::Item: BookEntry,
{
    let totals = Totals::collect(books);
    totals.per_book(totals.checked_out) * 100.0
}

/// Mean number of times each book was borrowed; 0.0 when there are no books
pub fn calculate_engagement_score<I>(books: I) -> f64
where
    I: IntoIterator,
    I::Item: BookEntry,
{
    let totals = Totals::collect(books);
    totals.per_book(totals.borrows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    /// A book with the given author, page count and number of past borrows
    fn book(id: &str, author: &str, pages: u32, borrows: u32) -> Result<Book> {
        let mut book = Book::new(id, "Title", author, 1990, pages)?;
        for _ in 0..borrows {
            book.check_out()?;
            book.check_in()?;
        }
        Ok(book)
    }

    /// Tolerance for float comparisons
    const EPS: f64 = 1e-9;

    #[test]
    fn test_empty_collections() {
        let empty: Vec<Book> = Vec::new();
        assert_eq!(count_total_pages(&empty), 0);
        assert!(calculate_average_pages(&empty).abs() < EPS);
        assert!(calculate_checked_out_percentage(&empty).abs() < EPS);
        assert!(calculate_engagement_score(&empty).abs() < EPS);
        assert_eq!(find_most_popular_author(&empty), None);
    }

    #[test]
    fn test_only_missing_entries() {
        let entries: [Option<Book>; 2] = [None, None];
        assert_eq!(count_total_pages(&entries), 0);
        assert!(calculate_average_pages(&entries).abs() < EPS);
        assert!(calculate_checked_out_percentage(&entries).abs() < EPS);
        assert_eq!(find_most_popular_author(&entries), None);
    }

    #[test]
    fn test_pages() -> Result<()> {
        let books = [book("A", "X", 100, 0)?, book("B", "Y", 300, 0)?];
        assert_eq!(count_total_pages(&books), 400);
        assert!((calculate_average_pages(&books) - 200.0).abs() < EPS);
        Ok(())
    }

    #[test]
    fn test_missing_entries_are_skipped() -> Result<()> {
        let a = book("A", "X", 100, 2)?;
        let b = book("B", "Y", 300, 4)?;
        let entries = [Some(&a), None, Some(&b)];
        assert_eq!(count_total_pages(entries), 400);
        assert!((calculate_average_pages(entries) - 200.0).abs() < EPS);
        assert!((calculate_engagement_score(entries) - 3.0).abs() < EPS);
        Ok(())
    }

    #[test]
    fn test_checked_out_percentage() -> Result<()> {
        let mut books = vec![
            book("A", "X", 10, 0)?,
            book("B", "X", 10, 0)?,
            book("C", "X", 10, 0)?,
            book("D", "X", 10, 0)?,
        ];
        if let Some(first) = books.first_mut() {
            first.check_out()?;
        }
        assert!((calculate_checked_out_percentage(&books) - 25.0).abs() < EPS);
        Ok(())
    }

    #[test]
    fn test_most_popular_author_sums_borrows() -> Result<()> {
        let books = [
            book("A", "Orwell", 10, 3)?,
            book("B", "Herbert", 10, 5)?,
            book("C", "Orwell", 10, 4)?,
        ];
        assert_eq!(find_most_popular_author(&books).as_deref(), Some("Orwell"));
        Ok(())
    }

    #[test]
    fn test_most_popular_author_tie_and_zero_borrows() -> Result<()> {
        let tied = [book("A", "Woolf", 10, 2)?, book("B", "Austen", 10, 2)?];
        assert_eq!(find_most_popular_author(&tied).as_deref(), Some("Austen"));

        let unread = [book("A", "Woolf", 10, 0)?];
        assert_eq!(find_most_popular_author(&unread).as_deref(), Some("Woolf"));
        Ok(())
    }
}
