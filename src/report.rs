use std::fmt;

use serde::Serialize;

use crate::{
    book::Book,
    book_state::BookState,
    events::LibraryEvent,
    error::Result,
    library::Library,
    member::Member,
    statistics,
};

/// Settings for [`LibraryReport::generate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Year used for classic and difficulty calculations
    pub current_year: i32,
    /// How many of the most borrowed books to list
    pub popular_limit: usize,
    /// Number of books a member must hold at once to count as a power reader
    pub power_reader_threshold: usize,
}

impl ReportOptions {
    /// Options for `current_year` with the default limits
    #[must_use]
    pub fn for_year(current_year: i32) -> Self {
        Self { current_year, popular_limit: 3, power_reader_threshold: 2 }
    }
}

/// One entry of the popularity ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSummary {
    /// Book id
    pub id: String,
    /// Book title
    pub title: String,
    /// Book author
    pub author: String,
    /// Whether the book is on the shelf or lent out
    pub state: BookState,
    /// Lifetime number of checkouts
    pub times_borrowed: u32,
    /// Difficulty score in the report year
    pub difficulty: f64,
}

impl BookSummary {
    /// Summarize `book` as of `current_year`
    fn new(book: &Book, current_year: i32) -> Self {
        Self {
            id: book.id().to_string(),
            title: book.title().to_string(),
            author: book.author().to_string(),
            state: book.state(),
            times_borrowed: book.times_borrowed(),
            difficulty: book.calculate_difficulty_score(current_year),
        }
    }
}

/// A member's current loans
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    /// Member id
    pub id: String,
    /// Member name
    pub name: String,
    /// Number of books currently held
    pub borrowed: usize,
    /// Borrowing limit
    pub max_books_allowed: usize,
    /// Whether the member holds at least the power reader threshold
    pub power_reader: bool,
}

impl MemberSummary {
    /// Summarize `member` against `threshold`
    fn new(member: &Member, threshold: usize) -> Result<Self> {
        Ok(Self {
            id: member.id().to_string(),
            name: member.name().to_string(),
            borrowed: member.borrowed_count(),
            max_books_allowed: member.max_books_allowed(),
            power_reader: member.is_power_reader(threshold)?,
        })
    }
}

/// Point-in-time snapshot of a library's counts and statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryReport {
    /// Year the report was generated for
    pub current_year: i32,
    /// Number of books owned
    pub total_books: usize,
    /// Number of registered members
    pub total_members: usize,
    /// Number of open loans
    pub total_borrowed: usize,
    /// Number of books on the shelf
    pub available_books: usize,
    /// Whether the library has books, members and open loans
    pub active: bool,
    /// Sum of page counts
    pub total_pages: u64,
    /// Mean page count
    pub average_pages: f64,
    /// Share of books checked out, in percent
    pub checked_out_percentage: f64,
    /// Mean checkouts per book
    pub engagement_score: f64,
    /// Author with the most checkouts in total
    pub most_popular_author: Option<String>,
    /// Most borrowed books, best first
    pub most_popular_books: Vec<BookSummary>,
    /// Ids of books that are classics in the report year
    pub classics: Vec<String>,
    /// Every member with their loans
    pub members: Vec<MemberSummary>,
    /// Library history at report time, oldest first
    pub recent_events: Vec<LibraryEvent>,
}

impl LibraryReport {
    /// Collect a report over the current state of `library`.
    ///
    /// Books published after `current_year` are never counted as classics.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Validation` if the power reader threshold is zero.
    pub fn generate(library: &Library, options: ReportOptions) -> Result<Self> {
        let year = options.current_year;
        let members = library
            .get_all_members()
            .map(|member| MemberSummary::new(member, options.power_reader_threshold))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            current_year: year,
            total_books: library.get_total_book_count(),
            total_members: library.get_total_member_count(),
            total_borrowed: library.get_total_borrowed_book_count(),
            available_books: library.get_available_books().len(),
            active: library.is_active(),
            total_pages: statistics::count_total_pages(library.get_all_books()),
            average_pages: statistics::calculate_average_pages(library.get_all_books()),
            checked_out_percentage: statistics::calculate_checked_out_percentage(
                library.get_all_books(),
            ),
            engagement_score: statistics::calculate_engagement_score(library.get_all_books()),
            most_popular_author: statistics::find_most_popular_author(library.get_all_books()),
            most_popular_books: library
                .get_most_popular_books(options.popular_limit)
                .into_iter()
                .map(|book| BookSummary::new(book, year))
                .collect(),
            classics: library
                .get_all_books()
                .filter(|book| matches!(book.is_classic(year), Ok(true)))
                .map(|book| book.id().to_string())
                .collect(),
            members,
            recent_events: library.get_history().iter().cloned().collect(),
        })
    }

    /// Encode the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for LibraryReport {
    #[allow(clippy::arithmetic_side_effects)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Library Report ({}) ===", self.current_year)?;
        writeln!(f, "Total books: {}", self.total_books)?;
        writeln!(f, "Total members: {}", self.total_members)?;
        writeln!(f, "Total borrowed: {}", self.total_borrowed)?;
        writeln!(f, "Available books: {}", self.available_books)?;
        writeln!(f, "Active: {}", self.active)?;
        writeln!(f, "Total pages: {}", self.total_pages)?;
        writeln!(f, "Average pages: {:.1}", self.average_pages)?;
        writeln!(f, "Checked out: {:.1}%", self.checked_out_percentage)?;
        writeln!(f, "Engagement score: {:.2}", self.engagement_score)?;
        writeln!(
            f,
            "Most popular author: {}",
            self.most_popular_author.as_deref().unwrap_or("(none)")
        )?;

        writeln!(f, "\n=== Most Popular Books ===")?;
        if self.most_popular_books.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for (i, book) in self.most_popular_books.iter().enumerate() {
            writeln!(
                f,
                "{}. [{}] \"{}\" by {} - borrowed {} times, difficulty {:.1}",
                i + 1,
                book.id,
                book.title,
                book.author,
                book.times_borrowed,
                book.difficulty
            )?;
        }

        writeln!(f, "\n=== Classics ===")?;
        if self.classics.is_empty() {
            writeln!(f, "  (none)")?;
        } else {
            writeln!(f, "  {}", self.classics.join(", "))?;
        }

        writeln!(f, "\n=== Members ===")?;
        for member in &self.members {
            let marker = if member.power_reader { " (power reader)" } else { "" };
            writeln!(
                f,
                "  [{}] {}: {}/{} books{marker}",
                member.id, member.name, member.borrowed, member.max_books_allowed
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::LibraryError;

    /// Library with one loan and one classic
    fn sample_library() -> Result<Library> {
        let mut library = Library::new();
        library.add_book(Book::new("B1", "1984", "George Orwell", 1949, 340)?)?;
        library.add_book(Book::new("B2", "Dune", "Frank Herbert", 1965, 412)?)?;
        library.add_book(Book::new("B3", "Piranesi", "Susanna Clarke", 2020, 272)?)?;
        library.register_member(Member::new("M1", "Alice", 2)?)?;
        library.register_member(Member::new("M2", "Bob", 1)?)?;
        library.checkout_book("B2", "M1")?;
        Ok(library)
    }

    #[test]
    fn test_generate() -> Result<()> {
        let library = sample_library()?;
        let report = LibraryReport::generate(&library, ReportOptions::for_year(2000))?;

        assert_eq!(report.total_books, 3);
        assert_eq!(report.total_members, 2);
        assert_eq!(report.total_borrowed, 1);
        assert_eq!(report.available_books, 2);
        assert!(report.active);
        assert_eq!(report.total_pages, 1024);
        assert_eq!(report.most_popular_author.as_deref(), Some("Frank Herbert"));
        assert_eq!(report.most_popular_books.first().map(|b| b.id.as_str()), Some("B2"));
        assert_eq!(report.most_popular_books.len(), 3);
        // B3 is published after 2000 and B2 is only 35 years old
        assert_eq!(report.classics, ["B1"]);
        assert!(report.members.iter().all(|m| !m.power_reader));
        Ok(())
    }

    #[test]
    fn test_zero_power_reader_threshold_is_rejected() -> Result<()> {
        let library = sample_library()?;
        let options = ReportOptions { power_reader_threshold: 0, ..ReportOptions::for_year(2024) };
        let result = LibraryReport::generate(&library, options);
        assert!(matches!(result, Err(LibraryError::Validation(_))));
        Ok(())
    }

    #[test]
    fn test_json_export() -> Result<()> {
        let library = sample_library()?;
        let report = LibraryReport::generate(&library, ReportOptions::for_year(2024))?;

        let value: serde_json::Value = serde_json::from_str(&report.to_json()?)?;
        assert_eq!(value.get("total_books"), Some(&json!(3)));
        assert_eq!(value.get("most_popular_author"), Some(&json!("Frank Herbert")));
        assert_eq!(value.get("classics"), Some(&json!(["B1", "B2"])));
        assert_eq!(value.pointer("/members/0/id"), Some(&json!("M1")));
        assert_eq!(value.pointer("/most_popular_books/0/state"), Some(&json!("CheckedOut")));
        assert_eq!(value.pointer("/most_popular_books/1/state"), Some(&json!("Available")));
        Ok(())
    }

    #[test]
    fn test_json_export_includes_history() -> Result<()> {
        let library = sample_library()?;
        let report = LibraryReport::generate(&library, ReportOptions::for_year(2024))?;
        assert_eq!(report.recent_events.len(), 6);

        let value: serde_json::Value = serde_json::from_str(&report.to_json()?)?;
        assert_eq!(
            value.pointer("/recent_events/0"),
            Some(&json!({ "BookAdded": { "book_id": "B1" } }))
        );
        assert_eq!(
            value.pointer("/recent_events/5"),
            Some(&json!({ "CheckedOut": { "book_id": "B2", "member_id": "M1" } }))
        );
        Ok(())
    }

    #[test]
    fn test_text_rendering() -> Result<()> {
        let report = LibraryReport::generate(&Library::new(), ReportOptions::for_year(2024))?;
        let text = report.to_string();
        assert!(text.contains("Total books: 0"));
        assert!(text.contains("Most popular author: (none)"));
        assert!(!report.active);
        Ok(())
    }
}
