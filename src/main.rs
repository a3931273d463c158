//! Demo driver: builds a small library, runs a few loans and prints a report.

use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, ValueEnum};
use lending_library::{
    Book, CapacityWatcher, EventLogger, Library, LibraryReport, Member, ReportOptions, Result,
};
use tracing_subscriber::EnvFilter;

/// Average Gregorian year length in seconds
const SECONDS_PER_YEAR: u64 = 31_556_952;

/// Output format of the final report
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Run a lending library demo and print its report
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Year used for classic and difficulty calculations
    #[arg(long, default_value_t = current_year())]
    current_year: i32,

    /// Number of most borrowed books to list
    #[arg(long, default_value_t = 2)]
    popular: usize,

    /// Books a member must hold at once to count as a power reader
    #[arg(long, default_value_t = 2)]
    power_threshold: usize,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

/// The current year according to the system clock
fn current_year() -> i32 {
    let seconds = SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs());
    i32::try_from(seconds / SECONDS_PER_YEAR).map_or(1970, |years| 1970_i32.saturating_add(years))
}

/// Install the stderr log subscriber, honouring `RUST_LOG`
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Stock the library with books and members
fn setup_library(library: &mut Library) -> Result<()> {
    library.add_book(Book::new("B1", "1984", "George Orwell", 1949, 340)?)?;
    library.add_book(Book::new("B2", "Animal Farm", "George Orwell", 1945, 112)?)?;
    library.add_book(Book::new("B3", "Dune", "Frank Herbert", 1965, 412)?)?;
    library.add_book(Book::new("B4", "Piranesi", "Susanna Clarke", 2020, 272)?)?;
    library.register_member(Member::new("M1", "Alice", 2)?)?;
    library.register_member(Member::new("M2", "Bob", 3)?)?;
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut library = Library::new();
    library.register_observer(Box::new(EventLogger));
    library.register_observer(Box::new(CapacityWatcher));

    setup_library(&mut library)?;

    library.checkout_book("B1", "M1")?;
    library.checkout_book("B2", "M1")?;
    library.checkout_book("B3", "M2")?;

    // Alice is at her limit, so this one is refused
    match library.checkout_book("B4", "M1") {
        Ok(()) => println!("Alice checked out Piranesi"),
        Err(e) => println!("Error: {e}"),
    }

    library.return_book("B2", "M1")?;
    library.checkout_book("B2", "M2")?;
    library.return_book("B1", "M1")?;
    library.checkout_book("B1", "M2")?;

    println!("Books borrowed by Alice: {}", library.get_books_borrowed_by_member("M1")?.len());
    for book in library.get_books_borrowed_by_member("M2")? {
        println!("Bob has: {book}");
    }

    let options = ReportOptions {
        current_year: args.current_year,
        popular_limit: args.popular,
        power_reader_threshold: args.power_threshold,
    };
    let report = LibraryReport::generate(&library, options)?;
    match args.format {
        Format::Text => println!("\n{report}"),
        Format::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}
