//! ISBE school directory loader
//!
//! Reads the Illinois State Board of Education directory workbook, normalizes
//! the per-sheet headers into one flat record shape, keeps the schools that
//! serve the grades of interest, and writes them to a SQLite table.
//!
//! # Example
//!
//! ```no_run
//! use isbe_schools::filter::RecordFilter;
//! use isbe_schools::ingest::ingest_workbook;
//! use isbe_schools::source::CalamineWorkbook;
//! use isbe_schools::store::{SchoolSink, SqliteSink, TableSchema};
//!
//! let mut workbook = CalamineWorkbook::open("data/dir_ed_entities.xls")?;
//! let mut sink = SqliteSink::open("schools.db", TableSchema::default())?;
//! sink.create_table()?;
//!
//! let summary = ingest_workbook(&mut workbook, &mut sink, &RecordFilter::new("7-9"))?;
//! println!("{} sheets, {} reads, {} writes", summary.sheets, summary.reads, summary.writes);
//! # Ok::<(), isbe_schools::error::IsbeError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod grades;
pub mod ingest;
pub mod normalize;
pub mod source;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{IsbeError, IsbeResult};
pub use grades::{expand_grades, GradeSet};
pub use normalize::normalize_header;
pub use types::{LoadSummary, SchoolRecord, SheetOutcome, SheetStatus};
