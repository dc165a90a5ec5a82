//! Type-safe extraction of FIA qualifying timing sheets.
//!
//! Timesheets reads the qualifying classification and lap-times PDFs that the
//! FIA publishes for every Formula 1 event and turns them into records keyed by
//! `(session, car_number)`.
//!
//! # Features
//!
//! - **Duration parsing**: `"1:36:48.076"` style strings to milliseconds
//! - **Knockout assignment**: laps split into Q1/Q2/Q3 from classification lap counts
//! - **Reference checks**: one-directional comparison against third-party lap data
//!
//! ## Example
//!
//! ```rust,no_run
//! use timesheets::{Session, Timesheets};
//!
//! fn main() -> timesheets::Result<()> {
//!     let parser = Timesheets::open("classification.pdf", "lap_times.pdf", 2024, 22, "quali")?;
//!     let pole_laps = parser
//!         .lap_times()
//!         .iter()
//!         .filter(|record| record.foreign_keys.session == Session::Q3);
//!     for record in pole_laps {
//!         println!("car {}: {} laps", record.foreign_keys.car_number, record.objects.len());
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
#[cfg_attr(any(test, feature = "benchmark"), path = "test_utils.rs")]
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

// Document handling
pub mod config;
pub mod fetch;
pub mod parser;
pub mod pdf;
pub mod reference;

// Core exports
pub use error::*;
pub use types::*;

pub use config::ExtractionConfig;
pub use fetch::{DocumentFetcher, LocalMirror, QualifyingDocuments};
pub use parser::QualifyingParser;
pub use pdf::PdfText;

use tracing::info;

/// Unified entry point for timing-sheet extraction.
///
/// # Examples
///
/// ## Local documents
/// ```rust,no_run
/// use timesheets::Timesheets;
///
/// fn main() -> timesheets::Result<()> {
///     let parser = Timesheets::open("classification.pdf", "lap_times.pdf", 2024, 22, "quali")?;
///     println!("{} classification records", parser.classification().len());
///     Ok(())
/// }
/// ```
///
/// ## From a configuration file
/// ```rust,no_run
/// use timesheets::{ExtractionConfig, LocalMirror, Timesheets};
///
/// fn main() -> timesheets::Result<()> {
///     let config = ExtractionConfig::load("extraction.json")?;
///     let parser = Timesheets::extract(&config, &LocalMirror::new("downloads"))?;
///     println!("{}", parser.lap_times_json()?);
///     Ok(())
/// }
/// ```
pub struct Timesheets;

impl Timesheets {
    /// Parse a classification and lap-times PDF pair.
    ///
    /// `session` is `"quali"` or `"sprint_quali"`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `session` is not a known qualifying format
    /// - Either file cannot be read or is not a PDF
    /// - The document layout does not match the FIA tables
    pub fn open<P, Q>(
        classification_pdf: P,
        lap_times_pdf: Q,
        year: u16,
        round: u8,
        session: &str,
    ) -> Result<QualifyingParser>
    where
        P: AsRef<std::path::Path>,
        Q: AsRef<std::path::Path>,
    {
        QualifyingParser::open(classification_pdf, lap_times_pdf, year, round, session)
    }

    /// Fetch the documents described by `config` into its `documents_dir` and parse them.
    pub fn extract<F>(config: &ExtractionConfig, fetcher: &F) -> Result<QualifyingParser>
    where
        F: DocumentFetcher + ?Sized,
    {
        config.validate()?;
        let documents = config.documents();
        let fetched =
            fetch::fetch_documents(fetcher, &documents, &config.base_url, &config.documents_dir)?;

        info!(
            year = config.year,
            round = config.round,
            slug = %config.slug,
            "Extracting qualifying documents"
        );

        QualifyingParser::open(
            &fetched.classification,
            &fetched.lap_times,
            config.year,
            config.round,
            config.session.as_str(),
        )
    }
}
