//! Error types for timing-sheet extraction.
//!
//! All errors implement the `std::error::Error` trait and carry the offending
//! input or path so failures can be traced back to a specific document cell.
//!
//! ## Error Categories
//!
//! - **Duration Errors**: Malformed timing strings or unsupported shapes
//! - **File Errors**: Problems reading PDFs, fixtures or configuration
//! - **PDF Errors**: Text extraction failures inside the PDF backend
//! - **Layout Errors**: Tables that do not follow the FIA timing-sheet layout
//! - **JSON Errors**: Serialization of records or loading of reference fixtures
//! - **Fetch Errors**: Failures reported by a [`DocumentFetcher`](crate::fetch::DocumentFetcher)
//!
//! ## Input Errors
//!
//! Errors caused by the document content itself are never worth retrying:
//!
//! ```rust
//! use timesheets::TimingError;
//!
//! let error = TimingError::invalid_duration("1:2x.345");
//! assert!(error.is_input_error());
//! for suggestion in error.recovery_suggestions() {
//!     println!("  - {}", suggestion);
//! }
//! ```
//!
//! ## Helper Constructors
//!
//! ```rust
//! use timesheets::TimingError;
//! use std::path::PathBuf;
//!
//! let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
//! let file_error = TimingError::file_error(PathBuf::from("/tmp/lap_times.pdf"), io_err);
//!
//! let layout_error = TimingError::layout("classification table", "no rows found");
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::types::Session;

/// Result type alias for timing-sheet operations.
pub type Result<T, E = TimingError> = std::result::Result<T, E>;

/// Main error type for timing-sheet operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TimingError {
    #[error("{input} is not a valid time duration")]
    InvalidDuration { input: String },

    #[error("{input} is not a valid time duration: {colons} colon separators are not supported")]
    UnsupportedDurationFormat { input: String, colons: usize },

    #[error("unknown date format: {input}")]
    UnrecognizedTimeFormat { input: String },

    #[error("unknown qualifying session type: {input}")]
    UnknownSession { input: String },

    #[error("file error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("PDF extraction failed for {path}: {details}")]
    Pdf { path: PathBuf, details: String },

    #[error("Unexpected layout in {context}: {details}")]
    Layout { context: String, details: String },

    #[error("Car {car_number} has lap times but no {session} classification entry")]
    MissingClassification { car_number: u32, session: Session },

    #[error("JSON error in {context}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to fetch {url}: {reason}")]
    Fetch {
        url: String,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl TimingError {
    /// Returns whether this error was caused by the document content rather than
    /// the environment. Input errors reproduce on every attempt.
    pub fn is_input_error(&self) -> bool {
        match self {
            TimingError::InvalidDuration { .. } => true,
            TimingError::UnsupportedDurationFormat { .. } => true,
            TimingError::UnrecognizedTimeFormat { .. } => true,
            TimingError::UnknownSession { .. } => true,
            TimingError::Layout { .. } => true,
            TimingError::MissingClassification { .. } => true,
            TimingError::Pdf { .. } => true,
            TimingError::Config { .. } => true,
            TimingError::Json { .. } => false,
            TimingError::File { .. } => false,
            TimingError::Fetch { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TimingError::InvalidDuration { .. } => vec![
                "Check the timing string against the accepted shapes (ss.SSS, m:ss.SSS, h:mm:ss.SSS)",
                "Verify the PDF text was not merged with a neighbouring column",
            ],
            TimingError::UnsupportedDurationFormat { .. } => vec![
                "Durations may contain at most two colon separators",
                "Verify the value is a duration and not a date or timestamp",
            ],
            TimingError::UnrecognizedTimeFormat { .. } => vec![
                "Expected hh:mm:ss for a time of day or mm:ss.SSS for a lap time",
            ],
            TimingError::UnknownSession { .. } => {
                vec!["Use \"quali\" or \"sprint_quali\" as the session identifier"]
            }
            TimingError::File { .. } => vec![
                "Check file exists and is readable",
                "Check file permissions",
            ],
            TimingError::Pdf { .. } => vec![
                "Verify the file is a complete PDF download",
                "Re-fetch the document from the FIA website",
            ],
            TimingError::Layout { .. } => vec![
                "Check that the document is a qualifying classification or lap-times sheet",
                "The FIA layout may have changed; compare against a known-good document",
            ],
            TimingError::MissingClassification { .. } => vec![
                "Make sure the classification and lap-times PDFs belong to the same event",
                "Use the final classification when the provisional one omits a car",
            ],
            TimingError::Json { .. } => vec![
                "Verify the fixture is a JSON array of records",
                "Check field names against the record types",
            ],
            TimingError::Fetch { .. } => vec![
                "Check the document URL and version suffix",
                "Retry once the source is reachable",
            ],
            TimingError::Config { .. } => vec![
                "Check the configuration values against their documented ranges",
            ],
        }
    }

    /// Helper constructor for malformed duration strings.
    pub fn invalid_duration(input: impl Into<String>) -> Self {
        TimingError::InvalidDuration { input: input.into() }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        TimingError::File { path, source }
    }

    /// Helper constructor for PDF extraction errors.
    pub fn pdf_error(path: PathBuf, details: impl Into<String>) -> Self {
        TimingError::Pdf { path, details: details.into() }
    }

    /// Helper constructor for layout errors.
    pub fn layout(context: impl Into<String>, details: impl Into<String>) -> Self {
        TimingError::Layout { context: context.into(), details: details.into() }
    }

    /// Helper constructor for JSON errors with context.
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        TimingError::Json { context: context.into(), source }
    }

    /// Helper constructor for fetch errors.
    pub fn fetch_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        TimingError::Fetch { url: url.into(), reason: reason.into(), source: None }
    }

    /// Helper constructor for fetch errors with source.
    pub fn fetch_failed_with_source(
        url: impl Into<String>,
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        TimingError::Fetch { url: url.into(), reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for configuration errors.
    pub fn config(reason: impl Into<String>) -> Self {
        TimingError::Config { reason: reason.into() }
    }
}

impl From<std::io::Error> for TimingError {
    fn from(err: std::io::Error) -> Self {
        TimingError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

impl From<serde_json::Error> for TimingError {
    fn from(err: serde_json::Error) -> Self {
        TimingError::Json { context: "<unknown>".to_string(), source: err }
    }
}
