//! PDF text reader for timing sheets
//!
//! Loads a PDF into memory and extracts its text once, split into cleaned pages.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use timesheets::pdf::PdfText;
//!
//! fn dump() -> timesheets::Result<()> {
//!     let text = PdfText::open("lap_times.pdf")?;
//!     println!("{} pages", text.page_count());
//!     for line in text.lines() {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::text_utils::split_pages;
use crate::{Result, TimingError};

/// Cleaned text of every page in a PDF.
#[derive(Debug, Clone)]
pub struct PdfText {
    path: PathBuf,
    pages: Vec<String>,
}

impl PdfText {
    /// Open a PDF file and extract its text.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(&path)
            .map_err(|e| TimingError::file_error(path.as_ref().to_path_buf(), e))?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| TimingError::file_error(path.as_ref().to_path_buf(), e))?;

        Self::from_bytes_with_path(&data, path.as_ref().to_path_buf())
    }

    /// Extract text from PDF bytes already in memory.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_path(data, PathBuf::from("<memory>"))
    }

    /// Build from text that was extracted elsewhere, one string per page.
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pages = pages.into_iter().flat_map(|page| split_pages(page.as_ref())).collect();
        Self { path: PathBuf::from("<text>"), pages }
    }

    fn from_bytes_with_path(data: &[u8], path: PathBuf) -> Result<Self> {
        if !data.starts_with(b"%PDF") {
            return Err(TimingError::pdf_error(path, "missing %PDF header"));
        }

        let text = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| TimingError::pdf_error(path.clone(), e.to_string()))?;

        let pages = split_pages(&text);
        if pages.is_empty() {
            warn!(path = %path.display(), "PDF contains no extractable text");
        }
        debug!(path = %path.display(), pages = pages.len(), bytes = data.len(), "Extracted PDF text");

        Ok(Self { path, pages })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// All lines of all pages, in document order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|page| page.lines())
    }
}
