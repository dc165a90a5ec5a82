//! Document naming and retrieval
//!
//! FIA timing documents are published under predictable file names:
//!
//! ```text
//! 2024_22_usa_f1_q0_timing_qualifyingsessionprovisionalclassification_v01.pdf
//! 2024_22_usa_f1_q0_timing_qualifyingsessionlaptimes_v01.pdf
//! ```
//!
//! Retrieval itself sits behind the [`DocumentFetcher`] trait. The crate ships
//! [`LocalMirror`], which serves documents from a directory that already holds
//! them. HTTP clients are left to the caller.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::types::QualifyingFormat;
use crate::{Result, TimingError};

/// Where the FIA publishes timing documents.
pub const DEFAULT_BASE_URL: &str = "https://www.fia.com/sites/default/files/";

/// The two documents that describe a qualifying event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifyingDocuments {
    pub year: u16,
    pub round: u8,
    /// Event code used in file names, e.g. `usa`
    pub slug: String,
    pub format: QualifyingFormat,
    /// Document revision, `1` for `_v01`
    pub version: u8,
}

impl QualifyingDocuments {
    fn file_name(&self, document: &str) -> String {
        let (code, prefix) = match self.format {
            QualifyingFormat::Qualifying => ("q0", "qualifyingsession"),
            QualifyingFormat::SprintQualifying => ("sq0", "sprintqualifyingsession"),
        };
        format!(
            "{}_{}_{}_f1_{}_timing_{}{}_v{:02}.pdf",
            self.year, self.round, self.slug, code, prefix, document, self.version
        )
    }

    pub fn classification_file_name(&self) -> String {
        self.file_name("provisionalclassification")
    }

    pub fn lap_times_file_name(&self) -> String {
        self.file_name("laptimes")
    }

    pub fn classification_url(&self, base_url: &str) -> String {
        join_url(base_url, &self.classification_file_name())
    }

    pub fn lap_times_url(&self, base_url: &str) -> String {
        join_url(base_url, &self.lap_times_file_name())
    }
}

fn join_url(base_url: &str, file_name: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), file_name)
}

/// Something that can persist the bytes behind a URL to a local path.
pub trait DocumentFetcher {
    /// Fetch `url` and write it to `dest`, replacing any existing file.
    fn fetch(&self, url: &str, dest: &Path) -> Result<()>;
}

/// Serves documents from a local directory, matched on the URL's file name.
#[derive(Debug, Clone)]
pub struct LocalMirror {
    root: PathBuf,
}

impl LocalMirror {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentFetcher for LocalMirror {
    fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        let file_name = url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| TimingError::fetch_failed(url, "URL has no file name"))?;

        let source = self.root.join(file_name);
        if !source.is_file() {
            return Err(TimingError::fetch_failed(
                url,
                format!("{} is not in the mirror", source.display()),
            ));
        }

        std::fs::copy(&source, dest).map_err(|e| {
            TimingError::fetch_failed_with_source(url, format!("copy to {}", dest.display()), Box::new(e))
        })?;
        debug!(url, dest = %dest.display(), "Fetched document from local mirror");
        Ok(())
    }
}

/// Local paths of a fetched document pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocuments {
    pub classification: PathBuf,
    pub lap_times: PathBuf,
}

/// Fetch both qualifying documents into `dir` as `classification.pdf` and `lap_times.pdf`.
pub fn fetch_documents<F: DocumentFetcher + ?Sized>(
    fetcher: &F,
    documents: &QualifyingDocuments,
    base_url: &str,
    dir: &Path,
) -> Result<FetchedDocuments> {
    std::fs::create_dir_all(dir).map_err(|e| TimingError::file_error(dir.to_path_buf(), e))?;

    let fetched = FetchedDocuments {
        classification: dir.join("classification.pdf"),
        lap_times: dir.join("lap_times.pdf"),
    };
    fetcher.fetch(&documents.classification_url(base_url), &fetched.classification)?;
    fetcher.fetch(&documents.lap_times_url(base_url), &fetched.lap_times)?;

    info!(
        year = documents.year,
        round = documents.round,
        dir = %dir.display(),
        "Fetched qualifying documents"
    );
    Ok(fetched)
}
