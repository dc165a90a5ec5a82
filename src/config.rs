//! Extraction configuration
//!
//! Describes which event to extract and where its documents live. Loaded from
//! JSON:
//!
//! ```json
//! {
//!     "year": 2024,
//!     "round": 22,
//!     "slug": "usa",
//!     "documents_dir": "test-data/2024_22"
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::fetch::{DEFAULT_BASE_URL, QualifyingDocuments};
use crate::types::QualifyingFormat;
use crate::{Result, TimingError};

const FIRST_CHAMPIONSHIP_YEAR: u16 = 1950;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub documents_dir: PathBuf,
    pub year: u16,
    pub round: u8,
    pub slug: String,
    #[serde(default)]
    pub session: QualifyingFormat,
    #[serde(default = "default_version")]
    pub version: u8,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_version() -> u8 {
    1
}

impl ExtractionConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| TimingError::json("extraction config", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data =
            std::fs::read_to_string(path).map_err(|e| TimingError::file_error(path.to_path_buf(), e))?;
        Self::from_json_str(&data)
    }

    pub fn validate(&self) -> Result<()> {
        if self.year < FIRST_CHAMPIONSHIP_YEAR {
            return Err(TimingError::config(format!(
                "year {} predates the championship ({FIRST_CHAMPIONSHIP_YEAR})",
                self.year
            )));
        }
        if self.round == 0 {
            return Err(TimingError::config("round numbers start at 1"));
        }
        if self.slug.trim().is_empty() {
            return Err(TimingError::config("event slug must not be empty"));
        }
        if self.version == 0 {
            return Err(TimingError::config("document versions start at 1"));
        }
        Ok(())
    }

    pub fn documents(&self) -> QualifyingDocuments {
        QualifyingDocuments {
            year: self.year,
            round: self.round,
            slug: self.slug.clone(),
            format: self.session,
            version: self.version,
        }
    }
}
