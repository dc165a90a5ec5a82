//! Test utilities for consistent path resolution and test data access
//!
//! Synthetic fixtures live under `tests/fixtures/` and are shared by the unit
//! tests and the benches.

#![cfg(any(test, feature = "benchmark"))]

use std::path::{Path, PathBuf};

/// Guidance shown when a fixture is missing from the checkout.
pub const FIXTURE_INSTALL_GUIDANCE: &str = "Synthetic fixtures live under tests/fixtures/ and are committed with the crate. Restore them from version control.";

/// A fixture that could not be loaded.
#[derive(Debug)]
pub enum FixtureError {
    Missing(PathBuf),
    Unreadable { path: PathBuf, source: std::io::Error },
}

impl FixtureError {
    pub fn path(&self) -> &Path {
        match self {
            FixtureError::Missing(path) | FixtureError::Unreadable { path, .. } => path,
        }
    }
}

impl std::fmt::Display for FixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixtureError::Missing(path) => {
                write!(f, "Missing fixture: {}. {}", path.display(), FIXTURE_INSTALL_GUIDANCE)
            }
            FixtureError::Unreadable { path, source } => {
                write!(f, "Failed to read fixture {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for FixtureError {}

/// Root of the crate, independent of the working directory tests run from.
pub fn crate_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Directory holding the synthetic text and JSON fixtures.
pub fn fixtures_dir() -> PathBuf {
    crate_root().join("tests").join("fixtures")
}

/// Resolve a file in `tests/fixtures/`, failing when it does not exist.
pub fn require_fixture(file_name: &str) -> Result<PathBuf, FixtureError> {
    let path = fixtures_dir().join(file_name);
    if path.is_file() { Ok(path) } else { Err(FixtureError::Missing(path)) }
}

/// Read a synthetic fixture from `tests/fixtures/`.
pub fn read_fixture(file_name: &str) -> Result<String, FixtureError> {
    let path = require_fixture(file_name)?;
    std::fs::read_to_string(&path).map_err(|source| FixtureError::Unreadable { path, source })
}
