//! Cross-checking extracted records against a reference dataset
//!
//! The reference lap times come from a third-party timing feed that drops some
//! laps, typically deleted laps and in/out laps. The comparison is therefore
//! one-directional: every reference lap must be present in the PDF data with the
//! same time, but the PDF may hold laps the reference lacks.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::types::{ClassificationRecord, DurationValue, Keyed, LapTimeRecord, Session};
use crate::{Result, TimingError};

/// A reference lap that the extracted data does not reproduce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LapDiscrepancy {
    /// Reference has a lap that the PDF does not
    Missing { session: Session, car_number: u32, lap: u32 },
    /// Both have the lap but the times differ
    TimeMismatch {
        session: Session,
        car_number: u32,
        lap: u32,
        extracted: Option<DurationValue>,
        expected: Option<DurationValue>,
    },
}

impl fmt::Display for LapDiscrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LapDiscrepancy::Missing { session, car_number, lap } => {
                write!(f, "Car {car_number}'s lap {lap} in {session} is in the reference but not found in PDF")
            }
            LapDiscrepancy::TimeMismatch { session, car_number, lap, extracted, expected } => {
                write!(
                    f,
                    "Car {car_number}'s lap {lap} in {session} time doesn't match the reference: {} vs {}",
                    display_time(extracted),
                    display_time(expected)
                )
            }
        }
    }
}

fn display_time(time: &Option<DurationValue>) -> String {
    time.map(|t| t.milliseconds().to_string()).unwrap_or_else(|| "none".to_string())
}

/// Read a JSON array of records from a fixture file.
pub fn load_records<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>> {
    let path = path.as_ref();
    let data =
        std::fs::read_to_string(path).map_err(|e| TimingError::file_error(path.to_path_buf(), e))?;
    serde_json::from_str(&data)
        .map_err(|e| TimingError::json(format!("reference fixture {}", path.display()), e))
}

/// Check that every reference lap appears in the extracted records with the same time.
///
/// Cars or sessions absent from the extracted data are skipped; only laps of
/// `(session, car_number)` pairs present on both sides are compared.
pub fn compare_lap_times(
    extracted: &[LapTimeRecord],
    reference: &[LapTimeRecord],
) -> Vec<LapDiscrepancy> {
    let by_key: HashMap<(Session, u32), &LapTimeRecord> =
        extracted.iter().map(|record| (record.key(), record)).collect();
    let mut discrepancies = Vec::new();

    for expected in reference {
        let (session, car_number) = expected.key();
        let Some(actual) = by_key.get(&(session, car_number)) else {
            debug!(%session, car_number, "Reference entry not present in extracted data");
            continue;
        };

        for expected_lap in &expected.objects {
            match actual.lap(expected_lap.number) {
                None => discrepancies.push(LapDiscrepancy::Missing {
                    session,
                    car_number,
                    lap: expected_lap.number,
                }),
                Some(lap) if lap.time != expected_lap.time => {
                    discrepancies.push(LapDiscrepancy::TimeMismatch {
                        session,
                        car_number,
                        lap: expected_lap.number,
                        extracted: lap.time,
                        expected: expected_lap.time,
                    })
                }
                Some(_) => {}
            }
        }
    }

    discrepancies
}

/// Compare classifications record by record, matched on `(session, car_number)`.
///
/// Returns the sorted keys of records that differ or exist on only one side.
pub fn compare_classification(
    extracted: &[ClassificationRecord],
    reference: &[ClassificationRecord],
) -> Vec<(Session, u32)> {
    let expected: HashMap<_, _> = reference.iter().map(|r| (r.key(), r)).collect();
    let actual: HashMap<_, _> = extracted.iter().map(|r| (r.key(), r)).collect();

    let mut differing: Vec<(Session, u32)> = actual
        .iter()
        .filter(|(key, record)| expected.get(*key) != Some(*record))
        .map(|(key, _)| *key)
        .chain(expected.keys().filter(|key| !actual.contains_key(*key)).copied())
        .collect();
    differing.sort();
    differing
}
