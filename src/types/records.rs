//! Extracted record structures
//!
//! Records are grouped per car and per session. Each one carries its
//! `foreign_keys` and a list of `objects`, which is the shape the storage
//! layer and the reference fixtures both use.

use serde::{Deserialize, Serialize};

use super::{DurationValue, Session};

/// Keys linking a record to its event, session and car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeys {
    pub year: u16,
    pub round: u8,
    pub session: Session,
    pub car_number: u32,
}

impl ForeignKeys {
    /// Sort and lookup key shared by all record kinds.
    pub fn key(&self) -> (Session, u32) {
        (self.session, self.car_number)
    }
}

/// Why a car has no time in a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    #[serde(rename = "DNF")]
    DidNotFinish,
    #[serde(rename = "DNS")]
    DidNotStart,
    #[serde(rename = "DSQ")]
    Disqualified,
}

impl EntryStatus {
    /// Match a status cell as printed on the classification.
    pub fn from_cell(cell: &str) -> Option<Self> {
        match cell {
            "DNF" => Some(EntryStatus::DidNotFinish),
            "DNS" => Some(EntryStatus::DidNotStart),
            "DSQ" | "DQ" => Some(EntryStatus::Disqualified),
            _ => None,
        }
    }
}

/// One car's result in one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
    pub position: Option<u32>,
    pub is_classified: bool,
    pub status: Option<EntryStatus>,
    pub laps_completed: u32,
    pub fastest_lap_time: Option<DurationValue>,
}

/// Classification of a car in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub foreign_keys: ForeignKeys,
    pub objects: Vec<SessionEntry>,
}

/// A single timed lap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lap {
    /// Lap number counted across the whole qualifying event
    pub number: u32,
    /// `None` on pit-exit laps, which print a time of day instead
    pub time: Option<DurationValue>,
    #[serde(default)]
    pub is_pit_in: bool,
    #[serde(default)]
    pub is_entry_fastest_lap: bool,
}

/// All laps of a car in a session, ordered by lap number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapTimeRecord {
    pub foreign_keys: ForeignKeys,
    pub objects: Vec<Lap>,
}

impl LapTimeRecord {
    pub fn lap(&self, number: u32) -> Option<&Lap> {
        self.objects.iter().find(|lap| lap.number == number)
    }
}

/// Records addressable by `(session, car_number)`.
pub trait Keyed {
    fn foreign_keys(&self) -> &ForeignKeys;

    fn key(&self) -> (Session, u32) {
        self.foreign_keys().key()
    }
}

impl Keyed for ClassificationRecord {
    fn foreign_keys(&self) -> &ForeignKeys {
        &self.foreign_keys
    }
}

impl Keyed for LapTimeRecord {
    fn foreign_keys(&self) -> &ForeignKeys {
        &self.foreign_keys
    }
}

/// Sort records by `(session, car_number)`.
pub fn sort_records<T: Keyed>(records: &mut [T]) {
    records.sort_by_key(|record| record.key());
}
