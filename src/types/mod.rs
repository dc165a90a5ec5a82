//! Core types for timing-sheet data.
//!
//! - [`DurationValue`] is the normalized duration stored in records
//! - [`SessionTime`] distinguishes time-of-day cells from lap durations
//! - [`Session`] and [`QualifyingFormat`] name the knockout parts
//! - [`ClassificationRecord`] and [`LapTimeRecord`] are the extracted records
//!
//! ## Usage Example
//!
//! ```rust
//! use timesheets::types::{parse_duration, parse_session_time, SessionTime};
//!
//! let fastest = parse_duration(Some("1:32.330")).unwrap().unwrap();
//! assert_eq!(fastest.milliseconds(), 92_330);
//!
//! match parse_session_time("18:05:42").unwrap() {
//!     SessionTime::TimeOfDay(offset) => assert_eq!(offset.as_secs(), 65_142),
//!     SessionTime::LapDuration(_) => unreachable!(),
//! }
//! ```

mod clock;
mod duration;
mod records;
mod session;

pub use clock::{SessionTime, parse_lap_duration, parse_session_time, parse_time_of_day};
pub use duration::{DurationValue, parse_duration};
pub use records::{
    ClassificationRecord, EntryStatus, ForeignKeys, Keyed, Lap, LapTimeRecord, SessionEntry,
    sort_records,
};
pub use session::{QualifyingFormat, Session};
