//! Time-of-day and lap-duration cells from lap-time sheets
//!
//! Lap-time sheets mix two kinds of value in the same column:
//! - `hh:mm:ss` is the local time of day a car left the pits
//! - `mm:ss.SSS` is an elapsed lap time
//!
//! The two are told apart by colon count alone. A time of day has no
//! sub-second precision.

use std::time::Duration;

use crate::{DurationValue, Result, TimingError};

/// A parsed time cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTime {
    /// Offset from local midnight
    TimeOfDay(Duration),
    /// Elapsed lap duration
    LapDuration(Duration),
}

impl SessionTime {
    pub fn as_duration(&self) -> Duration {
        match self {
            SessionTime::TimeOfDay(d) | SessionTime::LapDuration(d) => *d,
        }
    }

    /// The lap time as a record value; `None` for a time of day.
    pub fn as_duration_value(&self) -> Option<DurationValue> {
        match self {
            SessionTime::LapDuration(d) => Some(DurationValue::from(*d)),
            SessionTime::TimeOfDay(_) => None,
        }
    }

    pub fn is_time_of_day(&self) -> bool {
        matches!(self, SessionTime::TimeOfDay(_))
    }
}

/// Parse either a time of day (two colons) or a lap duration (one colon).
///
/// ```rust
/// use std::time::Duration;
/// use timesheets::types::{parse_session_time, SessionTime};
///
/// assert_eq!(
///     parse_session_time("18:05:42").unwrap(),
///     SessionTime::TimeOfDay(Duration::from_secs(18 * 3600 + 5 * 60 + 42))
/// );
/// assert_eq!(
///     parse_session_time("1:24.160").unwrap(),
///     SessionTime::LapDuration(Duration::from_millis(84_160))
/// );
/// assert!(parse_session_time("84.160").is_err());
/// ```
pub fn parse_session_time(input: &str) -> Result<SessionTime> {
    match input.matches(':').count() {
        2 => parse_time_of_day(input).map(SessionTime::TimeOfDay),
        1 => parse_lap_duration(input).map(SessionTime::LapDuration),
        _ => Err(TimingError::UnrecognizedTimeFormat { input: input.to_string() }),
    }
}

/// Parse `hh:mm:ss` into an offset from midnight.
pub fn parse_time_of_day(input: &str) -> Result<Duration> {
    let mut parts = input.split(':');
    let (Some(h), Some(m), Some(s), None) = (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TimingError::UnrecognizedTimeFormat { input: input.to_string() });
    };

    let hours = component(input, h)?;
    let minutes = component(input, m)?;
    let seconds = component(input, s)?;
    Ok(Duration::from_secs(hours * 3600 + minutes * 60 + seconds))
}

/// Parse `mm:ss.SSS` into an elapsed duration.
///
/// The fractional digits are a literal millisecond count, matching
/// [`DurationValue`]'s parsing.
pub fn parse_lap_duration(input: &str) -> Result<Duration> {
    let Some((m, rest)) = input.split_once(':') else {
        return Err(TimingError::UnrecognizedTimeFormat { input: input.to_string() });
    };
    if rest.contains(':') {
        return Err(TimingError::UnrecognizedTimeFormat { input: input.to_string() });
    }
    let (s, ms) = rest.split_once('.').ok_or_else(|| TimingError::invalid_duration(input))?;

    let minutes = component(input, m)?;
    let seconds = component(input, s)?;
    let millis = component(input, ms)?;
    Ok(Duration::from_millis(minutes * 60_000 + seconds * 1_000 + millis))
}

fn component(input: &str, digits: &str) -> Result<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || digits.len() > 9 {
        return Err(TimingError::invalid_duration(input));
    }
    digits.parse().map_err(|_| TimingError::invalid_duration(input))
}
