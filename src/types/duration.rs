//! Duration strings as printed on FIA timing sheets
//!
//! Timing sheets print three shapes of elapsed time:
//!
//! | Shape            | Example        | Milliseconds |
//! |------------------|----------------|--------------|
//! | `ss.SSS`         | `12.345`       | 12345        |
//! | `m:ss.SSS`       | `17:39.564`    | 1059564      |
//! | `h:mm:ss.SSS`    | `1:36:48.076`  | 5808076      |
//!
//! The digits after the decimal point are read as a literal millisecond count,
//! so `12.3` is 12 seconds and 3 milliseconds. Consumers of the stored records
//! rely on this, so it must not be rescaled.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Result, TimingError};

// ASCII digits only: `\d` is Unicode-aware in regex.
static SECONDS_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<sec>[0-9]+)\.(?P<millisec>[0-9]+)$").expect("valid regex")
});

static MINUTES_SECONDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<minute>[0-9]+):(?P<sec>[0-9]+)\.(?P<millisec>[0-9]+)$").expect("valid regex")
});

static HOURS_MINUTES_SECONDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<hour>[0-9]+):(?P<minute>[0-9]+):(?P<sec>[0-9]+)\.(?P<millisec>[0-9]+)$")
        .expect("valid regex")
});

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_HOUR: u64 = 3_600_000;

/// Normalized duration stored in extracted records.
///
/// Serializes as `{"_type": "timedelta", "milliseconds": 5808076}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "lowercase")]
pub enum DurationValue {
    Timedelta { milliseconds: u64 },
}

impl DurationValue {
    pub fn from_millis(milliseconds: u64) -> Self {
        DurationValue::Timedelta { milliseconds }
    }

    pub fn milliseconds(&self) -> u64 {
        match self {
            DurationValue::Timedelta { milliseconds } => *milliseconds,
        }
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_millis(self.milliseconds())
    }
}

/// Saturates at `u64::MAX` milliseconds.
impl From<Duration> for DurationValue {
    fn from(duration: Duration) -> Self {
        DurationValue::from_millis(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Formats as `m:ss.SSS`, or `h:mm:ss.SSS` once the value reaches an hour.
impl fmt::Display for DurationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.milliseconds();
        let hours = ms / MS_PER_HOUR;
        let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
        let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
        let millis = ms % MS_PER_SECOND;
        if hours > 0 {
            write!(f, "{hours}:{minutes:02}:{seconds:02}.{millis:03}")
        } else {
            write!(f, "{minutes}:{seconds:02}.{millis:03}")
        }
    }
}

impl FromStr for DurationValue {
    type Err = TimingError;

    fn from_str(s: &str) -> Result<Self> {
        let colons = s.matches(':').count();
        let (pattern, scales): (&Regex, &[(&str, u64)]) = match colons {
            0 => (&SECONDS_ONLY, &[("sec", MS_PER_SECOND), ("millisec", 1)]),
            1 => (
                &MINUTES_SECONDS,
                &[("minute", MS_PER_MINUTE), ("sec", MS_PER_SECOND), ("millisec", 1)],
            ),
            2 => (
                &HOURS_MINUTES_SECONDS,
                &[
                    ("hour", MS_PER_HOUR),
                    ("minute", MS_PER_MINUTE),
                    ("sec", MS_PER_SECOND),
                    ("millisec", 1),
                ],
            ),
            _ => {
                return Err(TimingError::UnsupportedDurationFormat {
                    input: s.to_string(),
                    colons,
                });
            }
        };

        let caps = pattern.captures(s).ok_or_else(|| TimingError::invalid_duration(s))?;

        let mut total: u64 = 0;
        for (group, scale) in scales {
            let component: u64 = caps[*group].parse().map_err(|_| TimingError::invalid_duration(s))?;
            total = component
                .checked_mul(*scale)
                .and_then(|v| total.checked_add(v))
                .ok_or_else(|| TimingError::invalid_duration(s))?;
        }

        Ok(DurationValue::from_millis(total))
    }
}

/// Convert an optional timing string into a duration.
///
/// `None` means no time was recorded and passes through without error.
///
/// ```rust
/// use timesheets::types::{parse_duration, DurationValue};
///
/// assert_eq!(parse_duration(None).unwrap(), None);
/// assert_eq!(
///     parse_duration(Some("1:36:48.076")).unwrap(),
///     Some(DurationValue::from_millis(5_808_076))
/// );
/// assert_eq!(parse_duration(Some("17:39.564")).unwrap().unwrap().milliseconds(), 1_059_564);
/// assert_eq!(parse_duration(Some("12.345")).unwrap().unwrap().milliseconds(), 12_345);
/// ```
pub fn parse_duration(input: Option<&str>) -> Result<Option<DurationValue>> {
    input.map(str::parse).transpose()
}
