//! Qualifying session identifiers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TimingError;

/// Which qualifying event a pair of documents belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QualifyingFormat {
    /// Grand Prix qualifying (Q1, Q2, Q3)
    #[default]
    #[serde(rename = "quali")]
    Qualifying,
    /// Sprint qualifying / shootout (SQ1, SQ2, SQ3)
    #[serde(rename = "sprint_quali")]
    SprintQualifying,
}

impl QualifyingFormat {
    /// Session for a 1-based knockout part, or `None` past part 3.
    pub fn session(self, part: usize) -> Option<Session> {
        use Session::*;
        let session = match (self, part) {
            (QualifyingFormat::Qualifying, 1) => Q1,
            (QualifyingFormat::Qualifying, 2) => Q2,
            (QualifyingFormat::Qualifying, 3) => Q3,
            (QualifyingFormat::SprintQualifying, 1) => SQ1,
            (QualifyingFormat::SprintQualifying, 2) => SQ2,
            (QualifyingFormat::SprintQualifying, 3) => SQ3,
            _ => return None,
        };
        Some(session)
    }

    pub fn sessions(self) -> [Session; 3] {
        match self {
            QualifyingFormat::Qualifying => [Session::Q1, Session::Q2, Session::Q3],
            QualifyingFormat::SprintQualifying => [Session::SQ1, Session::SQ2, Session::SQ3],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QualifyingFormat::Qualifying => "quali",
            QualifyingFormat::SprintQualifying => "sprint_quali",
        }
    }
}

impl FromStr for QualifyingFormat {
    type Err = TimingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quali" => Ok(QualifyingFormat::Qualifying),
            "sprint_quali" => Ok(QualifyingFormat::SprintQualifying),
            other => Err(TimingError::UnknownSession { input: other.to_string() }),
        }
    }
}

impl fmt::Display for QualifyingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single knockout part of a qualifying event.
///
/// Ordering follows the knockout order, so `Q1 < Q2 < Q3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Session {
    Q1,
    Q2,
    Q3,
    SQ1,
    SQ2,
    SQ3,
}

impl Session {
    /// 1-based knockout part.
    pub fn part(self) -> usize {
        match self {
            Session::Q1 | Session::SQ1 => 1,
            Session::Q2 | Session::SQ2 => 2,
            Session::Q3 | Session::SQ3 => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Session::Q1 => "Q1",
            Session::Q2 => "Q2",
            Session::Q3 => "Q3",
            Session::SQ1 => "SQ1",
            Session::SQ2 => "SQ2",
            Session::SQ3 => "SQ3",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
