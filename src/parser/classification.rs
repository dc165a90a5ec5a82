//! Qualifying classification table
//!
//! Each classification row reads, left to right:
//!
//! ```text
//! POS NO DRIVER            NAT ENTRANT                    Q1 TIME  LAPS %        Q2 TIME  LAPS  Q3 TIME  LAPS
//! 1   4  Lando NORRIS      GBR McLaren Formula 1 Team     1:32.608 9    100.000% 1:32.505 6     1:32.330 6
//! 16  24 Guanyu ZHOU       CHN Stake F1 Team Kick Sauber  1:34.200 8    101.719%
//! ```
//!
//! A knockout part is a time (or a `DNF`/`DNS`/`DSQ` status) followed by a
//! lap count. Percentages and time-of-day cells between parts are ignored.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::pdf::PdfText;
use crate::types::{DurationValue, EntryStatus};
use crate::{Result, TimingError};

static TABLE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bNO\b.*\bDRIVER\b").expect("valid regex"));

static LAP_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,2}:[0-9]{2}\.[0-9]{3}$").expect("valid regex"));

static IGNORED_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+\.[0-9]+%?|%|[0-9]{1,2}:[0-9]{2}:[0-9]{2})$").expect("valid regex")
});

const TABLE_END_MARKERS: [&str; 3] = ["POLE POSITION", "107%", "QUALIFYING SESSION LAP TIMES"];
const NOT_CLASSIFIED_MARKER: &str = "NOT CLASSIFIED";
const MAX_PARTS: usize = 3;

/// Result of one knockout part for one car.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartResult {
    pub time: Option<DurationValue>,
    pub status: Option<EntryStatus>,
    pub laps: u32,
}

/// One row of the classification table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRow {
    pub position: Option<u32>,
    pub car_number: u32,
    pub driver: String,
    pub nationality: String,
    pub entrant: String,
    pub is_classified: bool,
    /// Knockout parts in order; index 0 is Q1
    pub parts: Vec<PartResult>,
}

impl ClassificationRow {
    /// Total laps across all parts.
    pub fn total_laps(&self) -> u32 {
        self.parts.iter().map(|part| part.laps).sum()
    }
}

/// Parse every row of a classification document.
pub fn parse_classification(text: &PdfText) -> Result<Vec<ClassificationRow>> {
    let mut rows = Vec::new();
    let mut in_table = false;
    let mut is_classified = true;

    for line in text.lines() {
        if !in_table {
            in_table = TABLE_HEADER.is_match(line);
            continue;
        }

        let upper = line.to_ascii_uppercase();
        if TABLE_END_MARKERS.iter().any(|marker| upper.starts_with(marker)) {
            break;
        }
        if upper.starts_with(NOT_CLASSIFIED_MARKER) {
            is_classified = false;
            continue;
        }

        match parse_row(line, is_classified)? {
            Some(row) => rows.push(row),
            None => debug!(line, "Skipping non-row line in classification"),
        }
    }

    if !in_table {
        return Err(TimingError::layout(
            format!("classification {}", text.path().display()),
            "table header (NO ... DRIVER) not found",
        ));
    }
    if rows.is_empty() {
        return Err(TimingError::layout(
            format!("classification {}", text.path().display()),
            "table contains no rows",
        ));
    }

    debug!(rows = rows.len(), "Parsed classification table");
    Ok(rows)
}

/// Parse one table line, or `None` when the line is not a car row.
fn parse_row(line: &str, is_classified: bool) -> Result<Option<ClassificationRow>> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let (position, rest) = match tokens.as_slice() {
        [pos, no, ..] if is_uint(pos) && is_uint(no) => (pos.parse().ok(), &tokens[1..]),
        [no, ..] if is_uint(no) => (None, &tokens[..]),
        [status, no, ..] if is_unclassified_position(status) && is_uint(no) => (None, &tokens[1..]),
        _ => return Ok(None),
    };

    let Some(car_number) = rest.first().and_then(|no| no.parse::<u32>().ok()) else {
        return Ok(None);
    };

    let first_cell = rest.iter().skip(1).position(|t| is_timing_cell(t)).map(|i| i + 1);

    let identity = &rest[1..first_cell.unwrap_or(rest.len())];
    let Some(nat) = identity.iter().skip(2).position(|t| is_nationality(t)).map(|i| i + 2) else {
        return Ok(None);
    };

    // A car row without any time or status cannot be assigned to a knockout part.
    let Some(first_cell) = first_cell else {
        return Err(TimingError::layout(
            "classification row",
            format!("car {car_number} has no time or status cell in {line:?}"),
        ));
    };

    let parts = parse_parts(line, &rest[first_cell..])?;

    Ok(Some(ClassificationRow {
        position: if is_classified { position } else { None },
        car_number,
        driver: identity[..nat].join(" "),
        nationality: identity[nat].to_string(),
        entrant: identity[nat + 1..].join(" "),
        is_classified,
        parts,
    }))
}

fn parse_parts(line: &str, cells: &[&str]) -> Result<Vec<PartResult>> {
    let mut parts = Vec::new();
    let mut iter = cells.iter().peekable();

    while let Some(cell) = iter.next() {
        let part = if let Some(status) = EntryStatus::from_cell(cell) {
            PartResult { time: None, status: Some(status), laps: 0 }
        } else if LAP_TIME.is_match(cell) {
            PartResult { time: Some(cell.parse()?), status: None, laps: 0 }
        } else if IGNORED_CELL.is_match(cell) {
            continue;
        } else {
            return Err(TimingError::layout(
                "classification row",
                format!("unexpected cell {cell:?} in {line:?}"),
            ));
        };

        let laps = match iter.peek().copied() {
            Some(next) if is_uint(next) => {
                iter.next();
                next.parse::<u32>()
                    .map_err(|_| TimingError::layout("classification row", next.to_string()))?
            }
            _ => 0,
        };

        parts.push(PartResult { laps, ..part });
    }

    if parts.len() > MAX_PARTS {
        return Err(TimingError::layout(
            "classification row",
            format!("{} knockout parts in {line:?}", parts.len()),
        ));
    }

    Ok(parts)
}

fn is_uint(token: &str) -> bool {
    !token.is_empty() && token.len() <= 3 && token.bytes().all(|b| b.is_ascii_digit())
}

fn is_unclassified_position(token: &str) -> bool {
    matches!(token, "NC" | "DQ" | "DSQ" | "EX")
}

fn is_timing_cell(token: &str) -> bool {
    LAP_TIME.is_match(token) || EntryStatus::from_cell(token).is_some()
}

fn is_nationality(token: &str) -> bool {
    token.len() == 3 && token.bytes().all(|b| b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "\
FORMULA 1 PIRELLI UNITED STATES GRAND PRIX 2024
QUALIFYING SESSION PROVISIONAL CLASSIFICATION
NO DRIVER NAT ENTRANT Q1 LAPS % Q2 LAPS Q3 LAPS
TIME TIME TIME
1 4 Lando NORRIS GBR McLaren Formula 1 Team 1:33.040 9 100.000% 1:32.787 6 1:32.330 6
2 1 Max VERSTAPPEN NED Red Bull Racing 1:33.210 8 100.183% 1:32.780 6 1:32.361 6
11 24 Guanyu ZHOU CHN Stake F1 Team Kick Sauber 1:33.900 9 100.924% 1:33.574 7
16 43 Franco COLAPINTO ARG Williams Racing 1:34.100 10 101.139% DNF 2
NOT CLASSIFIED
18 Lance STROLL CAN Aston Martin Aramco F1 Team DNS 0
POLE POSITION LAP
4 Lando NORRIS 1:32.330 14:47:31
";

    fn rows() -> Vec<ClassificationRow> {
        parse_classification(&PdfText::from_pages([PAGE])).unwrap()
    }

    #[test]
    fn parses_every_car_row() {
        let rows = rows();
        assert_eq!(rows.len(), 5);
        assert_eq!(
            rows.iter().map(|r| r.car_number).collect::<Vec<_>>(),
            vec![4, 1, 24, 43, 18]
        );
    }

    #[test]
    fn splits_identity_columns() {
        let rows = rows();
        let zhou = &rows[2];
        assert_eq!(zhou.position, Some(11));
        assert_eq!(zhou.driver, "Guanyu ZHOU");
        assert_eq!(zhou.nationality, "CHN");
        assert_eq!(zhou.entrant, "Stake F1 Team Kick Sauber");
    }

    #[test]
    fn reads_knockout_parts_in_order() {
        let rows = rows();
        let norris = &rows[0];
        assert_eq!(norris.parts.len(), 3);
        assert_eq!(norris.parts[2].time, Some(DurationValue::from_millis(92_330)));
        assert_eq!(norris.parts[0].laps, 9);
        assert_eq!(norris.total_laps(), 21);

        let colapinto = &rows[3];
        assert_eq!(colapinto.parts[1].status, Some(EntryStatus::DidNotFinish));
        assert_eq!(colapinto.parts[1].time, None);
        assert_eq!(colapinto.parts[1].laps, 2);
    }

    #[test]
    fn rows_after_not_classified_marker_have_no_position() {
        let rows = rows();
        let stroll = &rows[4];
        assert!(!stroll.is_classified);
        assert_eq!(stroll.position, None);
        assert_eq!(stroll.parts, vec![PartResult {
            time: None,
            status: Some(EntryStatus::DidNotStart),
            laps: 0
        }]);
    }

    #[test]
    fn missing_header_is_a_layout_error() {
        let err = parse_classification(&PdfText::from_pages(["1 4 Lando NORRIS GBR McLaren 1:33.040 9"]))
            .unwrap_err();
        assert!(matches!(err, TimingError::Layout { .. }));
    }

    #[test]
    fn header_without_rows_is_a_layout_error() {
        let err = parse_classification(&PdfText::from_pages(["NO DRIVER NAT\nPOLE POSITION LAP"]))
            .unwrap_err();
        assert!(matches!(err, TimingError::Layout { .. }));
    }

    #[test]
    fn unexpected_cell_fails_the_whole_table() {
        let page = "NO DRIVER NAT\n1 4 Lando NORRIS GBR McLaren 1:33.040 9 ???";
        let err = parse_classification(&PdfText::from_pages([page])).unwrap_err();
        assert!(matches!(err, TimingError::Layout { .. }));
    }

    #[test]
    fn car_row_without_timing_cell_fails_the_whole_table() {
        let page = "\
NO DRIVER NAT
1 4 Lando NORRIS GBR McLaren 1:33.040 9
2 23 Alexander ALBON THA Williams Racing 0
";
        let err = parse_classification(&PdfText::from_pages([page])).unwrap_err();
        match err {
            TimingError::Layout { details, .. } => assert!(details.contains("car 23"), "{details}"),
            other => panic!("Expected Layout error, got {other:?}"),
        }
    }

    #[test]
    fn more_than_three_parts_is_rejected() {
        let page = "NO DRIVER NAT\n1 4 Lando NORRIS GBR McLaren 1:33.040 9 1:33.040 9 1:33.040 9 1:33.040 9";
        assert!(parse_classification(&PdfText::from_pages([page])).is_err());
    }
}
