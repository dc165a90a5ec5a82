//! Qualifying lap-times table
//!
//! The lap-times sheet lists one block per car. A block starts with the car
//! number and driver name, followed by `NO TIME` cells laid out in side-by-side
//! columns:
//!
//! ```text
//! 4 Lando NORRIS
//! NO TIME NO TIME
//! 1 18:05:42 6 P 1:41.112
//! 2 1:33.432 7 18:15:09
//! ```
//!
//! `P` marks a lap that ended in the pit lane. A time of day marks the lap on
//! which the car left the pits, which has no lap time of its own.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::pdf::PdfText;
use crate::types::{SessionTime, parse_session_time};
use crate::{Result, TimingError};

static DRIVER_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<no>[0-9]{1,3}) (?P<name>[^0-9:]+ [^0-9:]+)$").expect("valid regex")
});

static LAP_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?P<lap>[0-9]{1,3}) (?:(?P<pit>P) )?(?P<time>[0-9]{1,2}:[0-9]{2}:[0-9]{2}|[0-9]{1,2}:[0-9]{2}\.[0-9]{3})\b",
    )
    .expect("valid regex")
});

/// One `NO TIME` cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LapCell {
    pub number: u32,
    pub pit_in: bool,
    pub time: SessionTime,
}

/// Every lap cell printed for one car, sorted by lap number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverLaps {
    pub car_number: u32,
    pub driver: String,
    pub laps: Vec<LapCell>,
}

/// Parse every driver block of a lap-times document.
///
/// Blocks for the same car that continue on a later page are merged.
pub fn parse_lap_times(text: &PdfText) -> Result<Vec<DriverLaps>> {
    let mut drivers: Vec<DriverLaps> = Vec::new();
    let mut index: HashMap<u32, usize> = HashMap::new();
    let mut current: Option<usize> = None;

    for line in text.lines() {
        if let Some((car_number, driver)) = driver_header(line) {
            let slot = *index.entry(car_number).or_insert_with(|| {
                drivers.push(DriverLaps { car_number, driver, laps: Vec::new() });
                drivers.len() - 1
            });
            current = Some(slot);
            continue;
        }

        let cells = parse_cells(line)?;
        if cells.is_empty() {
            debug!(line, "Skipping line without lap cells");
            continue;
        }

        let Some(slot) = current else {
            return Err(TimingError::layout(
                format!("lap times {}", text.path().display()),
                format!("lap cells before any driver header: {line:?}"),
            ));
        };
        let entry = &mut drivers[slot];

        for cell in cells {
            if entry.laps.iter().any(|lap| lap.number == cell.number) {
                return Err(TimingError::layout(
                    format!("lap times {}", text.path().display()),
                    format!("car {} has lap {} twice", entry.car_number, cell.number),
                ));
            }
            entry.laps.push(cell);
        }
    }

    if drivers.is_empty() {
        return Err(TimingError::layout(
            format!("lap times {}", text.path().display()),
            "no driver blocks found",
        ));
    }

    for driver in &mut drivers {
        driver.laps.sort_by_key(|lap| lap.number);
    }

    debug!(drivers = drivers.len(), "Parsed lap-times table");
    Ok(drivers)
}

/// `car_number First LAST`, with at least one upper-case surname token.
fn driver_header(line: &str) -> Option<(u32, String)> {
    let caps = DRIVER_HEADER.captures(line)?;
    let name = caps["name"].trim();
    let has_surname = name.split(' ').any(|word| {
        word.chars().filter(|c| c.is_alphabetic()).count() >= 2
            && !word.chars().any(char::is_lowercase)
    });
    if !has_surname {
        return None;
    }
    let car_number = caps["no"].parse().ok()?;
    Some((car_number, name.to_string()))
}

fn parse_cells(line: &str) -> Result<Vec<LapCell>> {
    LAP_CELL
        .captures_iter(line)
        .map(|caps| -> Result<LapCell> {
            let number = caps["lap"]
                .parse()
                .map_err(|_| TimingError::layout("lap cell", caps["lap"].to_string()))?;
            Ok(LapCell {
                number,
                pit_in: caps.name("pit").is_some(),
                time: parse_session_time(&caps["time"])?,
            })
        })
        .collect()
}
