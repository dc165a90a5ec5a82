//! # Qualifying document parsing
//!
//! Turns the pair of FIA qualifying documents (classification and lap times)
//! into records keyed by `(session, car_number)`.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  classification.pdf ──► PdfText ──► ClassificationRow    │
//! │                                            │             │
//! │                                            ▼             │
//! │  lap_times.pdf ──► PdfText ──► DriverLaps ──► assemble   │
//! │                                               │          │
//! │                       ClassificationRecord ◄──┤          │
//! │                       LapTimeRecord        ◄──┘          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The lap-times sheet does not say which knockout part a lap belongs to. Laps
//! are assigned using the per-part lap counts from the classification: with
//! `9` laps in Q1 and `6` in Q2, laps 1-9 are Q1 and laps 10-15 are Q2.

mod classification;
mod lap_times;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{info, warn};

pub use classification::{ClassificationRow, PartResult, parse_classification};
pub use lap_times::{DriverLaps, LapCell, parse_lap_times};

use crate::pdf::PdfText;
use crate::types::{
    ClassificationRecord, ForeignKeys, Lap, LapTimeRecord, QualifyingFormat, SessionEntry,
};
use crate::{Result, TimingError};

/// Parsed qualifying documents for one event.
///
/// ```rust,no_run
/// use timesheets::parser::QualifyingParser;
///
/// # fn main() -> timesheets::Result<()> {
/// let parser = QualifyingParser::open("classification.pdf", "lap_times.pdf", 2024, 22, "quali")?;
/// for record in parser.lap_times() {
///     println!("{:?}: {} laps", record.foreign_keys, record.objects.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct QualifyingParser {
    year: u16,
    round: u8,
    format: QualifyingFormat,
    classification: Vec<ClassificationRecord>,
    lap_times: Vec<LapTimeRecord>,
}

impl QualifyingParser {
    /// Parse the classification and lap-times PDFs of a qualifying event.
    ///
    /// `session` is `"quali"` or `"sprint_quali"`.
    pub fn open<P, Q>(
        classification_pdf: P,
        lap_times_pdf: Q,
        year: u16,
        round: u8,
        session: &str,
    ) -> Result<Self>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let format: QualifyingFormat = session.parse()?;
        let classification = PdfText::open(classification_pdf)?;
        let lap_times = PdfText::open(lap_times_pdf)?;
        Self::from_text(&classification, &lap_times, year, round, format)
    }

    /// Parse already extracted document text.
    pub fn from_text(
        classification: &PdfText,
        lap_times: &PdfText,
        year: u16,
        round: u8,
        format: QualifyingFormat,
    ) -> Result<Self> {
        let rows = parse_classification(classification)?;
        let drivers = parse_lap_times(lap_times)?;

        let classification = build_classification(&rows, year, round, format)?;
        let lap_times = build_lap_times(&rows, &drivers, year, round, format)?;

        info!(
            year,
            round,
            session = %format,
            classification_records = classification.len(),
            lap_time_records = lap_times.len(),
            "Parsed qualifying documents"
        );

        Ok(Self { year, round, format, classification, lap_times })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn format(&self) -> QualifyingFormat {
        self.format
    }

    pub fn classification(&self) -> &[ClassificationRecord] {
        &self.classification
    }

    pub fn lap_times(&self) -> &[LapTimeRecord] {
        &self.lap_times
    }

    /// Classification records as a JSON array.
    pub fn classification_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(&self.classification)
            .map_err(|e| TimingError::json("classification records", e))
    }

    /// Lap-time records as a JSON array.
    pub fn lap_times_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(&self.lap_times).map_err(|e| TimingError::json("lap-time records", e))
    }

    pub fn into_records(self) -> (Vec<ClassificationRecord>, Vec<LapTimeRecord>) {
        (self.classification, self.lap_times)
    }
}

fn foreign_keys(
    year: u16,
    round: u8,
    format: QualifyingFormat,
    part: usize,
    car_number: u32,
) -> Result<ForeignKeys> {
    let session = format.session(part).ok_or_else(|| {
        TimingError::layout("knockout parts", format!("car {car_number} has no part {part}"))
    })?;
    Ok(ForeignKeys { year, round, session, car_number })
}

/// Positions of classified cars within each knockout part.
///
/// A car whose last part is this one keeps its official position. The other
/// cars fill the remaining positions in order: timed cars fastest first, then
/// cars without a time in classification order. Unclassified cars take no
/// position, so every position in a part is held by exactly one car.
fn part_positions(rows: &[ClassificationRow]) -> HashMap<(usize, u32), u32> {
    let mut positions = HashMap::new();
    let max_parts = rows.iter().map(|row| row.parts.len()).max().unwrap_or(0);

    for part in 0..max_parts {
        let mut taken = HashSet::new();
        let mut ranked: Vec<(usize, &ClassificationRow)> = Vec::new();

        for (order, row) in rows.iter().enumerate() {
            if !row.is_classified || row.parts.len() <= part {
                continue;
            }
            let is_final_part = row.parts.len() == part + 1;
            match row.position {
                Some(official) if is_final_part && taken.insert(official) => {
                    positions.insert((part, row.car_number), official);
                }
                _ => ranked.push((order, row)),
            }
        }

        ranked.sort_by_key(|(order, row)| {
            let time = row.parts[part].time;
            (time.is_none(), time, *order)
        });

        let mut next = 1u32;
        for (_, row) in ranked {
            while taken.contains(&next) {
                next += 1;
            }
            taken.insert(next);
            positions.insert((part, row.car_number), next);
        }
    }

    positions
}

fn build_classification(
    rows: &[ClassificationRow],
    year: u16,
    round: u8,
    format: QualifyingFormat,
) -> Result<Vec<ClassificationRecord>> {
    let positions = part_positions(rows);
    let mut records = Vec::new();

    for row in rows {
        for (part, result) in row.parts.iter().enumerate() {
            records.push(ClassificationRecord {
                foreign_keys: foreign_keys(year, round, format, part + 1, row.car_number)?,
                objects: vec![SessionEntry {
                    position: positions.get(&(part, row.car_number)).copied(),
                    is_classified: row.is_classified,
                    status: result.status,
                    laps_completed: result.laps,
                    fastest_lap_time: result.time,
                }],
            });
        }
    }

    Ok(records)
}

fn build_lap_times(
    rows: &[ClassificationRow],
    drivers: &[DriverLaps],
    year: u16,
    round: u8,
    format: QualifyingFormat,
) -> Result<Vec<LapTimeRecord>> {
    let by_car: HashMap<u32, &ClassificationRow> =
        rows.iter().map(|row| (row.car_number, row)).collect();
    let mut records = Vec::new();

    for driver in drivers {
        let row = by_car.get(&driver.car_number).ok_or_else(|| TimingError::MissingClassification {
            car_number: driver.car_number,
            session: format.sessions()[0],
        })?;

        let part_count = row.parts.len().max(1);
        let mut boundaries = Vec::with_capacity(part_count);
        let mut cumulative = 0u32;
        for part in &row.parts {
            cumulative += part.laps;
            boundaries.push(cumulative);
        }

        let mut by_part: Vec<Vec<Lap>> = vec![Vec::new(); part_count];
        let mut overflow = 0usize;
        for cell in &driver.laps {
            let part = match boundaries.iter().position(|&end| cell.number <= end) {
                Some(part) => part,
                None => {
                    overflow += 1;
                    part_count - 1
                }
            };
            by_part[part].push(Lap {
                number: cell.number,
                time: cell.time.as_duration_value(),
                is_pit_in: cell.pit_in,
                is_entry_fastest_lap: false,
            });
        }

        if overflow > 0 {
            warn!(
                car_number = driver.car_number,
                laps = overflow,
                classified_laps = cumulative,
                "More laps on lap-times sheet than in classification; assigning to last part"
            );
        }

        for (part, mut laps) in by_part.into_iter().enumerate() {
            if laps.is_empty() {
                continue;
            }
            let fastest = row.parts.get(part).and_then(|result| result.time);
            if let Some(fastest) = fastest {
                if let Some(lap) = laps.iter_mut().find(|lap| lap.time == Some(fastest)) {
                    lap.is_entry_fastest_lap = true;
                }
            }

            records.push(LapTimeRecord {
                foreign_keys: foreign_keys(year, round, format, part + 1, driver.car_number)?,
                objects: laps,
            });
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DurationValue, EntryStatus, Session};

    const CLASSIFICATION: &str = "\
NO DRIVER NAT ENTRANT Q1 LAPS % Q2 LAPS Q3 LAPS
1 4 Lando NORRIS GBR McLaren Formula 1 Team 1:33.432 2 100.000% 1:32.787 2 1:32.330 2
2 1 Max VERSTAPPEN NED Red Bull Racing 1:33.210 3 99.762% 1:32.900 1
3 18 Lance STROLL CAN Aston Martin Aramco F1 Team DNS 0
POLE POSITION LAP
";

    const LAP_TIMES: &str = "\
4 Lando NORRIS
NO TIME NO TIME
1 18:05:42 4 1:32.787
2 1:33.432 5 18:20:01
3 P 1:50.000 6 1:32.330
1 Max VERSTAPPEN
NO TIME
1 18:06:01 3 1:33.500
2 1:33.210 4 1:32.900
5 P 1:45.000
";

    fn parser() -> QualifyingParser {
        QualifyingParser::from_text(
            &PdfText::from_pages([CLASSIFICATION]),
            &PdfText::from_pages([LAP_TIMES]),
            2024,
            22,
            QualifyingFormat::Qualifying,
        )
        .unwrap()
    }

    fn lap_record(parser: &QualifyingParser, session: Session, car: u32) -> &LapTimeRecord {
        parser
            .lap_times()
            .iter()
            .find(|r| r.foreign_keys.key() == (session, car))
            .unwrap_or_else(|| panic!("no lap record for {session} car {car}"))
    }

    #[test]
    fn one_classification_record_per_part() {
        let parser = parser();
        let keys: Vec<_> = parser.classification().iter().map(|r| r.foreign_keys.key()).collect();
        assert_eq!(keys, vec![
            (Session::Q1, 4),
            (Session::Q2, 4),
            (Session::Q3, 4),
            (Session::Q1, 1),
            (Session::Q2, 1),
            (Session::Q1, 18),
        ]);
    }

    #[test]
    fn positions_rank_within_each_part() {
        let parser = parser();
        let position = |session, car| {
            parser
                .classification()
                .iter()
                .find(|r| r.foreign_keys.key() == (session, car))
                .map(|r| r.objects[0].position)
                .unwrap()
        };
        // Q1: VER 1:33.210 ahead of NOR 1:33.432, STR no time
        assert_eq!(position(Session::Q1, 1), Some(1));
        assert_eq!(position(Session::Q1, 4), Some(2));
        assert_eq!(position(Session::Q1, 18), Some(3));
        // Final parts carry the official position
        assert_eq!(position(Session::Q3, 4), Some(1));
        assert_eq!(position(Session::Q2, 1), Some(2));
    }

    #[test]
    fn unclassified_cars_take_no_position_slot() {
        let classification = "\
NO DRIVER NAT ENTRANT Q1 LAPS % Q2 LAPS
1 4 Lando NORRIS GBR McLaren 1:33.040 6 100.000% 1:32.000 5
2 1 Max VERSTAPPEN NED Red Bull Racing 1:33.500 7 100.494%
NOT CLASSIFIED
63 George RUSSELL GBR Mercedes 1:32.900 4 99.850%
";
        let parser = QualifyingParser::from_text(
            &PdfText::from_pages([classification]),
            &PdfText::from_pages(["4 Lando NORRIS\n1 1:33.040"]),
            2024,
            22,
            QualifyingFormat::Qualifying,
        )
        .unwrap();
        let position = |session, car| {
            parser
                .classification()
                .iter()
                .find(|r| r.foreign_keys.key() == (session, car))
                .map(|r| r.objects[0].position)
                .unwrap()
        };

        assert_eq!(position(Session::Q1, 4), Some(1));
        assert_eq!(position(Session::Q1, 1), Some(2));
        assert_eq!(position(Session::Q1, 63), None);
        assert_eq!(position(Session::Q2, 4), Some(1));
    }

    #[test]
    fn positions_within_a_part_are_unique() {
        // PER's official P2 in Q1 is kept; the faster Q2 runners fill around it.
        let rows = parse_classification(&PdfText::from_pages(["\
NO DRIVER NAT
1 4 Lando NORRIS GBR McLaren 1:33.300 3 1:32.000 3
2 11 Sergio PEREZ MEX Red Bull Racing 1:33.100 3
3 1 Max VERSTAPPEN NED Red Bull Racing 1:33.000 3 1:32.500 3
"]))
        .unwrap();
        let positions = part_positions(&rows);

        assert_eq!(positions[&(0, 11)], 2);
        assert_eq!(positions[&(0, 1)], 1);
        assert_eq!(positions[&(0, 4)], 3);
        assert_eq!(positions[&(1, 4)], 1);
        assert_eq!(positions[&(1, 1)], 3);

        let mut q1: Vec<u32> = [4, 11, 1].iter().map(|car| positions[&(0, *car)]).collect();
        q1.sort();
        assert_eq!(q1, vec![1, 2, 3]);
    }

    #[test]
    fn status_and_laps_are_carried() {
        let parser = parser();
        let stroll = parser
            .classification()
            .iter()
            .find(|r| r.foreign_keys.car_number == 18)
            .unwrap();
        assert_eq!(stroll.objects[0].status, Some(EntryStatus::DidNotStart));
        assert_eq!(stroll.objects[0].laps_completed, 0);
        assert_eq!(stroll.objects[0].fastest_lap_time, None);
    }

    #[test]
    fn laps_are_split_by_classification_lap_counts() {
        let parser = parser();
        let q1 = lap_record(&parser, Session::Q1, 4);
        assert_eq!(q1.objects.iter().map(|l| l.number).collect::<Vec<_>>(), vec![1, 2]);
        let q3 = lap_record(&parser, Session::Q3, 4);
        assert_eq!(q3.objects.iter().map(|l| l.number).collect::<Vec<_>>(), vec![5, 6]);

        assert_eq!(q1.objects[0].time, None);
        assert_eq!(q3.lap(6).unwrap().time, Some(DurationValue::from_millis(92_330)));
    }

    #[test]
    fn fastest_lap_is_flagged_per_part() {
        let parser = parser();
        let q2 = lap_record(&parser, Session::Q2, 4);
        assert!(q2.lap(4).unwrap().is_entry_fastest_lap);
        assert!(q2.lap(3).unwrap().is_pit_in);
        assert!(!q2.lap(3).unwrap().is_entry_fastest_lap);
    }

    #[test]
    fn extra_laps_go_to_the_last_part() {
        let parser = parser();
        let q2 = lap_record(&parser, Session::Q2, 1);
        assert_eq!(q2.objects.iter().map(|l| l.number).collect::<Vec<_>>(), vec![4, 5]);
        assert!(q2.lap(5).unwrap().is_pit_in);
    }

    #[test]
    fn lap_times_without_classification_fail() {
        let lap_times = "44 Lewis HAMILTON\n1 1:33.000";
        let err = QualifyingParser::from_text(
            &PdfText::from_pages([CLASSIFICATION]),
            &PdfText::from_pages([lap_times]),
            2024,
            22,
            QualifyingFormat::Qualifying,
        )
        .unwrap_err();
        assert!(matches!(err, TimingError::MissingClassification { car_number: 44, .. }));
    }

    #[test]
    fn sprint_format_uses_sq_sessions() {
        let parser = QualifyingParser::from_text(
            &PdfText::from_pages([CLASSIFICATION]),
            &PdfText::from_pages([LAP_TIMES]),
            2024,
            21,
            QualifyingFormat::SprintQualifying,
        )
        .unwrap();
        assert!(parser.lap_times().iter().all(|r| matches!(
            r.foreign_keys.session,
            Session::SQ1 | Session::SQ2 | Session::SQ3
        )));
    }

    #[test]
    fn json_output_is_an_array_of_records() {
        let json = parser().lap_times_json().unwrap();
        let first = &json.as_array().unwrap()[0];
        assert_eq!(first["foreign_keys"]["session"], "Q1");
        assert_eq!(first["objects"][1]["time"]["_type"], "timedelta");
    }

    #[test]
    fn unknown_session_identifier_is_rejected_before_io() {
        let err = QualifyingParser::open("missing.pdf", "missing.pdf", 2024, 22, "race").unwrap_err();
        assert!(matches!(err, TimingError::UnknownSession { .. }));
    }
}
