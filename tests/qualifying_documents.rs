//! End-to-end extraction of qualifying documents
//!
//! The synthetic tests run on page text shaped like pdf-extract output for the
//! 2024 United States Grand Prix. The real-document test needs the PDFs and reference
//! records under `test-data/2024_22/` and is ignored by default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use timesheets::reference::{compare_classification, compare_lap_times, load_records};
use timesheets::{
    ClassificationRecord, DurationValue, ExtractionConfig, LapTimeRecord, LocalMirror, PdfText,
    QualifyingFormat, QualifyingParser, Session, Timesheets, sort_records,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn synthetic_parser() -> Result<QualifyingParser> {
    let classification = std::fs::read_to_string(fixture("classification.txt"))?;
    let lap_times = std::fs::read_to_string(fixture("lap_times.txt"))?;
    Ok(QualifyingParser::from_text(
        &PdfText::from_pages([classification]),
        &PdfText::from_pages([lap_times]),
        2024,
        22,
        QualifyingFormat::Qualifying,
    )?)
}

#[test]
fn classification_matches_reference_fixture() -> Result<()> {
    init_tracing();
    let parser = synthetic_parser()?;

    let mut extracted = parser.classification().to_vec();
    let mut expected: Vec<ClassificationRecord> = load_records(fixture("classification.json"))?;
    sort_records(&mut extracted);
    sort_records(&mut expected);

    assert_eq!(extracted, expected);
    assert!(compare_classification(&extracted, &expected).is_empty());
    Ok(())
}

#[test]
fn every_reference_lap_is_extracted() -> Result<()> {
    init_tracing();
    let parser = synthetic_parser()?;
    let reference: Vec<LapTimeRecord> = load_records(fixture("lap_times.json"))?;

    let discrepancies = compare_lap_times(parser.lap_times(), &reference);
    assert!(
        discrepancies.is_empty(),
        "discrepancies:\n{}",
        discrepancies.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
    );
    Ok(())
}

#[test]
fn continued_driver_blocks_are_merged_across_pages() -> Result<()> {
    let parser = synthetic_parser()?;
    let hamilton_q2 = parser
        .lap_times()
        .iter()
        .find(|r| r.foreign_keys.key() == (Session::Q2, 44))
        .context("no Q2 laps for car 44")?;

    let numbers: Vec<u32> = hamilton_q2.objects.iter().map(|lap| lap.number).collect();
    assert_eq!(numbers, vec![4, 5]);
    assert_eq!(hamilton_q2.objects[0].time, None);
    assert!(hamilton_q2.objects[1].is_entry_fastest_lap);
    Ok(())
}

#[test]
fn laps_beyond_classified_total_stay_in_last_session() -> Result<()> {
    let parser = synthetic_parser()?;
    let stroll: Vec<_> =
        parser.lap_times().iter().filter(|r| r.foreign_keys.car_number == 18).collect();

    assert_eq!(stroll.len(), 1);
    assert_eq!(stroll[0].foreign_keys.session, Session::Q1);
    assert_eq!(stroll[0].objects.len(), 3);
    assert!(stroll[0].lap(3).context("lap 3")?.is_pit_in);
    Ok(())
}

#[test]
fn non_starters_have_no_lap_records() -> Result<()> {
    let parser = synthetic_parser()?;
    assert!(parser.lap_times().iter().all(|r| r.foreign_keys.car_number != 23));
    Ok(())
}

#[test]
fn json_output_round_trips_through_records() -> Result<()> {
    let parser = synthetic_parser()?;
    let json = parser.lap_times_json()?;
    let records: Vec<LapTimeRecord> = serde_json::from_value(json)?;
    assert_eq!(records, parser.lap_times());

    let norris_q3 = records
        .iter()
        .find(|r| r.foreign_keys.key() == (Session::Q3, 4))
        .context("no Q3 laps for car 4")?;
    assert_eq!(norris_q3.lap(8).context("lap 8")?.time, Some(DurationValue::from_millis(92_330)));
    Ok(())
}

#[test]
fn reference_mismatch_is_reported() -> Result<()> {
    let parser = synthetic_parser()?;
    let mut reference: Vec<LapTimeRecord> = load_records(fixture("lap_times.json"))?;
    reference[0].objects[0].time = Some(DurationValue::from_millis(93_433));

    let discrepancies = compare_lap_times(parser.lap_times(), &reference);
    assert_eq!(discrepancies.len(), 1);
    assert!(discrepancies[0].to_string().contains("doesn't match"));
    Ok(())
}

#[test]
fn non_pdf_input_is_rejected() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let bogus = dir.path().join("classification.pdf");
    std::fs::write(&bogus, "not a pdf")?;

    let err = Timesheets::open(&bogus, &bogus, 2024, 22, "quali").unwrap_err();
    assert!(matches!(err, timesheets::TimingError::Pdf { .. }));
    Ok(())
}

#[test]
fn extract_fetches_into_documents_dir_before_parsing() -> Result<()> {
    let mirror = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;
    let config = ExtractionConfig::from_json_str(&format!(
        r#"{{"year": 2024, "round": 22, "slug": "usa", "documents_dir": {:?}}}"#,
        out.path().join("2024_22")
    ))?;

    let documents = config.documents();
    std::fs::write(mirror.path().join(documents.classification_file_name()), "%PDF-1.4 truncated")?;
    std::fs::write(mirror.path().join(documents.lap_times_file_name()), "%PDF-1.4 truncated")?;

    let err = Timesheets::extract(&config, &LocalMirror::new(mirror.path())).unwrap_err();
    assert!(matches!(err, timesheets::TimingError::Pdf { .. }));
    assert!(config.documents_dir.join("classification.pdf").exists());
    assert!(config.documents_dir.join("lap_times.pdf").exists());
    Ok(())
}

fn event_document(name: &str) -> Result<PathBuf> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data/2024_22").join(name);
    anyhow::ensure!(path.is_file(), "missing {}; see README.md", path.display());
    Ok(path)
}

#[test]
#[ignore = "requires FIA documents and reference JSON in test-data/2024_22"]
fn real_documents_match_reference() -> Result<()> {
    init_tracing();
    let parser = Timesheets::open(
        event_document("classification.pdf")?,
        event_document("lap_times.pdf")?,
        2024,
        22,
        "quali",
    )?;

    let mut extracted = parser.classification().to_vec();
    let mut expected: Vec<ClassificationRecord> =
        load_records(event_document("classification_reference.json")?)?;
    sort_records(&mut extracted);
    sort_records(&mut expected);
    assert_eq!(extracted, expected);

    let reference: Vec<LapTimeRecord> = load_records(event_document("lap_times_reference.json")?)?;
    let discrepancies = compare_lap_times(parser.lap_times(), &reference);
    assert!(
        discrepancies.is_empty(),
        "discrepancies:\n{}",
        discrepancies.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
    );
    Ok(())
}
