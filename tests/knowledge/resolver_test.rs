//! Scenario tests for effective-knowledge resolution on the portal snapshot.

use cee_advisor::knowledge::{
    fixture_records, resolve_effective, resolve_raw, Corpus, Document, KnowledgeError,
};
use chrono::NaiveDate;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

fn fixture() -> Corpus {
    Corpus::from_raw(fixture_records()).expect("fixture is valid")
}

fn ids<'a>(docs: &[&'a Document]) -> Vec<&'a str> {
    docs.iter().map(|d| d.id.as_str()).collect()
}

#[test]
fn mid_2023_selects_older_heat_pump_sheet() {
    let corpus = fixture();
    let effective = corpus.effective(date("2023-06-01"));

    assert_eq!(
        ids(effective.documents()),
        vec!["BAR-TH-164-v2", "BAR-EN-101", "pol-5eme-periode"]
    );
    let heat_pump = effective.sheet("BAR-TH-164").expect("heat pump sheet in force");
    assert!(heat_pump.content.contains("ETAS ≥ 102%"));
}

#[test]
fn mid_2024_selects_current_heat_pump_sheet() {
    let corpus = fixture();
    let effective = corpus.effective(date("2024-06-01"));

    assert_eq!(
        ids(effective.documents()),
        vec!["BAR-TH-164-v3", "BAR-EN-101", "pol-5eme-periode"]
    );
    let heat_pump = effective.sheet("BAR-TH-164").expect("heat pump sheet in force");
    assert!(heat_pump.content.contains("ETAS ≥ 111%"));
}

#[test]
fn switch_happens_on_effective_day() {
    let corpus = fixture();

    let eve = corpus.effective(date("2023-12-31"));
    assert_eq!(eve.sheet("BAR-TH-164").map(|d| d.id.as_str()), Some("BAR-TH-164-v2"));

    let day = corpus.effective(date("2024-01-01"));
    assert_eq!(day.sheet("BAR-TH-164").map(|d| d.id.as_str()), Some("BAR-TH-164-v3"));
}

#[test]
fn families_appear_only_once_published() {
    let corpus = fixture();

    // Before the insulation sheet and the 5th-period policy.
    let effective = corpus.effective(date("2021-06-01"));
    assert_eq!(ids(effective.documents()), vec!["BAR-TH-164-v2"]);

    // Before anything.
    assert!(corpus.effective(date("2021-01-01")).is_empty());
}

#[test]
fn resolution_does_not_mutate_corpus() {
    let corpus = fixture();
    let before = corpus.clone();

    let first = ids(corpus.effective(date("2024-06-01")).documents());
    let second = ids(corpus.effective(date("2024-06-01")).documents());

    assert_eq!(first, second);
    assert_eq!(corpus, before);
}

#[test]
fn resolve_on_raw_records_matches_corpus() {
    let records = fixture_records();
    let owned = resolve_raw(&records, date("2023-06-01")).expect("fixture is valid");
    let corpus = fixture();
    let borrowed = resolve_effective(corpus.documents(), date("2023-06-01"));

    let owned_refs: Vec<&Document> = owned.iter().collect();
    assert_eq!(owned_refs, borrowed);
}

#[test]
fn malformed_date_aborts_and_names_document() {
    let mut records = fixture_records();
    records[3].version_date = "2023-05-32".to_string();

    let err = resolve_raw(&records, date("2024-06-01")).unwrap_err();
    assert!(matches!(err, KnowledgeError::InvalidVersionDate { .. }));
    assert_eq!(err.document_id(), Some("BAR-EN-101"));

    let err = Corpus::from_raw(records).unwrap_err();
    assert_eq!(err.document_id(), Some("BAR-EN-101"));
}
