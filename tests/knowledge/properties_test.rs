//! Property tests for effective-knowledge resolution over generated corpora.

use std::collections::HashSet;

use cee_advisor::knowledge::{resolve_effective, Document, DocumentKind};
use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use url::Url;

const CODES: [&str; 4] = ["BAR-TH-164", "BAR-EN-101", "BAT-TH-116", "IND-UT-102"];

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid base date")
}

fn day(offset: u64) -> NaiveDate {
    base_date() + Days::new(offset)
}

/// `(code index or None for a policy, day offset)` pairs turned into documents
/// with unique ids.
fn build_corpus(specs: &[(Option<usize>, u64)]) -> Vec<Document> {
    let url = Url::parse("https://example.org/doc").expect("valid url");
    specs
        .iter()
        .enumerate()
        .map(|(i, (code, offset))| {
            let kind = match code {
                Some(c) => DocumentKind::Sheet {
                    code: CODES[*c].to_string(),
                },
                None => DocumentKind::Policy,
            };
            Document::new(format!("doc-{i}"), kind, "t", "c", day(*offset), url.clone())
        })
        .collect()
}

fn corpus_strategy() -> impl Strategy<Value = Vec<(Option<usize>, u64)>> {
    prop::collection::vec((prop::option::of(0..CODES.len()), 0u64..2000), 0..40)
}

proptest! {
    #[test]
    fn at_most_one_version_per_code(specs in corpus_strategy(), reference in 0u64..2000) {
        let corpus = build_corpus(&specs);
        let result = resolve_effective(&corpus, day(reference));

        let mut seen = HashSet::new();
        for code in result.iter().filter_map(|d| d.code()) {
            prop_assert!(seen.insert(code), "code {} selected twice", code);
        }
    }

    #[test]
    fn every_result_is_in_force(specs in corpus_strategy(), reference in 0u64..2000) {
        let corpus = build_corpus(&specs);
        let date = day(reference);
        for doc in resolve_effective(&corpus, date) {
            prop_assert!(doc.version_date <= date);
        }
    }

    #[test]
    fn selected_version_is_latest_in_force(specs in corpus_strategy(), reference in 0u64..2000) {
        let corpus = build_corpus(&specs);
        let date = day(reference);
        let result = resolve_effective(&corpus, date);

        for code in CODES {
            let latest = corpus
                .iter()
                .filter(|d| d.code() == Some(code) && d.version_date <= date)
                .map(|d| d.version_date)
                .max();
            let selected = result.iter().find(|d| d.code() == Some(code));
            prop_assert_eq!(selected.map(|d| d.version_date), latest);
        }
    }

    #[test]
    fn policies_included_iff_in_force(specs in corpus_strategy(), reference in 0u64..2000) {
        let corpus = build_corpus(&specs);
        let date = day(reference);
        let result = resolve_effective(&corpus, date);

        let expected: Vec<&str> = corpus
            .iter()
            .filter(|d| !d.is_sheet() && d.version_date <= date)
            .map(|d| d.id.as_str())
            .collect();
        let actual: Vec<&str> = result
            .iter()
            .filter(|d| !d.is_sheet())
            .map(|d| d.id.as_str())
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn resolution_is_idempotent(specs in corpus_strategy(), reference in 0u64..2000) {
        let corpus = build_corpus(&specs);
        let before = corpus.clone();

        let first = resolve_effective(&corpus, day(reference));
        let second = resolve_effective(&corpus, day(reference));

        prop_assert_eq!(first, second);
        prop_assert_eq!(&corpus, &before);
    }
}
