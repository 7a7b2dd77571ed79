//! Effective-knowledge resolution.
//!
//! Maps a corpus and a reference date to the documents in force on that
//! date: the latest qualifying version of every sheet family, plus every
//! non-sheet document already published.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::document::{Document, RawDocument};
use super::error::KnowledgeError;

/// Select the documents in force on `reference_date`.
///
/// Sheets are grouped by code and only the version with the greatest
/// `version_date <= reference_date` is kept; a family with no such version is
/// left out entirely. When two qualifying versions share that date, the one
/// appearing first in `corpus` wins. Every other document is kept iff its
/// `version_date <= reference_date`.
///
/// The result lists selected sheets in first-seen code order, followed by
/// the non-sheet documents in corpus order.
#[must_use]
pub fn resolve_effective(corpus: &[Document], reference_date: NaiveDate) -> Vec<&Document> {
    let mut families: Vec<Option<&Document>> = Vec::new();
    let mut family_index: HashMap<&str, usize> = HashMap::new();
    let mut others = Vec::new();

    for doc in corpus {
        let Some(code) = doc.code() else {
            if doc.is_in_force_on(reference_date) {
                others.push(doc);
            }
            continue;
        };

        let slot = *family_index.entry(code).or_insert_with(|| {
            families.push(None);
            families.len() - 1
        });

        if !doc.is_in_force_on(reference_date) {
            continue;
        }

        // Strictly greater: an equal date keeps the earlier version.
        let newer = match families[slot] {
            Some(current) => doc.version_date > current.version_date,
            None => true,
        };
        if newer {
            families[slot] = Some(doc);
        }
    }

    let mut effective: Vec<&Document> = families.into_iter().flatten().collect();
    let sheet_count = effective.len();
    effective.extend(others);

    tracing::debug!(
        reference_date = %reference_date,
        corpus = corpus.len(),
        sheets = sheet_count,
        others = effective.len() - sheet_count,
        "Resolved effective knowledge"
    );

    effective
}

/// Validate raw records and resolve them in one call.
///
/// Validation aborts on the first bad record; nothing is skipped silently.
///
/// # Errors
///
/// Returns the `KnowledgeError` of the first record that fails validation.
pub fn resolve_raw(
    records: &[RawDocument],
    reference_date: NaiveDate,
) -> Result<Vec<Document>, KnowledgeError> {
    let corpus = records
        .iter()
        .cloned()
        .map(RawDocument::validate)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(resolve_effective(&corpus, reference_date)
        .into_iter()
        .cloned()
        .collect())
}
