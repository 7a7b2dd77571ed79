//! Validated document corpus and its effective view.

use std::collections::HashSet;

use chrono::NaiveDate;

use super::document::{Document, RawDocument};
use super::error::KnowledgeError;
use super::resolver::resolve_effective;

/// An immutable, validated snapshot of known documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Build a corpus from validated documents.
    ///
    /// # Errors
    ///
    /// Returns `KnowledgeError::DuplicateId` if two documents share an id.
    pub fn new(documents: Vec<Document>) -> Result<Self, KnowledgeError> {
        let mut seen = HashSet::with_capacity(documents.len());
        for doc in &documents {
            if !seen.insert(doc.id.as_str()) {
                return Err(KnowledgeError::DuplicateId { id: doc.id.clone() });
            }
        }
        Ok(Self { documents })
    }

    /// Validate raw ingestion records into a corpus.
    ///
    /// The first invalid record aborts the whole load.
    ///
    /// # Errors
    ///
    /// Returns the validation error of the first bad record, or
    /// `KnowledgeError::DuplicateId`.
    pub fn from_raw(records: Vec<RawDocument>) -> Result<Self, KnowledgeError> {
        let documents = records
            .into_iter()
            .map(RawDocument::validate)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(documents)
    }

    /// All documents in ingestion order.
    #[must_use]
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the corpus is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up a document by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Distinct sheet codes in first-seen order.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.documents
            .iter()
            .filter_map(Document::code)
            .filter(|code| seen.insert(*code))
            .collect()
    }

    /// Documents in force on `reference_date`.
    #[must_use]
    pub fn effective(&self, reference_date: NaiveDate) -> EffectiveSet<'_> {
        EffectiveSet {
            reference_date,
            documents: resolve_effective(&self.documents, reference_date),
        }
    }
}

/// The documents of a [`Corpus`] in force on a given date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveSet<'a> {
    reference_date: NaiveDate,
    documents: Vec<&'a Document>,
}

impl<'a> EffectiveSet<'a> {
    /// Date the set was resolved for.
    #[must_use]
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Selected documents: sheets first, then everything else.
    #[must_use]
    pub fn documents(&self) -> &[&'a Document] {
        &self.documents
    }

    /// Selected sheet versions, one per code.
    pub fn sheets(&self) -> impl Iterator<Item = &'a Document> + '_ {
        self.documents.iter().copied().filter(|d| d.is_sheet())
    }

    /// Selected non-sheet documents.
    pub fn policies(&self) -> impl Iterator<Item = &'a Document> + '_ {
        self.documents.iter().copied().filter(|d| !d.is_sheet())
    }

    /// The version of sheet `code` in force, if any.
    #[must_use]
    pub fn sheet(&self, code: &str) -> Option<&'a Document> {
        self.documents
            .iter()
            .copied()
            .find(|d| d.code() == Some(code))
    }

    /// Number of selected documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if nothing is in force.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
