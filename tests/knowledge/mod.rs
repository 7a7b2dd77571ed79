//! Knowledge module tests.

mod properties_test;
mod resolver_test;

/// Verify the public knowledge types are exported from the library.
#[test]
fn test_all_knowledge_types_exported() {
    use cee_advisor::knowledge::{
        fixture_records, load_corpus, resolve_effective, resolve_raw, source_for, Corpus,
        CorpusSource, Document, DocumentKind, FixtureSource, JsonFileSource,
        KnowledgeError, RawDocument, POLICY_TAG, SHEET_TAG, VERSION_DATE_FORMAT,
    };

    let _: fn(&[Document], chrono::NaiveDate) -> Vec<&Document> = resolve_effective;
    let _: fn(&[RawDocument], chrono::NaiveDate) -> Result<Vec<Document>, KnowledgeError> =
        resolve_raw;
    let _ = load_corpus;
    let _ = source_for(None);
    let _ = JsonFileSource::new("corpus.json");
    let _ = DocumentKind::Policy;
    let _ = Corpus::default();
    let _: &dyn CorpusSource = &FixtureSource;

    assert_eq!(fixture_records().len(), 4);
    assert_eq!(SHEET_TAG, "SHEET");
    assert_eq!(POLICY_TAG, "POLICY");
    assert_eq!(VERSION_DATE_FORMAT, "%Y-%m-%d");
}
