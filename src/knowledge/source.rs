//! Corpus ingestion sources.

use std::path::PathBuf;

use async_trait::async_trait;

use super::corpus::Corpus;
use super::document::RawDocument;
use super::error::KnowledgeError;

/// Something that can deliver raw regulatory records.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Unique name for this source.
    fn source_name(&self) -> &'static str;

    /// Fetch every record the source knows about.
    async fn fetch(&self) -> Result<Vec<RawDocument>, KnowledgeError>;
}

/// Fetch from `source` and validate into a [`Corpus`].
///
/// # Errors
///
/// Returns any fetch error, or the first validation error.
pub async fn load_corpus(source: &dyn CorpusSource) -> Result<Corpus, KnowledgeError> {
    let records = source.fetch().await?;
    let fetched = records.len();

    let corpus = Corpus::from_raw(records).inspect_err(|e| {
        tracing::warn!(source = source.source_name(), error = %e, "Rejected corpus");
    })?;

    tracing::info!(
        source = source.source_name(),
        documents = fetched,
        codes = corpus.codes().len(),
        "Loaded corpus"
    );
    Ok(corpus)
}

/// Built-in snapshot of the CEE portal, used when no corpus file is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSource;

#[async_trait]
impl CorpusSource for FixtureSource {
    fn source_name(&self) -> &'static str {
        "Fixture"
    }

    async fn fetch(&self) -> Result<Vec<RawDocument>, KnowledgeError> {
        Ok(fixture_records())
    }
}

fn record(
    id: &str,
    doc_type: &str,
    code: Option<&str>,
    title: &str,
    version_date: &str,
    url: &str,
    content: &str,
) -> RawDocument {
    RawDocument {
        id: id.to_string(),
        doc_type: doc_type.to_string(),
        code: code.map(String::from),
        title: title.to_string(),
        content: content.to_string(),
        sector: code.map(|_| "Résidentiel".to_string()),
        version_date: version_date.to_string(),
        url: url.to_string(),
    }
}

/// Records of the built-in CEE portal snapshot.
#[must_use]
pub fn fixture_records() -> Vec<RawDocument> {
    vec![
        record(
            "pol-5eme-periode",
            "POLITIQUE",
            None,
            "Modalités de la 5ème période des CEE",
            "2022-01-01",
            "https://www.ecologie.gouv.fr/dispositif-des-certificats-deconomies-denergie",
            "La 5ème période (2022-2025) fixe un objectif de 2500 TWh cumac. \
             Elle renforce les contrôles.",
        ),
        record(
            "BAR-TH-164-v3",
            "FICHE",
            Some("BAR-TH-164"),
            "Pompe à chaleur de type air/eau",
            "2024-01-01",
            "https://www.ecologie.gouv.fr/sites/default/files/fiches/BAR-TH-164.pdf",
            "ETAS ≥ 111% pour basse température. COP mesuré selon NF EN 14511.",
        ),
        record(
            "BAR-TH-164-v2",
            "FICHE",
            Some("BAR-TH-164"),
            "Pompe à chaleur de type air/eau (Ancienne)",
            "2021-04-01",
            "https://www.ecologie.gouv.fr/sites/default/files/fiches/BAR-TH-164-v2.pdf",
            "ETAS ≥ 102%. Applicable avant le 1er Janvier 2024.",
        ),
        record(
            "BAR-EN-101",
            "FICHE",
            Some("BAR-EN-101"),
            "Isolation de combles ou de toitures",
            "2023-05-01",
            "https://www.ecologie.gouv.fr/sites/default/files/fiches/BAR-EN-101.pdf",
            "Résistance thermique R ≥ 7 m².K/W en combles perdus. ACERMI obligatoire.",
        ),
    ]
}

/// Records read from a JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Create a source reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this source reads from.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl CorpusSource for JsonFileSource {
    fn source_name(&self) -> &'static str {
        "JsonFile"
    }

    async fn fetch(&self) -> Result<Vec<RawDocument>, KnowledgeError> {
        tracing::debug!(path = %self.path.display(), "Reading corpus file");
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| KnowledgeError::Read {
                path: self.path.clone(),
                source,
            })?;

        serde_json::from_str(&content).map_err(|source| KnowledgeError::Decode {
            path: self.path.clone(),
            source,
        })
    }
}

/// Pick the source for an optional corpus file path.
#[must_use]
pub fn source_for(path: Option<PathBuf>) -> Box<dyn CorpusSource> {
    match path {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => Box::new(FixtureSource),
    }
}
