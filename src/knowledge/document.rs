//! Regulatory document records.
//!
//! [`RawDocument`] is the shape ingestion delivers (JSON, string dates).
//! [`Document`] is the validated form the resolver works on: the date is a
//! real calendar date and the sheet code only exists on sheets.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

use super::error::KnowledgeError;

/// Format of `versionDate` values.
pub const VERSION_DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical type tag for versioned technical sheets.
pub const SHEET_TAG: &str = "SHEET";

/// Canonical type tag for standalone policy documents.
pub const POLICY_TAG: &str = "POLICY";

/// Category of a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Standalone document with a single version.
    Policy,
    /// Versioned technical sheet; all versions share `code`.
    Sheet { code: String },
    /// Any other category. Treated like a policy when resolving.
    Other { tag: String },
}

impl DocumentKind {
    /// Build a kind from an ingestion type tag.
    ///
    /// The portal publishes French tags (`FICHE`, `POLITIQUE`), both spellings
    /// are accepted, case-insensitively.
    fn from_tag(id: &str, tag: &str, code: Option<&str>) -> Result<Self, KnowledgeError> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "SHEET" | "FICHE" => match code.map(str::trim) {
                Some(code) if !code.is_empty() => Ok(Self::Sheet {
                    code: code.to_string(),
                }),
                _ => Err(KnowledgeError::MissingCode { id: id.to_string() }),
            },
            "POLICY" | "POLITIQUE" => Ok(Self::Policy),
            _ => Ok(Self::Other {
                tag: tag.to_string(),
            }),
        }
    }

    /// Type tag used when the document is written back out.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Policy => POLICY_TAG,
            Self::Sheet { .. } => SHEET_TAG,
            Self::Other { tag } => tag,
        }
    }
}

/// A validated regulatory document version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Unique identifier within a corpus.
    pub id: String,
    /// Category, carrying the sheet code for sheets.
    pub kind: DocumentKind,
    /// Human-readable title.
    pub title: String,
    /// Text payload.
    pub content: String,
    /// Activity sector, when the source provides one.
    pub sector: Option<String>,
    /// Date from which this version is in force (inclusive).
    pub version_date: NaiveDate,
    /// Where the document was published.
    pub url: Url,
}

impl Document {
    /// Create a document without a sector.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: DocumentKind,
        title: impl Into<String>,
        content: impl Into<String>,
        version_date: NaiveDate,
        url: Url,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            title: title.into(),
            content: content.into(),
            sector: None,
            version_date,
            url,
        }
    }

    /// Set the activity sector (builder pattern).
    #[must_use]
    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    /// Sheet code, if this is a sheet.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match &self.kind {
            DocumentKind::Sheet { code } => Some(code),
            _ => None,
        }
    }

    /// Whether this document is a versioned sheet.
    #[must_use]
    pub fn is_sheet(&self) -> bool {
        matches!(self.kind, DocumentKind::Sheet { .. })
    }

    /// Whether this version is already in force on `date`.
    #[must_use]
    pub fn is_in_force_on(&self, date: NaiveDate) -> bool {
        self.version_date <= date
    }

    /// Short label for listings: the sheet code, or `DOC`.
    #[must_use]
    pub fn label(&self) -> &str {
        self.code().unwrap_or("DOC")
    }
}

/// A document as delivered by an ingestion source, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    pub version_date: String,
    pub url: String,
}

impl RawDocument {
    /// Validate into a [`Document`].
    ///
    /// # Errors
    ///
    /// Returns `KnowledgeError::InvalidVersionDate` if `versionDate` is not a
    /// `YYYY-MM-DD` date, `KnowledgeError::MissingCode` for a sheet without a
    /// code, and `KnowledgeError::InvalidUrl` if `url` does not parse.
    pub fn validate(self) -> Result<Document, KnowledgeError> {
        let kind = DocumentKind::from_tag(&self.id, &self.doc_type, self.code.as_deref())?;

        let version_date = NaiveDate::parse_from_str(&self.version_date, VERSION_DATE_FORMAT)
            .map_err(|source| KnowledgeError::InvalidVersionDate {
                id: self.id.clone(),
                value: self.version_date.clone(),
                source,
            })?;

        let url = Url::parse(&self.url).map_err(|source| KnowledgeError::InvalidUrl {
            id: self.id.clone(),
            value: self.url.clone(),
            source,
        })?;

        Ok(Document {
            id: self.id,
            kind,
            title: self.title,
            content: self.content,
            sector: self.sector,
            version_date,
            url,
        })
    }
}

/// The wire form of a validated document. Dates are written as
/// `YYYY-MM-DD` and the url in its canonical form, so a bare origin such as
/// `https://example.org` comes back with a trailing `/`.
impl From<&Document> for RawDocument {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            doc_type: doc.kind.tag().to_string(),
            code: doc.code().map(String::from),
            title: doc.title.clone(),
            content: doc.content.clone(),
            sector: doc.sector.clone(),
            version_date: doc.version_date.format(VERSION_DATE_FORMAT).to_string(),
            url: doc.url.to_string(),
        }
    }
}
