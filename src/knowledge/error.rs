//! Knowledge error types.

use std::path::PathBuf;

/// Errors raised while ingesting or validating regulatory documents.
#[derive(thiserror::Error, Debug)]
pub enum KnowledgeError {
    /// A document's `versionDate` is not a calendar date.
    #[error("Document {id} has an invalid version date {value:?}: {source}")]
    InvalidVersionDate {
        id: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// A sheet document has no code to group its versions by.
    #[error("Sheet document {id} has no code")]
    MissingCode { id: String },

    /// A document's source URL cannot be parsed.
    #[error("Document {id} has an invalid url {value:?}: {source}")]
    InvalidUrl {
        id: String,
        value: String,
        #[source]
        source: url::ParseError,
    },

    /// Two documents in the same corpus share an id.
    #[error("Duplicate document id {id}")]
    DuplicateId { id: String },

    /// Failed to read a corpus file.
    #[error("Failed to read corpus file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to decode a corpus file.
    #[error("Failed to decode corpus file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl KnowledgeError {
    /// Id of the offending document, when the error concerns a single record.
    #[must_use]
    pub fn document_id(&self) -> Option<&str> {
        match self {
            Self::InvalidVersionDate { id, .. }
            | Self::MissingCode { id }
            | Self::InvalidUrl { id, .. }
            | Self::DuplicateId { id } => Some(id),
            Self::Read { .. } | Self::Decode { .. } => None,
        }
    }
}
