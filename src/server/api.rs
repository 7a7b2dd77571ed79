//! Request and response types for the HTTP endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;
use crate::knowledge::{EffectiveSet, RawDocument};

/// Query parameters for GET /api/documents.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentsQuery {
    /// Reference date; today when omitted.
    pub date: Option<NaiveDate>,
}

/// Response for GET /api/documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsResponse {
    /// Whether a corpus has been scanned.
    pub indexed: bool,
    pub reference_date: NaiveDate,
    /// Size of the whole corpus.
    pub total: usize,
    /// Documents in force at `reference_date`.
    pub documents: Vec<RawDocument>,
    /// Set when the last scan failed; the listing then comes from an older
    /// snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_scan_error: Option<String>,
}

impl DocumentsResponse {
    /// Response for a server that has not scanned anything yet.
    #[must_use]
    pub fn not_indexed(reference_date: NaiveDate) -> Self {
        Self {
            indexed: false,
            reference_date,
            total: 0,
            documents: Vec::new(),
            last_scan_error: None,
        }
    }

    /// Response listing an effective set.
    #[must_use]
    pub fn from_effective(effective: &EffectiveSet<'_>, total: usize) -> Self {
        Self {
            indexed: true,
            reference_date: effective.reference_date(),
            total,
            documents: effective
                .documents()
                .iter()
                .map(|d| RawDocument::from(*d))
                .collect(),
            last_scan_error: None,
        }
    }

    /// Attach the error of a failed scan.
    #[must_use]
    pub fn with_scan_error(mut self, error: Option<String>) -> Self {
        self.last_scan_error = error;
        self
    }
}

/// Response for POST /api/scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResponse {
    pub success: bool,
    pub message: String,
    /// Number of documents indexed.
    pub documents: usize,
}

impl ScanResponse {
    /// Create a success response.
    #[must_use]
    pub fn indexed(documents: usize) -> Self {
        Self {
            success: true,
            message: format!("{documents} documents indexed"),
            documents,
        }
    }
}

/// Body of POST /api/chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    /// Reference date; today when omitted.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Response for GET /api/messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub messages: Vec<ChatMessage>,
}
