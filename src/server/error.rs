//! HTTP error responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::advisor::AdvisorError;
use crate::ai::AiError;
use crate::knowledge::KnowledgeError;

/// Errors returned by the HTTP handlers.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// The request itself is unusable.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Chat was requested before any corpus was scanned.
    #[error("No corpus indexed, scan the portal first")]
    NotIndexed,

    /// The AI client is not configured.
    #[error("AI API key is not configured (env: {0})")]
    Configuration(String),

    /// The corpus could not be loaded.
    #[error(transparent)]
    Corpus(#[from] KnowledgeError),

    /// The model request failed.
    #[error(transparent)]
    Ai(AiError),
}

impl ApiError {
    /// HTTP status and machine-readable code.
    #[must_use]
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            Self::NotIndexed => (StatusCode::CONFLICT, "NOT_INDEXED"),
            Self::Configuration(_) => (StatusCode::SERVICE_UNAVAILABLE, "CONFIGURATION_ERROR"),
            Self::Corpus(_) => (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_CORPUS"),
            Self::Ai(AiError::Timeout) => (StatusCode::GATEWAY_TIMEOUT, "AI_TIMEOUT"),
            Self::Ai(_) => (StatusCode::BAD_GATEWAY, "AI_ERROR"),
        }
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::MissingApiKey(env) => Self::Configuration(env),
            other => Self::Ai(other),
        }
    }
}

impl From<AdvisorError> for ApiError {
    fn from(err: AdvisorError) -> Self {
        match err {
            AdvisorError::EmptyQuestion => Self::InvalidRequest("Question is empty".to_string()),
            AdvisorError::Knowledge(e) => Self::Corpus(e),
            AdvisorError::Ai(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::warn!(error = %self, code, "Request failed");
        }

        let mut body = serde_json::json!({
            "error": self.to_string(),
            "code": code,
        });
        if let Self::Corpus(e) = &self {
            if let Some(id) = e.document_id() {
                body["document_id"] = serde_json::json!(id);
            }
        }

        (status, Json(body)).into_response()
    }
}
