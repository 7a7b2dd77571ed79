//! HTTP handlers for the advisor API.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;

use super::api::{ChatRequest, DocumentsQuery, DocumentsResponse, MessagesResponse, ScanResponse};
use super::error::ApiError;
use super::state::AppState;
use crate::chat::ChatMessage;

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// POST /api/scan - Load the corpus from the configured source.
pub async fn post_scan(State(state): State<AppState>) -> Result<Json<ScanResponse>, ApiError> {
    let count = state.scan().await?;
    Ok(Json(ScanResponse::indexed(count)))
}

/// GET /api/documents - Documents in force at the requested date.
pub async fn get_documents(
    State(state): State<AppState>,
    query: Result<Query<DocumentsQuery>, QueryRejection>,
) -> Result<Json<DocumentsResponse>, ApiError> {
    let Query(query) = query?;
    let reference_date = query.date.unwrap_or_else(today);

    let response = match state.corpus().await {
        Some(corpus) => {
            DocumentsResponse::from_effective(&corpus.effective(reference_date), corpus.len())
        }
        None => DocumentsResponse::not_indexed(reference_date),
    };
    Ok(Json(response.with_scan_error(state.last_scan_error().await)))
}

/// GET /api/messages - Conversation history.
pub async fn get_messages(State(state): State<AppState>) -> Json<MessagesResponse> {
    let messages = state.session().lock().await.messages().to_vec();
    Json(MessagesResponse { messages })
}

/// DELETE /api/messages - Start a new conversation.
pub async fn delete_messages(State(state): State<AppState>) -> Json<MessagesResponse> {
    let mut session = state.session().lock().await;
    session.clear();
    Json(MessagesResponse {
        messages: session.messages().to_vec(),
    })
}

/// POST /api/chat - Ask a question at a reference date.
///
/// Nothing is sent to the model unless a corpus is indexed; a failed answer
/// leaves the question in the history without a reply.
pub async fn post_chat(
    State(state): State<AppState>,
    request: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatMessage>, ApiError> {
    let Json(request) = request?;
    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::InvalidRequest("prompt is empty".to_string()));
    }
    let corpus = state.corpus().await.ok_or(ApiError::NotIndexed)?;
    let advisor = state
        .advisor()
        .ok_or_else(|| ApiError::Configuration(state.api_key_env().to_string()))?;
    let reference_date = request.date.unwrap_or_else(today);
    if let Some(error) = state.last_scan_error().await {
        tracing::warn!(%error, "Answering from the snapshot before the last failed scan");
    }

    state.session().lock().await.push_user(prompt);

    let answer = advisor.ask(prompt, &corpus, reference_date).await?;

    let message = state
        .session()
        .lock()
        .await
        .push_assistant(answer.text, answer.sources)
        .clone();
    Ok(Json(message))
}
