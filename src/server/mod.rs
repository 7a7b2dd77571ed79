//! HTTP API over the advisor: corpus scanning, effective documents, chat.

mod api;
mod error;
mod handlers;
#[allow(clippy::module_inception)]
mod server;
mod state;

pub use api::{ChatRequest, DocumentsQuery, DocumentsResponse, MessagesResponse, ScanResponse};
pub use error::ApiError;
pub use server::AdvisorServer;
pub use state::AppState;
