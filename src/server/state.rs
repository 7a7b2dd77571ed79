//! Shared application state.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use crate::advisor::Advisor;
use crate::chat::ChatSession;
use crate::knowledge::{load_corpus, Corpus, CorpusSource, KnowledgeError};

/// State shared by every request handler.
///
/// The corpus is an immutable snapshot; a scan swaps in a new one while
/// in-flight requests keep the snapshot they started with.
#[derive(Clone)]
pub struct AppState {
    corpus: Arc<RwLock<Option<Arc<Corpus>>>>,
    last_scan_error: Arc<RwLock<Option<String>>>,
    session: Arc<Mutex<ChatSession>>,
    source: Arc<dyn CorpusSource>,
    advisor: Option<Advisor>,
    api_key_env: String,
    /// Cancellation token for graceful shutdown.
    pub cancel: CancellationToken,
}

impl AppState {
    /// Create state with no corpus indexed yet.
    ///
    /// `advisor` is `None` when the AI client could not be configured; chat
    /// requests then fail with a configuration error naming `api_key_env`.
    #[must_use]
    pub fn new(
        source: Arc<dyn CorpusSource>,
        advisor: Option<Advisor>,
        api_key_env: impl Into<String>,
    ) -> Self {
        Self {
            corpus: Arc::new(RwLock::new(None)),
            last_scan_error: Arc::new(RwLock::new(None)),
            session: Arc::new(Mutex::new(ChatSession::new())),
            source,
            advisor,
            api_key_env: api_key_env.into(),
            cancel: CancellationToken::new(),
        }
    }

    /// Current corpus snapshot, if one has been indexed.
    pub async fn corpus(&self) -> Option<Arc<Corpus>> {
        self.corpus.read().await.clone()
    }

    /// Replace the corpus snapshot.
    pub async fn set_corpus(&self, corpus: Corpus) {
        *self.corpus.write().await = Some(Arc::new(corpus));
    }

    /// Fetch from the configured source and index the result.
    ///
    /// The previous snapshot is kept if loading fails, and the failure is
    /// remembered until the next successful scan.
    ///
    /// # Errors
    ///
    /// Returns the `KnowledgeError` from fetching or validation.
    pub async fn scan(&self) -> Result<usize, KnowledgeError> {
        let corpus = match load_corpus(self.source.as_ref()).await {
            Ok(corpus) => corpus,
            Err(e) => {
                *self.last_scan_error.write().await = Some(e.to_string());
                return Err(e);
            }
        };
        let count = corpus.len();
        self.set_corpus(corpus).await;
        *self.last_scan_error.write().await = None;
        Ok(count)
    }

    /// Error of the last scan, if it failed. The snapshot in use then
    /// predates that scan.
    pub async fn last_scan_error(&self) -> Option<String> {
        self.last_scan_error.read().await.clone()
    }

    /// The conversation.
    #[must_use]
    pub fn session(&self) -> &Mutex<ChatSession> {
        &self.session
    }

    /// The advisor, when the AI client is configured.
    #[must_use]
    pub fn advisor(&self) -> Option<&Advisor> {
        self.advisor.as_ref()
    }

    /// Environment variable the API key is read from.
    #[must_use]
    pub fn api_key_env(&self) -> &str {
        &self.api_key_env
    }
}
