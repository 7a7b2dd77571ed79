//! Gemini client with web-search grounding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::AiConfig;

/// Connection timeout for HTTP requests.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall request timeout. Grounded answers run searches first.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum number of retries for transient failures.
const MAX_RETRIES: u32 = 3;

/// Title used for grounding chunks that come without one.
pub const DEFAULT_SOURCE_TITLE: &str = "Web source";

fn build_http_client() -> Result<Client, AiError> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| AiError::RequestFailed(format!("Failed to build HTTP client: {e}")))
}

/// Determine if a request should be retried based on status code and attempt count.
fn should_retry(status_code: u16, attempt: u32) -> bool {
    if attempt >= MAX_RETRIES {
        return false;
    }
    (500..600).contains(&status_code)
}

/// Exponential backoff: 1s, 2s, 4s.
fn calculate_backoff(attempt: u32) -> Duration {
    Duration::from_secs(1 << attempt)
}

/// A web page the model used to ground its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLink {
    pub title: String,
    pub url: String,
}

/// Text produced by the model, with its grounding sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAnswer {
    pub text: String,
    pub sources: Vec<SourceLink>,
}

/// Errors from AI client operations.
#[derive(Error, Debug)]
pub enum AiError {
    #[error("API key not configured (env: {0})")]
    MissingApiKey(String),
    #[error("API request failed: {0}")]
    RequestFailed(String),
    #[error("Failed to parse response: {0}")]
    ParseError(String),
    #[error("Model returned no text")]
    EmptyResponse,
    #[error("AI request timed out")]
    Timeout,
}

/// A generative model that answers with optional grounding sources.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Generate an answer to `user` under the `system` instruction.
    async fn generate(&self, system: &str, user: &str) -> Result<GeneratedAnswer, AiError>;
}

/// Gemini `generateContent` provider.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    web_search: bool,
}

impl GeminiProvider {
    /// Create a provider from configuration and a resolved API key.
    ///
    /// # Errors
    ///
    /// Returns `AiError::RequestFailed` if the HTTP client cannot be built.
    pub fn new(config: &AiConfig, api_key: String) -> Result<Self, AiError> {
        Ok(Self {
            client: build_http_client()?,
            base_url: config.base_url.clone(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            web_search: config.web_search,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    fn request_body(&self, system: &str, user: &str) -> Value {
        let mut body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": user }]
            }],
            "systemInstruction": {
                "parts": [{ "text": system }]
            },
            "generationConfig": {
                "maxOutputTokens": self.max_tokens,
                "temperature": self.temperature
            }
        });
        if self.web_search {
            body["tools"] = serde_json::json!([{ "google_search": {} }]);
        }
        body
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    async fn generate(&self, system: &str, user: &str) -> Result<GeneratedAnswer, AiError> {
        let url = self.endpoint();
        let body = self.request_body(system, user);

        let mut attempt = 0;
        loop {
            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        AiError::Timeout
                    } else {
                        AiError::RequestFailed(e.to_string())
                    }
                })?;

            let status = response.status();
            if status.is_success() {
                let json: Value = response
                    .json()
                    .await
                    .map_err(|e| AiError::ParseError(e.to_string()))?;
                return parse_generate_response(&json);
            }

            let status_code = status.as_u16();
            if should_retry(status_code, attempt) {
                let backoff = calculate_backoff(attempt);
                tracing::warn!(
                    status = status_code,
                    attempt,
                    backoff_secs = backoff.as_secs(),
                    "Gemini request failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
                continue;
            }

            let text = response.text().await.unwrap_or_default();
            return Err(AiError::RequestFailed(format!("HTTP {status}: {text}")));
        }
    }
}

/// Parse a `generateContent` response body.
///
/// The answer is the concatenation of every text part of the first
/// candidate; sources come from its grounding metadata.
///
/// # Errors
///
/// Returns `AiError::ParseError` if there is no candidate and
/// `AiError::EmptyResponse` if the candidate carries no text.
pub fn parse_generate_response(json: &Value) -> Result<GeneratedAnswer, AiError> {
    let candidate = json["candidates"]
        .get(0)
        .ok_or_else(|| AiError::ParseError("No candidate in Gemini response".to_string()))?;

    let text: String = candidate["content"]["parts"]
        .as_array()
        .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AiError::EmptyResponse);
    }

    Ok(GeneratedAnswer {
        text,
        sources: extract_sources(json),
    })
}

/// Collect the web pages listed in the first candidate's grounding metadata.
///
/// Chunks without a web entry or URI are skipped; repeated URIs are kept once.
#[must_use]
pub fn extract_sources(json: &Value) -> Vec<SourceLink> {
    let Some(chunks) = json["candidates"][0]["groundingMetadata"]["groundingChunks"].as_array()
    else {
        return Vec::new();
    };

    let mut sources: Vec<SourceLink> = Vec::new();
    for web in chunks.iter().map(|c| &c["web"]) {
        let Some(uri) = web["uri"].as_str() else {
            continue;
        };
        if sources.iter().any(|s| s.url == uri) {
            continue;
        }
        let title = web["title"]
            .as_str()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_SOURCE_TITLE);
        sources.push(SourceLink {
            title: title.to_string(),
            url: uri.to_string(),
        });
    }
    sources
}

/// Client for the configured model.
#[derive(Debug, Clone)]
pub struct AiClient {
    provider: GeminiProvider,
    config: AiConfig,
}

impl AiClient {
    /// Create client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `AiError::MissingApiKey` if the configured API key environment
    /// variable is not set or empty.
    pub fn from_config(config: AiConfig) -> Result<Self, AiError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AiError::MissingApiKey(config.api_key_env.clone()))?;

        let provider = GeminiProvider::new(&config, api_key)?;
        Ok(Self { provider, config })
    }

    /// Get the configured model.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl AiProvider for AiClient {
    async fn generate(&self, system: &str, user: &str) -> Result<GeneratedAnswer, AiError> {
        tracing::debug!(model = %self.config.model, "Sending advisor request");
        self.provider.generate(system, user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(web_search: bool) -> GeminiProvider {
        let config = AiConfig {
            base_url: "https://api.example.com/v1beta/".to_string(),
            model: "gemini-test".to_string(),
            web_search,
            ..AiConfig::default()
        };
        GeminiProvider::new(&config, "test-key".to_string()).unwrap()
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        assert_eq!(
            provider(true).endpoint(),
            "https://api.example.com/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_request_body_with_search_tool() {
        let body = provider(true).request_body("system text", "question");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "question");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "system text");
        assert!(body["tools"][0]["google_search"].is_object());
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 8192);
    }

    #[test]
    fn test_request_body_without_search_tool() {
        let body = provider(false).request_body("s", "u");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_should_retry_logic() {
        assert!(should_retry(500, 0));
        assert!(should_retry(503, 2));
        assert!(!should_retry(400, 0));
        assert!(!should_retry(429, 0));
        assert!(!should_retry(200, 0));
        assert!(!should_retry(500, MAX_RETRIES));
    }

    #[test]
    fn test_calculate_backoff() {
        assert_eq!(calculate_backoff(0).as_secs(), 1);
        assert_eq!(calculate_backoff(1).as_secs(), 2);
        assert_eq!(calculate_backoff(2).as_secs(), 4);
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let json = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "La fiche " }, { "text": "BAR-TH-164." }] }
            }]
        });
        let answer = parse_generate_response(&json).unwrap();
        assert_eq!(answer.text, "La fiche BAR-TH-164.");
        assert!(answer.sources.is_empty());
    }

    #[test]
    fn test_parse_response_without_candidate() {
        let json = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(matches!(
            parse_generate_response(&json),
            Err(AiError::ParseError(_))
        ));
    }

    #[test]
    fn test_parse_response_without_text() {
        let json = serde_json::json!({ "candidates": [{ "content": { "parts": [] } }] });
        assert!(matches!(
            parse_generate_response(&json),
            Err(AiError::EmptyResponse)
        ));
    }

    #[test]
    fn test_extract_sources() {
        let json = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "ok" }] },
                "groundingMetadata": {
                    "groundingChunks": [
                        { "web": { "uri": "https://a.example/1", "title": "Arrêté" } },
                        { "web": { "uri": "https://a.example/2" } },
                        { "retrievedContext": { "uri": "ignored" } },
                        { "web": { "uri": "https://a.example/1", "title": "Duplicate" } }
                    ]
                }
            }]
        });
        let sources = extract_sources(&json);
        assert_eq!(
            sources,
            vec![
                SourceLink {
                    title: "Arrêté".to_string(),
                    url: "https://a.example/1".to_string(),
                },
                SourceLink {
                    title: DEFAULT_SOURCE_TITLE.to_string(),
                    url: "https://a.example/2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_extract_sources_without_metadata() {
        let json = serde_json::json!({ "candidates": [] });
        assert!(extract_sources(&json).is_empty());
    }

    #[test]
    fn test_from_config_missing_key() {
        let config = AiConfig {
            api_key_env: "CEE_ADVISOR_TEST_UNSET_KEY".to_string(),
            ..AiConfig::default()
        };
        let result = AiClient::from_config(config);
        assert!(matches!(result, Err(AiError::MissingApiKey(ref env)) if env == "CEE_ADVISOR_TEST_UNSET_KEY"));
    }

    #[test]
    fn test_from_config_with_key() {
        std::env::set_var("CEE_ADVISOR_TEST_KEY", "test-key");
        let config = AiConfig {
            api_key_env: "CEE_ADVISOR_TEST_KEY".to_string(),
            model: "gemini-test".to_string(),
            ..AiConfig::default()
        };
        let client = AiClient::from_config(config).unwrap();
        assert_eq!(client.model(), "gemini-test");
        std::env::remove_var("CEE_ADVISOR_TEST_KEY");
    }
}
