//! Configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the generative-AI client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AiConfig {
    /// Model to query.
    #[serde(default = "default_model")]
    pub model: String,
    /// Maximum tokens in response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Base URL for the API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable name for the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Let the model ground answers with web search.
    #[serde(default = "default_web_search")]
    pub web_search: bool,
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_temperature() -> f32 {
    0.1
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

fn default_web_search() -> bool {
    true
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            web_search: default_web_search(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Whether to enable permissive CORS.
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            cors_permissive: true,
        }
    }
}

/// Where the corpus comes from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CorpusConfig {
    /// JSON corpus file. The built-in fixture is used when unset.
    pub path: Option<PathBuf>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdvisorConfig {
    pub ai: AiConfig,
    pub server: ServerConfig,
    pub corpus: CorpusConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_config_defaults() {
        let config = AiConfig::default();
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert_eq!(config.max_tokens, 8192);
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(
            config.base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(config.api_key_env, "API_KEY");
        assert!(config.web_search);
    }

    #[test]
    fn test_ai_config_partial_deserialize() {
        let toml = r#"
            model = "gemini-2.5-pro"
            web_search = false
        "#;
        let config: AiConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert!(!config.web_search);
        assert_eq!(config.api_key_env, "API_KEY");
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8501);
        assert!(config.cors_permissive);
    }

    #[test]
    fn test_advisor_config_empty_toml() {
        let config: AdvisorConfig = toml::from_str("").unwrap();
        assert_eq!(config, AdvisorConfig::default());
        assert!(config.corpus.path.is_none());
    }
}
