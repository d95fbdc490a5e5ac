//! Chat-completion integration for the chatbot.
//!
//! The chatbot proxies conversations to a third-party chat-completion API.
//! `LlmProvider` keeps the endpoint logic independent of which one.

pub mod openai;
pub mod provider;

pub use openai::OpenAiCompatProvider;
pub use provider::*;

use std::sync::Arc;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default OpenAI-compatible base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub api_key: SecretString,
    pub model: String,
}

impl LlmConfig {
    /// Build from environment variables.
    ///
    /// Returns `Ok(None)` when `LEADFLOW_LLM_API_KEY` is not set (chatbot
    /// disabled).
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(api_key) = std::env::var("LEADFLOW_LLM_API_KEY") else {
            return Ok(None);
        };
        if api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "LEADFLOW_LLM_API_KEY".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        let base_url = std::env::var("LEADFLOW_LLM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("LEADFLOW_LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Some(Self {
            base_url,
            api_key: SecretString::from(api_key),
            model,
        }))
    }
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Arc<dyn LlmProvider> {
    tracing::info!(model = %config.model, base_url = %config.base_url, "Using chat provider");
    Arc::new(OpenAiCompatProvider::new(
        &config.base_url,
        config.api_key.clone(),
        &config.model,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_provider_keeps_model_name() {
        let config = LlmConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: SecretString::from("sk-test"),
            model: "gpt-4o".to_string(),
        };
        let provider = create_provider(&config);
        assert_eq!(provider.model_name(), "gpt-4o");
    }
}
