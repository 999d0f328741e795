use std::sync::Arc;

use tracing::warn;

use crate::llm::{LlmError, OpenAiFactory, ProviderFactory, Summarizer, DEFAULT_MODEL};
use crate::{ModelTable, TokenCounter};

use super::config::ServerConfig;

/// Shared, read-only state behind every handler.
#[derive(Debug)]
pub struct AppState {
    /// Resolved startup configuration.
    pub config: ServerConfig,
    /// Context windows used for compatibility answers.
    pub models: ModelTable,
    /// Cached BPE encoders.
    pub tokens: TokenCounter,
    /// LLM summarization with credential fallback.
    pub summarizer: Summarizer,
}

impl AppState {
    /// State calling the OpenAI API described by `config`.
    ///
    /// # Errors
    ///
    /// [`LlmError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ServerConfig) -> Result<Self, LlmError> {
        let factory = OpenAiFactory::new(
            config.openai_model.clone(),
            config.openai_base_url.clone(),
            config.openai_timeout(),
        )?;
        Ok(Self::with_factory(config, Arc::new(factory)))
    }

    /// State with a custom provider factory.
    ///
    /// The encoder of the default tokenize model is loaded here, so the first
    /// request does not pay for it.
    pub fn with_factory(config: ServerConfig, factory: Arc<dyn ProviderFactory>) -> Self {
        let summarizer = Summarizer::new(factory, config.openai_api_key.clone());
        let tokens = TokenCounter::new();
        if let Err(err) = tokens.encoder(DEFAULT_MODEL) {
            warn!(%err, "could not preload the default encoder");
        }
        Self {
            config,
            models: ModelTable::default(),
            tokens,
            summarizer,
        }
    }

    /// Replace the model table.
    #[must_use]
    pub fn with_models(mut self, models: ModelTable) -> Self {
        self.models = models;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_encoder_preloaded() {
        let state = AppState::new(ServerConfig::default()).unwrap();
        assert!(state.tokens.is_cached(DEFAULT_MODEL));
        assert!(!state.tokens.is_cached("gpt-4"));
    }
}
