use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A chat message for the LLM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who is speaking.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl Message {
    /// A system instruction.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// A user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Speaker of a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions for the model.
    System,
    /// The human side.
    User,
    /// The model's own earlier turns.
    Assistant,
}

/// The model's reply and what it cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// Reply text.
    pub content: String,
    /// Prompt plus completion tokens reported by the provider.
    pub tokens_used: u64,
}

/// A chat-completion backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send `messages` and return the assistant's reply.
    async fn complete(&self, messages: Vec<Message>) -> Result<Completion, LlmError>;

    /// Short provider name for logs.
    fn provider_name(&self) -> &'static str;
}

/// Builds a provider for a given API key.
///
/// Keys can arrive per request, so providers are made on demand rather
/// than once at startup.
pub trait ProviderFactory: Send + Sync {
    /// A provider authenticated with `api_key`.
    fn provider(&self, api_key: &str) -> Box<dyn LlmProvider>;
}

/// Errors from an LLM call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Transport failure (DNS, TLS, timeout, ...).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The provider answered with a non-success status.
    #[error("API error: {status} {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, usually a JSON error object.
        body: String,
    },
    /// The response did not have the expected shape.
    #[error("failed to parse response: {0}")]
    Parse(String),
}
