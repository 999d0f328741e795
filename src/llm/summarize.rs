use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::provider::{LlmProvider, Message, ProviderFactory};
use crate::Chunk;

/// Placeholder returned when no API key is available.
pub const MOCK_SUMMARY: &str =
    "Mock Summary: No API Key found. Please add it to .env or the text input.";

const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes text concisely.";

/// Outcome of one summarization, successful or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Summary text, the mock placeholder, or an error description.
    pub summary: String,
    /// Tokens billed for the call; 0 for mocks and failures.
    pub tokens_used: u64,
}

impl Summary {
    fn mock() -> Self {
        Self {
            summary: MOCK_SUMMARY.to_string(),
            tokens_used: 0,
        }
    }
}

/// Per-chunk summaries of a split document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkedSummary {
    /// One summary per processed chunk, in chunk order.
    pub summaries: Vec<Summary>,
    /// Sum of `tokens_used` over `summaries`.
    pub total_tokens: u64,
    /// Number of chunks in the document, processed or not.
    pub chunks_total: usize,
}

/// Summarizes text with whichever credential is available.
///
/// Credential precedence: a non-empty key passed with the call, then the
/// key configured at construction, then none (mock response). Provider
/// errors are reported in the summary text with `tokens_used = 0`; they are
/// not retried.
pub struct Summarizer {
    factory: Arc<dyn ProviderFactory>,
    api_key: Option<String>,
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl Summarizer {
    /// Summarizer using `factory`, with an optional configured key.
    pub fn new(factory: Arc<dyn ProviderFactory>, api_key: Option<String>) -> Self {
        Self {
            factory,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Whether a key is configured (requests may still bring their own).
    pub fn has_configured_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// The key a call would use.
    pub fn resolve_key<'a>(&'a self, request_key: Option<&'a str>) -> Option<&'a str> {
        request_key
            .filter(|k| !k.trim().is_empty())
            .or(self.api_key.as_deref())
    }

    /// Two-sentence summary of `text`.
    pub async fn summarize(&self, text: &str, request_key: Option<&str>) -> Summary {
        let Some(key) = self.resolve_key(request_key) else {
            info!("no API key available, returning mock summary");
            return Summary::mock();
        };

        let messages = vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(format!(
                "Please provide a 2-sentence summary of the following text:\n\n{text}"
            )),
        ];
        let provider = self.factory.provider(key);
        run(provider.as_ref(), messages).await
    }

    /// Summarize the first `limit` chunks one by one and total the token usage.
    ///
    /// Chunks are processed sequentially; a failed chunk contributes its
    /// error text and zero tokens without stopping the rest.
    pub async fn summarize_chunks(
        &self,
        chunks: &[Chunk],
        limit: usize,
        request_key: Option<&str>,
    ) -> ChunkedSummary {
        let selected = &chunks[..limit.min(chunks.len())];

        let summaries = match self.resolve_key(request_key) {
            None => {
                info!(chunks = selected.len(), "no API key available, returning mock summaries");
                selected.iter().map(|_| Summary::mock()).collect()
            }
            Some(key) => {
                let provider = self.factory.provider(key);
                let mut summaries = Vec::with_capacity(selected.len());
                for chunk in selected {
                    let messages = vec![Message::user(format!(
                        "Provide a brief summary (2-3 sentences) of the following text:\n\n{}",
                        chunk.text
                    ))];
                    let summary = run(provider.as_ref(), messages).await;
                    debug!(index = chunk.index, tokens = summary.tokens_used, "chunk summarized");
                    summaries.push(summary);
                }
                summaries
            }
        };

        ChunkedSummary {
            total_tokens: summaries.iter().map(|s| s.tokens_used).sum(),
            summaries,
            chunks_total: chunks.len(),
        }
    }
}

async fn run(provider: &dyn LlmProvider, messages: Vec<Message>) -> Summary {
    match provider.complete(messages).await {
        Ok(completion) => Summary {
            summary: completion.content,
            tokens_used: completion.tokens_used,
        },
        Err(err) => {
            warn!(provider = provider.provider_name(), %err, "LLM call failed");
            Summary {
                summary: format!("Error calling OpenAI: {err}"),
                tokens_used: 0,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::llm::{Completion, LlmError};

    /// Echoes the key and the last message back.
    struct EchoFactory;

    struct EchoProvider {
        key: String,
    }

    #[async_trait]
    impl LlmProvider for EchoProvider {
        async fn complete(&self, messages: Vec<Message>) -> Result<Completion, LlmError> {
            let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            Ok(Completion {
                content: format!("[{}] {}", self.key, last),
                tokens_used: 42,
            })
        }

        fn provider_name(&self) -> &'static str {
            "echo"
        }
    }

    impl ProviderFactory for EchoFactory {
        fn provider(&self, api_key: &str) -> Box<dyn LlmProvider> {
            Box::new(EchoProvider {
                key: api_key.to_string(),
            })
        }
    }

    struct RejectingFactory;

    struct RejectingProvider;

    #[async_trait]
    impl LlmProvider for RejectingProvider {
        async fn complete(&self, _messages: Vec<Message>) -> Result<Completion, LlmError> {
            Err(LlmError::Api {
                status: 401,
                body: "invalid api key".into(),
            })
        }

        fn provider_name(&self) -> &'static str {
            "rejecting"
        }
    }

    impl ProviderFactory for RejectingFactory {
        fn provider(&self, _api_key: &str) -> Box<dyn LlmProvider> {
            Box::new(RejectingProvider)
        }
    }

    #[tokio::test]
    async fn test_no_key_returns_mock() {
        let summarizer = Summarizer::new(Arc::new(EchoFactory), None);
        let summary = summarizer.summarize("some text", None).await;
        assert_eq!(summary.tokens_used, 0);
        assert!(summary.summary.contains("Mock Summary"));
    }

    #[tokio::test]
    async fn test_empty_request_key_falls_back_to_configured() {
        let summarizer = Summarizer::new(Arc::new(EchoFactory), Some("env-key".into()));
        let summary = summarizer.summarize("doc", Some("")).await;
        assert!(summary.summary.starts_with("[env-key]"));
        assert_eq!(summary.tokens_used, 42);
    }

    #[tokio::test]
    async fn test_request_key_wins() {
        let summarizer = Summarizer::new(Arc::new(EchoFactory), Some("env-key".into()));
        let summary = summarizer.summarize("doc", Some("request-key")).await;
        assert!(summary.summary.starts_with("[request-key]"));
        assert!(summary.summary.ends_with("following text:\n\ndoc"));
    }

    #[tokio::test]
    async fn test_provider_error_becomes_text() {
        let summarizer = Summarizer::new(Arc::new(RejectingFactory), Some("bad".into()));
        let summary = summarizer.summarize("doc", None).await;
        assert_eq!(summary.tokens_used, 0);
        assert!(summary.summary.starts_with("Error calling OpenAI:"));
        assert!(summary.summary.contains("401"));
    }

    #[tokio::test]
    async fn test_summarize_chunks_totals_tokens() {
        let chunks = vec![
            Chunk::new("one", 0, 3, 0),
            Chunk::new("two", 3, 6, 1),
            Chunk::new("three", 6, 11, 2),
        ];
        let summarizer = Summarizer::new(Arc::new(EchoFactory), Some("k".into()));
        let result = summarizer.summarize_chunks(&chunks, 2, None).await;

        assert_eq!(result.summaries.len(), 2);
        assert_eq!(result.total_tokens, 84);
        assert_eq!(result.chunks_total, 3);
        assert!(result.summaries[1].summary.ends_with("two"));
    }

    #[tokio::test]
    async fn test_summarize_chunks_without_key() {
        let chunks = vec![Chunk::new("one", 0, 3, 0)];
        let summarizer = Summarizer::new(Arc::new(EchoFactory), Some("   ".into()));
        assert!(!summarizer.has_configured_key());
        let result = summarizer.summarize_chunks(&chunks, 10, None).await;
        assert_eq!(result.total_tokens, 0);
        assert_eq!(result.summaries, vec![Summary::mock()]);
    }
}
