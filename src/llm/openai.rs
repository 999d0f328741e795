use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::provider::{Completion, LlmError, LlmProvider, Message, ProviderFactory};

/// Public OpenAI API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Model used for summaries unless configured otherwise.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// OpenAI-compatible `/v1/chat/completions` client.
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl OpenAiProvider {
    /// Provider for `model` at `base_url`, temperature 0.
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self::with_client(reqwest::Client::new(), api_key, model, base_url)
    }

    /// Provider reusing an existing HTTP client.
    pub fn with_client(client: reqwest::Client, api_key: String, model: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            temperature: 0.0,
        }
    }

    /// The model requests are sent to.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, messages: Vec<Message>) -> Result<Completion, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        debug!(%url, model = %self.model, messages = messages.len(), "chat completion request");

        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let resp: serde_json::Value = response.json().await?;
        parse_completion(&resp)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

fn parse_completion(resp: &serde_json::Value) -> Result<Completion, LlmError> {
    let content = resp["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| LlmError::Parse("missing choices[0].message.content".into()))?
        .to_string();
    let tokens_used = resp["usage"]["total_tokens"].as_u64().unwrap_or(0);

    Ok(Completion {
        content,
        tokens_used,
    })
}

/// Makes [`OpenAiProvider`]s that share one HTTP client.
#[derive(Debug, Clone)]
pub struct OpenAiFactory {
    client: reqwest::Client,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl OpenAiFactory {
    /// Factory for `model` at `base_url` with a request timeout.
    ///
    /// # Errors
    ///
    /// [`LlmError::Http`] if the HTTP client cannot be built (e.g. no TLS backend).
    pub fn new(
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            model: model.into(),
            base_url: base_url.into(),
            timeout,
        })
    }

    /// Factory for the public API, `gpt-3.5-turbo`, 60 s timeout.
    pub fn with_defaults() -> Result<Self, LlmError> {
        Self::new(DEFAULT_MODEL, DEFAULT_BASE_URL, Duration::from_secs(60))
    }

    /// Timeout applied to every request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl ProviderFactory for OpenAiFactory {
    fn provider(&self, api_key: &str) -> Box<dyn LlmProvider> {
        Box::new(OpenAiProvider::with_client(
            self.client.clone(),
            api_key.to_string(),
            self.model.clone(),
            self.base_url.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_completion() {
        let resp = json!({
            "choices": [{"message": {"role": "assistant", "content": "Short summary."}}],
            "usage": {"prompt_tokens": 40, "completion_tokens": 5, "total_tokens": 45}
        });
        let completion = parse_completion(&resp).unwrap();
        assert_eq!(completion.content, "Short summary.");
        assert_eq!(completion.tokens_used, 45);
    }

    #[test]
    fn test_parse_missing_content() {
        let resp = json!({"choices": []});
        assert!(matches!(parse_completion(&resp), Err(LlmError::Parse(_))));
    }

    #[test]
    fn test_factory_builds_openai_provider() {
        let provider = OpenAiFactory::with_defaults().unwrap().provider("sk-test");
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_factory_keeps_configured_timeout() {
        let factory =
            OpenAiFactory::new("gpt-4", "http://localhost:8080", Duration::from_secs(7)).unwrap();
        assert_eq!(factory.timeout(), Duration::from_secs(7));
    }

    #[test]
    fn test_message_serializes_lowercase_role() {
        let value = serde_json::to_value(Message::system("hi")).unwrap();
        assert_eq!(value, json!({"role": "system", "content": "hi"}));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let provider = OpenAiProvider::new(
            "sk-test".into(),
            DEFAULT_MODEL.into(),
            "http://127.0.0.1:1".into(),
        );
        let err = provider
            .complete(vec![Message::user("hello")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
    }
}
