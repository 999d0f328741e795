//! Request handlers. Each one decodes JSON, calls into the library, and
//! encodes the result.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm::{Summary, DEFAULT_MODEL};
use crate::{Chunker, RecursiveSplitter, SplitConfig};

use super::error::ApiError;
use super::state::AppState;

// ── Health ────────────────────────────────────────────────────────

/// `GET /api/health` reply.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
}

/// Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ── Tokenize ──────────────────────────────────────────────────────

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// `POST /api/tokenize` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenizeRequest {
    /// Text to count.
    pub text: String,
    /// Tokenizer model, `gpt-3.5-turbo` when omitted.
    #[serde(default = "default_model")]
    pub model: String,
}

/// `POST /api/tokenize` reply.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenizeResponse {
    /// Token count, exact or estimated.
    pub count: usize,
    /// Models whose window holds `count`; empty when the count is estimated.
    pub compatible_models: Vec<String>,
    /// Whether the word-count heuristic was used.
    pub estimated: bool,
}

/// Count tokens and list the models that could take the text.
pub async fn tokenize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TokenizeRequest>,
) -> Json<TokenizeResponse> {
    let count = state.tokens.count(&req.text, &req.model);
    let compatible_models = if count.estimated {
        Vec::new()
    } else {
        state.models.compatible(count.tokens)
    };

    debug!(model = %req.model, tokens = count.tokens, estimated = count.estimated, "tokenize");

    Json(TokenizeResponse {
        count: count.tokens,
        compatible_models,
        estimated: count.estimated,
    })
}

// ── Split ─────────────────────────────────────────────────────────

/// `POST /api/split` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct SplitRequest {
    /// Document to split.
    pub text: String,
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters repeated between neighbouring chunks.
    pub chunk_overlap: usize,
    /// Separator hierarchy; the prose default when omitted.
    #[serde(default)]
    pub separators: Option<Vec<String>>,
    /// Trim whitespace around each chunk.
    #[serde(default)]
    pub trim_whitespace: bool,
}

/// `POST /api/split` reply.
#[derive(Debug, Serialize, Deserialize)]
pub struct SplitResponse {
    /// Chunk texts in document order.
    pub chunks: Vec<String>,
    /// `chunks.len()`.
    pub count: usize,
}

/// Split a document with the recursive splitter.
pub async fn split(Json(req): Json<SplitRequest>) -> Result<Json<SplitResponse>, ApiError> {
    let mut config = SplitConfig::new(req.chunk_size, req.chunk_overlap);
    if let Some(separators) = req.separators {
        config.separators = separators;
    }
    config.trim_whitespace = req.trim_whitespace;
    let splitter = RecursiveSplitter::new(config)?;
    let chunks = splitter.split_text(&req.text);

    Ok(Json(SplitResponse {
        count: chunks.len(),
        chunks,
    }))
}

// ── Process ───────────────────────────────────────────────────────

/// `POST /api/process` body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessRequest {
    /// Text to summarize.
    pub text: String,
    /// Key overriding the server's configured one.
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Always 200: missing keys and provider failures come back as summary text.
pub async fn process(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProcessRequest>,
) -> Json<Summary> {
    Json(
        state
            .summarizer
            .summarize(&req.text, req.api_key.as_deref())
            .await,
    )
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::llm::{Completion, LlmError, LlmProvider, Message, ProviderFactory};
    use crate::server::{build_router, ServerConfig};
    use crate::ModelTable;

    struct FixedFactory;

    struct FixedProvider;

    #[async_trait]
    impl LlmProvider for FixedProvider {
        async fn complete(&self, _messages: Vec<Message>) -> Result<Completion, LlmError> {
            Ok(Completion {
                content: "A fixed summary.".into(),
                tokens_used: 57,
            })
        }

        fn provider_name(&self) -> &'static str {
            "fixed"
        }
    }

    impl ProviderFactory for FixedFactory {
        fn provider(&self, _api_key: &str) -> Box<dyn LlmProvider> {
            Box::new(FixedProvider)
        }
    }

    fn app() -> Router {
        let state = AppState::with_factory(ServerConfig::default(), Arc::new(FixedFactory));
        build_router(Arc::new(state))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        let body = body.map_or_else(Body::empty, |v| Body::from(v.to_string()));
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = send(app, method, uri, body).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send_json(app(), "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_tokenize_known_model() {
        let (status, body) = send_json(
            app(),
            "POST",
            "/api/tokenize",
            Some(json!({"text": "hello world", "model": "gpt-3.5-turbo"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["estimated"], false);
        assert_eq!(
            body["compatible_models"],
            json!(["gpt-3.5-turbo", "gpt-4", "gpt-4-turbo", "claude-3-opus"])
        );
    }

    #[tokio::test]
    async fn test_tokenize_defaults_model() {
        let (_, body) =
            send_json(app(), "POST", "/api/tokenize", Some(json!({"text": "hello world"}))).await;
        assert_eq!(body["count"], 2);
    }

    #[tokio::test]
    async fn test_tokenize_unknown_model_estimates() {
        let (status, body) = send_json(
            app(),
            "POST",
            "/api/tokenize",
            Some(json!({"text": "hello world", "model": "mystery-model"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);
        assert_eq!(body["estimated"], true);
        assert_eq!(body["compatible_models"], json!([]));
    }

    #[tokio::test]
    async fn test_tokenize_uses_injected_table() {
        let state = AppState::with_factory(ServerConfig::default(), Arc::new(FixedFactory))
            .with_models(ModelTable::empty().with_model("small", 1));
        let app = build_router(Arc::new(state));
        let (_, body) = send_json(
            app,
            "POST",
            "/api/tokenize",
            Some(json!({"text": "hello world", "model": "gpt-4"})),
        )
        .await;
        assert_eq!(body["compatible_models"], json!([]));
    }

    #[tokio::test]
    async fn test_split() {
        let text = "The quick brown fox jumps over the lazy dog.";
        let (status, body) = send_json(
            app(),
            "POST",
            "/api/split",
            Some(json!({"text": text, "chunk_size": 20, "chunk_overlap": 5})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["chunks"],
            json!(["The quick brown fox", " fox jumps over the", " the lazy dog."])
        );
        assert_eq!(body["count"], 3);
    }

    #[tokio::test]
    async fn test_split_empty_text() {
        let (status, body) = send_json(
            app(),
            "POST",
            "/api/split",
            Some(json!({"text": "", "chunk_size": 10, "chunk_overlap": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"chunks": [], "count": 0}));
    }

    #[tokio::test]
    async fn test_split_rejects_overlap() {
        let (status, body) = send_json(
            app(),
            "POST",
            "/api/split",
            Some(json!({"text": "abc", "chunk_size": 10, "chunk_overlap": 10})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("overlap"));
    }

    #[tokio::test]
    async fn test_split_custom_separators_and_trim() {
        let request = |trim: bool| {
            json!({
                "text": "ab -cd -ef",
                "chunk_size": 4,
                "chunk_overlap": 0,
                "separators": ["-"],
                "trim_whitespace": trim,
            })
        };

        let (status, body) = send_json(app(), "POST", "/api/split", Some(request(false))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chunks"], json!(["ab ", "-cd ", "-ef"]));

        let (status, body) = send_json(app(), "POST", "/api/split", Some(request(true))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"chunks": ["ab", "-cd", "-ef"], "count": 3}));
    }

    #[tokio::test]
    async fn test_split_rejects_empty_separators() {
        let (status, body) = send_json(
            app(),
            "POST",
            "/api/split",
            Some(json!({"text": "abc", "chunk_size": 10, "chunk_overlap": 0, "separators": []})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("separator"));
    }

    #[tokio::test]
    async fn test_split_rejects_negative_size() {
        let (status, _) = send(
            app(),
            "POST",
            "/api/split",
            Some(json!({"text": "abc", "chunk_size": -1, "chunk_overlap": 0})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_process_without_key_is_mock() {
        let (status, body) =
            send_json(app(), "POST", "/api/process", Some(json!({"text": "some document"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tokens_used"], 0);
        assert!(body["summary"].as_str().unwrap().contains("Mock Summary"));
    }

    #[tokio::test]
    async fn test_process_with_request_key() {
        let (status, body) = send_json(
            app(),
            "POST",
            "/api/process",
            Some(json!({"text": "some document", "api_key": "sk-request"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"summary": "A fixed summary.", "tokens_used": 57}));
    }

    #[tokio::test]
    async fn test_process_unreachable_provider_reports_error() {
        let config = ServerConfig {
            openai_api_key: Some("sk-env".into()),
            openai_base_url: "http://127.0.0.1:1".into(),
            openai_timeout_secs: 5,
            ..ServerConfig::default()
        };
        let app = build_router(Arc::new(AppState::new(config).unwrap()));
        let (status, body) =
            send_json(app, "POST", "/api/process", Some(json!({"text": "doc"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tokens_used"], 0);
        assert!(body["summary"]
            .as_str()
            .unwrap()
            .starts_with("Error calling OpenAI:"));
    }
}
