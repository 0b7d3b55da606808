use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRef, OriginalUri, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use super::common::{ErrorType, RequestLog, find_custom_response, unexpected};
use super::provider::{LlmProviderConfig, ProviderType, TestLlmProvider};

/// Builder for OpenAI test server
pub struct OpenAIMock {
    name: String,
    custom_responses: HashMap<String, String>,
    embedding: Vec<f32>,
    error_type: Option<ErrorType>,
    empty_content: bool,
}

impl OpenAIMock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            custom_responses: HashMap::new(),
            embedding: vec![0.1, 0.2, 0.3],
            error_type: None,
            empty_content: false,
        }
    }

    pub fn with_response(mut self, trigger: impl Into<String>, response: impl Into<String>) -> Self {
        self.custom_responses.insert(trigger.into(), response.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    /// Answer with a choice whose content is null.
    pub fn with_empty_content(mut self) -> Self {
        self.empty_content = true;
        self
    }

    pub fn with_auth_error(mut self, message: impl Into<String>) -> Self {
        self.error_type = Some(ErrorType::AuthError(message.into()));
        self
    }

    pub fn with_model_not_found(mut self, message: impl Into<String>) -> Self {
        self.error_type = Some(ErrorType::ModelNotFound(message.into()));
        self
    }

    pub fn with_rate_limit(mut self, message: impl Into<String>) -> Self {
        self.error_type = Some(ErrorType::RateLimit(message.into()));
        self
    }

    pub fn with_quota_exceeded(mut self, message: impl Into<String>) -> Self {
        self.error_type = Some(ErrorType::QuotaExceeded(message.into()));
        self
    }

    pub fn with_bad_request(mut self, message: impl Into<String>) -> Self {
        self.error_type = Some(ErrorType::BadRequest(message.into()));
        self
    }

    pub fn with_internal_error(mut self, message: impl Into<String>) -> Self {
        self.error_type = Some(ErrorType::InternalError(message.into()));
        self
    }

    pub fn with_service_unavailable(mut self, message: impl Into<String>) -> Self {
        self.error_type = Some(ErrorType::ServiceUnavailable(message.into()));
        self
    }

    pub fn with_malformed_response(mut self) -> Self {
        self.error_type = Some(ErrorType::Malformed);
        self
    }
}

impl TestLlmProvider for OpenAIMock {
    fn name(&self) -> &str {
        &self.name
    }

    async fn spawn(self: Box<Self>) -> anyhow::Result<LlmProviderConfig> {
        let requests = RequestLog::default();

        let state = Arc::new(TestOpenAIState {
            custom_responses: self.custom_responses,
            embedding: self.embedding,
            error_type: self.error_type,
            empty_content: self.empty_content,
            requests: requests.clone(),
        });

        let app = Router::new()
            .route("/v1/chat/completions", post(chat_completions))
            .route("/v1/embeddings", post(embeddings))
            .fallback(unexpected)
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server time to start
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        Ok(LlmProviderConfig {
            name: self.name.clone(),
            address,
            provider_type: ProviderType::OpenAI,
            requests,
        })
    }
}

struct TestOpenAIState {
    custom_responses: HashMap<String, String>,
    embedding: Vec<f32>,
    error_type: Option<ErrorType>,
    empty_content: bool,
    requests: RequestLog,
}

impl FromRef<Arc<TestOpenAIState>> for RequestLog {
    fn from_ref(state: &Arc<TestOpenAIState>) -> Self {
        state.requests.clone()
    }
}

/// Handle chat completion requests
async fn chat_completions(
    State(state): State<Arc<TestOpenAIState>>,
    uri: OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.requests.record(&uri, &headers, &body);

    if let Some(error_type) = state.error_type.clone() {
        return error_type.into_plain_response();
    }

    let request: ChatCompletionRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response(),
    };

    if request.stream {
        return (StatusCode::BAD_REQUEST, "Streaming is not supported by the mock").into_response();
    }

    let response_text = find_custom_response(
        request.messages.iter().map(|message| message.content.as_str()),
        &state.custom_responses,
    )
    .unwrap_or_else(|| "This is a test response from the mock LLM server".to_string());

    let content = (!state.empty_content).then_some(response_text);

    let response = ChatCompletionResponse {
        id: "chatcmpl-test".to_string(),
        object: "chat.completion".to_string(),
        created: 1677651200,
        model: request.model,
        choices: vec![ChatChoice {
            index: 0,
            message: ResponseMessage {
                role: "assistant".to_string(),
                content,
            },
            finish_reason: "stop".to_string(),
        }],
        usage: Usage {
            prompt_tokens: 10,
            completion_tokens: 15,
            total_tokens: 25,
        },
    };

    Json(response).into_response()
}

/// Handle embedding requests
async fn embeddings(
    State(state): State<Arc<TestOpenAIState>>,
    uri: OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.requests.record(&uri, &headers, &body);

    if let Some(error_type) = state.error_type.clone() {
        return error_type.into_plain_response();
    }

    let request: EmbeddingRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response(),
    };

    Json(serde_json::json!({
        "object": "list",
        "data": [{ "object": "embedding", "index": 0, "embedding": state.embedding }],
        "model": request.model,
        "usage": { "prompt_tokens": request.input.split_whitespace().count(), "total_tokens": request.input.split_whitespace().count() }
    }))
    .into_response()
}

// Request/Response types (matching OpenAI API structure)

#[derive(Debug, Deserialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<RequestMessage>,
    #[serde(default)]
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct RequestMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRequest {
    model: String,
    input: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionResponse {
    id: String,
    object: String,
    created: u64,
    model: String,
    choices: Vec<ChatChoice>,
    usage: Usage,
}

#[derive(Debug, Serialize)]
struct ChatChoice {
    index: u32,
    message: ResponseMessage,
    finish_reason: String,
}

#[derive(Debug, Serialize)]
struct ResponseMessage {
    role: String,
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}
