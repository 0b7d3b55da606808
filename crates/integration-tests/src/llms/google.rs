use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{FromRef, OriginalUri, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use super::common::{ErrorType, RequestLog, find_custom_response, unexpected};
use super::provider::{LlmProviderConfig, ProviderType, TestLlmProvider};

/// Builder for Google test server
pub struct GoogleMock {
    name: String,
    custom_responses: HashMap<String, String>,
    error_type: Option<ErrorType>,
    blocked: bool,
}

impl GoogleMock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            custom_responses: HashMap::new(),
            error_type: None,
            blocked: false,
        }
    }

    pub fn with_response(mut self, trigger: impl Into<String>, response: impl Into<String>) -> Self {
        self.custom_responses.insert(trigger.into(), response.into());
        self
    }

    /// Answer with a blocked prompt and no candidates.
    pub fn with_blocked_prompt(mut self) -> Self {
        self.blocked = true;
        self
    }

    pub fn with_auth_error(mut self, message: impl Into<String>) -> Self {
        self.error_type = Some(ErrorType::AuthError(message.into()));
        self
    }

    pub fn with_rate_limit(mut self, message: impl Into<String>) -> Self {
        self.error_type = Some(ErrorType::RateLimit(message.into()));
        self
    }

    pub fn with_model_not_found(mut self, message: impl Into<String>) -> Self {
        self.error_type = Some(ErrorType::ModelNotFound(message.into()));
        self
    }
}

impl TestLlmProvider for GoogleMock {
    fn name(&self) -> &str {
        &self.name
    }

    async fn spawn(self: Box<Self>) -> anyhow::Result<LlmProviderConfig> {
        let requests = RequestLog::default();

        let state = Arc::new(TestGoogleState {
            custom_responses: self.custom_responses,
            error_type: self.error_type,
            blocked: self.blocked,
            requests: requests.clone(),
        });

        let app = Router::new()
            .route("/v1beta/models/{*path}", post(generate_content))
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
            provider_type: ProviderType::Google,
            requests,
        })
    }
}

/// Test Google server state
struct TestGoogleState {
    custom_responses: HashMap<String, String>,
    error_type: Option<ErrorType>,
    blocked: bool,
    requests: RequestLog,
}

impl FromRef<Arc<TestGoogleState>> for RequestLog {
    fn from_ref(state: &Arc<TestGoogleState>) -> Self {
        state.requests.clone()
    }
}

/// Handle Google generateContent requests in native format
async fn generate_content(
    State(state): State<Arc<TestGoogleState>>,
    Path(path): Path<String>,
    uri: OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.requests.record(&uri, &headers, &body);

    let Some(model) = path.strip_suffix(":generateContent") else {
        return error_response(StatusCode::NOT_FOUND, &format!("Unknown method in path {path}"));
    };

    if let Some(error_type) = &state.error_type {
        return error_response(error_type.status(), error_type.message());
    }

    let request: GoogleGenerateRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    if state.blocked {
        return Json(serde_json::json!({
            "promptFeedback": { "blockReason": "SAFETY" },
            "modelVersion": model
        }))
        .into_response();
    }

    let texts = request
        .contents
        .iter()
        .flat_map(|content| &content.parts)
        .filter_map(|part| part.text.as_deref());

    let response_text = find_custom_response(texts, &state.custom_responses)
        .unwrap_or_else(|| "Hello! I'm Gemini, a test assistant. How can I help you today?".to_string());

    let response = GoogleGenerateResponse {
        candidates: vec![GoogleCandidate {
            content: GoogleContent {
                parts: vec![GooglePart {
                    text: Some(response_text),
                }],
                role: "model".to_string(),
            },
            finish_reason: "STOP".to_string(),
            index: 0,
        }],
        usage_metadata: GoogleUsageMetadata {
            prompt_token_count: 10,
            candidates_token_count: 15,
            total_token_count: 25,
        },
        model_version: model.to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({
        "error": {
            "code": status.as_u16(),
            "message": message,
            "status": status.canonical_reason().unwrap_or("UNKNOWN"),
        }
    });

    (status, Json(body)).into_response()
}

#[derive(Debug, Deserialize)]
struct GoogleGenerateRequest {
    contents: Vec<GoogleContent>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleGenerateResponse {
    candidates: Vec<GoogleCandidate>,
    usage_metadata: GoogleUsageMetadata,
    model_version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleCandidate {
    content: GoogleContent,
    finish_reason: String,
    index: u32,
}

#[derive(Debug, Deserialize, Serialize)]
struct GoogleContent {
    parts: Vec<GooglePart>,
    #[serde(default)]
    role: String,
}

#[derive(Debug, Deserialize, Serialize)]
struct GooglePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GoogleUsageMetadata {
    prompt_token_count: u32,
    candidates_token_count: u32,
    total_token_count: u32,
}
