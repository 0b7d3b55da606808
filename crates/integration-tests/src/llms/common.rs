use std::collections::HashMap;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json,
    body::Bytes,
    extract::{OriginalUri, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};

/// A request received by a mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Path and query string.
    pub uri: String,
    /// The `Authorization` header, if sent.
    pub authorization: Option<String>,
    /// The `OpenAI-Organization` header, if sent.
    pub organization: Option<String>,
    /// Request body; `Null` when it was not JSON.
    pub body: serde_json::Value,
}

/// Counts every request a mock server receives, on any path.
#[derive(Clone, Default)]
pub struct RequestLog {
    inner: Arc<RequestLogInner>,
}

#[derive(Default)]
struct RequestLogInner {
    count: AtomicUsize,
    last: Mutex<Option<RecordedRequest>>,
}

impl RequestLog {
    pub(super) fn record(&self, uri: &OriginalUri, headers: &HeaderMap, body: &Bytes) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };

        let request = RecordedRequest {
            uri: uri.0.to_string(),
            authorization: header(AUTHORIZATION.as_str()),
            organization: header("openai-organization"),
            body: serde_json::from_slice(body).unwrap_or_default(),
        };

        self.inner.count.fetch_add(1, Ordering::SeqCst);
        *self.inner.last.lock().unwrap() = Some(request);
    }

    /// Number of requests received so far.
    pub fn count(&self) -> usize {
        self.inner.count.load(Ordering::SeqCst)
    }

    /// The most recent request.
    pub fn last(&self) -> Option<RecordedRequest> {
        self.inner.last.lock().unwrap().clone()
    }

    /// Body of the most recent request.
    pub fn last_body(&self) -> serde_json::Value {
        self.last().map(|request| request.body).unwrap_or_default()
    }
}

/// Failure a mock answers every generation request with.
#[derive(Clone, Debug)]
pub(super) enum ErrorType {
    AuthError(String),
    ModelNotFound(String),
    RateLimit(String),
    QuotaExceeded(String),
    BadRequest(String),
    InternalError(String),
    ServiceUnavailable(String),
    /// A 200 response whose body is not JSON.
    Malformed,
}

impl ErrorType {
    pub(super) fn status(&self) -> StatusCode {
        match self {
            Self::AuthError(_) => StatusCode::UNAUTHORIZED,
            Self::ModelNotFound(_) => StatusCode::NOT_FOUND,
            Self::RateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::QuotaExceeded(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Malformed => StatusCode::OK,
        }
    }

    pub(super) fn message(&self) -> &str {
        match self {
            Self::AuthError(message)
            | Self::ModelNotFound(message)
            | Self::RateLimit(message)
            | Self::QuotaExceeded(message)
            | Self::BadRequest(message)
            | Self::InternalError(message)
            | Self::ServiceUnavailable(message) => message,
            Self::Malformed => "<html>upstream proxy error</html>",
        }
    }

    /// Plain-text error body, as sent by OpenAI-compatible gateways.
    pub(super) fn into_plain_response(self) -> Response {
        (self.status(), self.message().to_string()).into_response()
    }
}

/// Searches the texts in order for trigger words and returns the first matching response.
pub fn find_custom_response<'a>(
    texts: impl IntoIterator<Item = &'a str>,
    custom_responses: &HashMap<String, String>,
) -> Option<String> {
    for text in texts {
        for (trigger, response) in custom_responses {
            if text.contains(trigger.as_str()) {
                return Some(response.clone());
            }
        }
    }

    None
}

/// Records and rejects requests to paths the mock does not serve.
pub(super) async fn unexpected(
    State(requests): State<RequestLog>,
    uri: OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    requests.record(&uri, &headers, &body);
    eprintln!("Mock received unexpected request: {}", uri.0);

    (StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "Not found" }))).into_response()
}
