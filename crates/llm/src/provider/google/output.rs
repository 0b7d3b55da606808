use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{error::ProviderFailure, messages::ChatResult};

/// Response body of the GenerateContent API.
///
/// Everything besides the text parts of each candidate stays untyped so it can be
/// returned to the caller as is (`usageMetadata`, `modelVersion`, `promptFeedback`, ...).
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GoogleGenerateResponse {
    /// Missing when the prompt itself was blocked.
    #[serde(default)]
    pub(super) candidates: Vec<GoogleCandidate>,
    #[serde(flatten)]
    pub(super) rest: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(super) struct GoogleCandidate {
    /// Missing when the candidate was stopped for safety reasons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) content: Option<GoogleResponseContent>,
    #[serde(flatten)]
    pub(super) rest: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(super) struct GoogleResponseContent {
    #[serde(default)]
    pub(super) parts: Vec<GoogleResponsePart>,
    #[serde(flatten)]
    pub(super) rest: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(super) struct GoogleResponsePart {
    /// Absent for function call and inline data parts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(super) text: Option<String>,
    #[serde(flatten)]
    pub(super) rest: Map<String, Value>,
}

impl GoogleCandidate {
    fn text(&self) -> String {
        self.content
            .iter()
            .flat_map(|content| &content.parts)
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

impl GoogleGenerateResponse {
    /// Text parts of the first candidate become `content`; `candidates` and every other
    /// top-level field are passed through.
    pub(super) fn into_chat_result(self) -> Result<ChatResult, ProviderFailure> {
        let content = self.candidates.first().map(GoogleCandidate::text).unwrap_or_default();

        let candidates =
            serde_json::to_value(&self.candidates).map_err(|e| ProviderFailure::MalformedResponse(e.to_string()))?;

        let mut extras = self.rest;
        extras.insert("candidates".to_string(), candidates);

        ChatResult::new(content, extras).ok_or(ProviderFailure::EmptyResponse)
    }
}
