// OpenAI API response types
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{error::ProviderFailure, messages::ChatResult};

/// Response body of the Chat Completions API.
///
/// Only the fields needed for normalization are typed; everything else is carried in
/// the flattened maps so it can be handed back to the caller untouched.
#[derive(Debug, Deserialize, Serialize)]
pub(super) struct OpenAIResponse {
    pub(super) choices: Vec<OpenAIChoice>,
    #[serde(flatten)]
    pub(super) rest: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(super) struct OpenAIChoice {
    pub(super) message: OpenAIMessage,
    #[serde(flatten)]
    pub(super) rest: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize)]
pub(super) struct OpenAIMessage {
    /// Null when the model answered with tool calls or a refusal only.
    #[serde(default)]
    pub(super) content: Option<String>,
    #[serde(flatten)]
    pub(super) rest: Map<String, Value>,
}

impl OpenAIResponse {
    /// Content of the first choice becomes `content`; `choices` and every other top-level
    /// field are passed through.
    pub(super) fn into_chat_result(self) -> Result<ChatResult, ProviderFailure> {
        let content = self
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .unwrap_or_default();

        let choices =
            serde_json::to_value(&self.choices).map_err(|e| ProviderFailure::MalformedResponse(e.to_string()))?;

        let mut extras = self.rest;
        extras.insert("choices".to_string(), choices);

        ChatResult::new(content, extras).ok_or(ProviderFailure::EmptyResponse)
    }
}

/// Response body of the Embeddings API.
#[derive(Debug, Deserialize)]
pub(super) struct OpenAIEmbeddingResponse {
    pub(super) data: Vec<OpenAIEmbedding>,
}

#[derive(Debug, Deserialize)]
pub(super) struct OpenAIEmbedding {
    pub(super) embedding: Vec<f32>,
}

impl OpenAIEmbeddingResponse {
    pub(super) fn into_vector(self) -> Result<Vec<f32>, ProviderFailure> {
        self.data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .filter(|embedding| !embedding.is_empty())
            .ok_or(ProviderFailure::EmptyResponse)
    }
}
