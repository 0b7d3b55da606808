// OpenAI API request types
use config::ExtraFields;
use serde::Serialize;

use crate::messages::{ChatMessage, GenerationParameters};

/// Request fields the connector sets itself; pass-through fields with these names are dropped.
pub(super) const RESERVED_CHAT_FIELDS: &[&str] = &["model", "messages", "temperature", "max_tokens", "stream"];

pub(super) const RESERVED_EMBEDDING_FIELDS: &[&str] = &["model", "input"];

/// Request body for OpenAI Chat Completions API.
///
/// This struct represents the request format for the `/v1/chat/completions` endpoint
/// as documented in the [OpenAI API Reference](https://platform.openai.com/docs/api-reference/chat/create).
#[derive(Debug, Serialize)]
pub(super) struct OpenAIRequest<'a> {
    /// ID of the model to use.
    pub(super) model: &'a str,

    /// A list of messages comprising the conversation so far.
    pub(super) messages: &'a [ChatMessage],

    /// What sampling temperature to use, between 0 and 2.
    pub(super) temperature: f32,

    /// The maximum number of tokens that can be generated in the chat completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) max_tokens: Option<u32>,

    /// Always false, responses are read whole.
    pub(super) stream: bool,

    /// Provider-specific fields such as `top_p`, `seed` or `user`.
    #[serde(flatten)]
    pub(super) extra: ExtraFields,
}

impl<'a> OpenAIRequest<'a> {
    pub(super) fn new(
        model: &'a str,
        messages: &'a [ChatMessage],
        params: &GenerationParameters,
        extra: ExtraFields,
    ) -> Self {
        Self {
            model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
            stream: false,
            extra,
        }
    }
}

/// Request body for the `/v1/embeddings` endpoint.
#[derive(Debug, Serialize)]
pub(super) struct OpenAIEmbeddingRequest<'a> {
    pub(super) model: &'a str,
    pub(super) input: &'a str,
    #[serde(flatten)]
    pub(super) extra: ExtraFields,
}
