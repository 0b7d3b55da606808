use config::ExtraFields;
use serde::Serialize;

use crate::messages::{ChatMessage, ChatRole, GenerationParameters};

/// `generationConfig` fields the connector sets itself.
pub(super) const RESERVED_GENERATION_FIELDS: &[&str] = &["temperature", "maxOutputTokens"];

/// Request body for Google Gemini GenerateContent API.
///
/// This struct represents the request format for generating content with Gemini models
/// as documented in the [Google AI API Reference](https://ai.google.dev/api/generate-content).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GoogleGenerateRequest<'a> {
    /// The content of the current conversation with the model.
    ///
    /// For multi-turn queries this contains the conversation history and the latest request.
    pub(super) contents: Vec<GoogleContent<'a>>,

    /// System messages, joined in conversation order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) system_instruction: Option<GoogleSystemInstruction<'a>>,

    pub(super) generation_config: GoogleGenerationConfig,
}

#[derive(Debug, Serialize)]
pub(super) struct GoogleContent<'a> {
    pub(super) role: GoogleRole,
    pub(super) parts: Vec<GooglePart<'a>>,
}

/// System instructions carry no role.
#[derive(Debug, Serialize)]
pub(super) struct GoogleSystemInstruction<'a> {
    pub(super) parts: Vec<GooglePart<'a>>,
}

#[derive(Debug, Serialize)]
pub(super) struct GooglePart<'a> {
    pub(super) text: &'a str,
}

/// Gemini only knows two conversation roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(super) enum GoogleRole {
    User,
    Model,
}

/// Configuration options for model generation and output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GoogleGenerationConfig {
    /// Controls randomness in generation. Values can range from 0.0 to 2.0.
    pub(super) temperature: f32,

    /// The maximum number of tokens to include in a candidate.
    ///
    /// If unset, this will default to a value determined by the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) max_output_tokens: Option<u32>,

    /// Other generation fields such as `topP`, `topK` or `stopSequences`, forwarded as given.
    #[serde(flatten)]
    pub(super) extra: ExtraFields,
}

impl<'a> GoogleGenerateRequest<'a> {
    /// Map a conversation onto Gemini contents.
    ///
    /// System messages move to `systemInstruction` and assistant turns become `model` turns.
    /// Returns `None` when no user or assistant turn is left to send.
    pub(super) fn new(conversation: &'a [ChatMessage], params: &GenerationParameters, extra: ExtraFields) -> Option<Self> {
        let mut contents: Vec<GoogleContent<'a>> = Vec::with_capacity(conversation.len());
        let mut system = Vec::new();

        for message in conversation {
            let part = GooglePart {
                text: &message.content,
            };

            let role = match message.role {
                ChatRole::System => {
                    system.push(part);
                    continue;
                }
                ChatRole::User => GoogleRole::User,
                ChatRole::Assistant => GoogleRole::Model,
            };

            // Consecutive turns of one role are merged, Gemini expects alternation.
            if let Some(last) = contents.last_mut().filter(|content| content.role == role) {
                last.parts.push(part);
            } else {
                contents.push(GoogleContent { role, parts: vec![part] });
            }
        }

        if contents.is_empty() {
            return None;
        }

        let system_instruction = (!system.is_empty()).then_some(GoogleSystemInstruction { parts: system });

        Some(Self {
            contents,
            system_instruction,
            generation_config: GoogleGenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_tokens,
                extra,
            },
        })
    }
}
