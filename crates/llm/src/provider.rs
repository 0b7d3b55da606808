pub(crate) mod google;
pub(crate) mod openai;
pub(crate) mod unavailable;
mod http;
mod validate;

use async_trait::async_trait;
use config::ProviderType;
use serde::Serialize;

use crate::{
    error::Operation,
    messages::{ChatMessage, ChatResult, EmbeddingVector, ExtraOptions, GenerationParameters},
};

/// Operations a provider can actually serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Supports `chat`.
    pub chat: bool,
    /// Supports `generate_text`.
    pub generate_text: bool,
    /// Supports `get_embeddings`.
    pub embeddings: bool,
}

impl Capabilities {
    /// A provider that serves nothing.
    pub const NONE: Self = Self {
        chat: false,
        generate_text: false,
        embeddings: false,
    };

    /// Static capabilities of a provider type, known without constructing a connector.
    pub const fn of(provider: ProviderType) -> Self {
        match provider {
            ProviderType::Openai => Self {
                chat: true,
                generate_text: true,
                embeddings: true,
            },
            // Gemini has no embedding support in this connector set.
            ProviderType::Google => Self {
                chat: true,
                generate_text: true,
                embeddings: false,
            },
            ProviderType::Copilot | ProviderType::Deepseek => Self::NONE,
        }
    }

    /// Whether the provider has a working API integration.
    pub const fn is_available(&self) -> bool {
        self.chat || self.generate_text || self.embeddings
    }

    /// Whether the operation can succeed at all.
    pub fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::Construct => self.is_available(),
            Operation::Chat => self.chat,
            Operation::GenerateText => self.generate_text,
            Operation::GetEmbeddings => self.embeddings,
        }
    }
}

/// The capability set every provider connector exposes.
///
/// Calls are independent: no conversation state is kept between them, and a connector may
/// serve any number of calls concurrently.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Name of this connector instance.
    fn name(&self) -> &str;

    /// The provider behind this connector.
    fn provider_type(&self) -> ProviderType;

    /// Operations this connector can serve.
    fn capabilities(&self) -> Capabilities {
        Capabilities::of(self.provider_type())
    }

    /// Send the full ordered conversation and return the normalized top response.
    ///
    /// The conversation must not be empty; its last message is the turn to answer.
    async fn chat(
        &self,
        conversation: &[ChatMessage],
        params: &GenerationParameters,
        extra: &ExtraOptions,
    ) -> crate::Result<ChatResult>;

    /// Single-turn completion of `prompt`, sent as one user message.
    async fn generate_text(
        &self,
        prompt: &str,
        params: &GenerationParameters,
        extra: &ExtraOptions,
    ) -> crate::Result<String> {
        let conversation = [ChatMessage::user(prompt)];

        self.chat(&conversation, params, extra)
            .await
            .map(ChatResult::into_content)
            .map_err(|error| error.for_operation(Operation::GenerateText))
    }

    /// Embed `text` with the provider's embedding model.
    async fn get_embeddings(&self, text: &str, extra: &ExtraOptions) -> crate::Result<EmbeddingVector>;
}
