use async_trait::async_trait;
use config::{ProviderType, UnavailableConfig};
use secrecy::SecretString;

use crate::{
    error::{LlmError, Operation},
    messages::{ChatMessage, ChatResult, EmbeddingVector, ExtraOptions, GenerationParameters},
    provider::{Capabilities, Connector},
};

/// Connector for providers whose API integration does not exist yet (Copilot, DeepSeek).
///
/// Construction always fails with `LlmError::NotAvailable`. Registries keep a declared
/// instance so that a configured provider can be listed; every call on it fails the
/// same way. No HTTP client is ever created.
#[derive(Debug)]
pub struct UnavailableConnector {
    name: String,
    provider: ProviderType,
}

impl UnavailableConnector {
    /// Microsoft Copilot. Always fails.
    pub fn copilot(name: impl Into<String>, api_key: SecretString, config: UnavailableConfig) -> crate::Result<Self> {
        Self::construct(name.into(), ProviderType::Copilot, api_key, config)
    }

    /// DeepSeek. Always fails.
    pub fn deepseek(name: impl Into<String>, api_key: SecretString, config: UnavailableConfig) -> crate::Result<Self> {
        Self::construct(name.into(), ProviderType::Deepseek, api_key, config)
    }

    fn construct(
        name: String,
        provider: ProviderType,
        _api_key: SecretString,
        _config: UnavailableConfig,
    ) -> crate::Result<Self> {
        log::debug!("Refusing to construct '{name}': {provider} has no API integration");

        Err(LlmError::not_available(provider, Operation::Construct))
    }

    /// A configured but unusable provider slot.
    pub(crate) fn declared(name: impl Into<String>, provider: ProviderType) -> Self {
        Self {
            name: name.into(),
            provider,
        }
    }

    fn refuse(&self, operation: Operation) -> LlmError {
        log::debug!("{} called on '{}', which is not available", operation, self.name);

        LlmError::not_available(self.provider, operation)
    }
}

#[async_trait]
impl Connector for UnavailableConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn provider_type(&self) -> ProviderType {
        self.provider
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    async fn chat(&self, _: &[ChatMessage], _: &GenerationParameters, _: &ExtraOptions) -> crate::Result<ChatResult> {
        Err(self.refuse(Operation::Chat))
    }

    async fn generate_text(&self, _: &str, _: &GenerationParameters, _: &ExtraOptions) -> crate::Result<String> {
        Err(self.refuse(Operation::GenerateText))
    }

    async fn get_embeddings(&self, _: &str, _: &ExtraOptions) -> crate::Result<EmbeddingVector> {
        Err(self.refuse(Operation::GetEmbeddings))
    }
}
