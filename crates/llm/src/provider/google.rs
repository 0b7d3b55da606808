mod input;
mod output;

use async_trait::async_trait;
use config::{ExtraFields, GoogleConfig, ProviderType};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use self::{
    input::{GoogleGenerateRequest, RESERVED_GENERATION_FIELDS},
    output::GoogleGenerateResponse,
};

use crate::{
    error::{LlmError, Operation},
    messages::{ChatMessage, ChatResult, EmbeddingVector, ExtraOptions, GenerationParameters},
    provider::{Connector, http, validate},
};

const DEFAULT_GOOGLE_API_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_API_VERSION: &str = "v1beta";
const DEFAULT_MODEL: &str = "gemini-pro";

/// Connector for the Google Gemini GenerateContent API.
///
/// Embeddings are not offered: `get_embeddings` fails with `NotAvailable` without a request.
pub struct GoogleConnector {
    client: Client,
    name: String,
    base_url: String,
    api_version: String,
    api_key: SecretString,
    model: String,
    extra: ExtraFields,
}

impl GoogleConnector {
    /// Create a connector. Fails with `LlmError::Configuration` on a blank key, a
    /// non-http(s) base URL, an unusable model name or API version.
    pub fn new(name: impl Into<String>, api_key: SecretString, config: GoogleConfig) -> crate::Result<Self> {
        let name = name.into();

        validate::api_key(&name, &api_key)?;

        let model = validate::model_name(&name, config.model, DEFAULT_MODEL)?;
        let base_url = validate::base_url(&name, config.base_url, DEFAULT_GOOGLE_API_URL)?;

        let api_version = config.api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        if api_version.is_empty() || !api_version.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(LlmError::Configuration(format!(
                "unsupported API version '{api_version}' for provider '{name}'"
            )));
        }

        let client = Client::builder().build().map_err(|e| {
            log::error!("Failed to create HTTP client for Google provider: {e}");
            LlmError::Configuration(format!("failed to create HTTP client: {e}"))
        })?;

        log::debug!("Initialized Google connector '{name}' with model {model} at {base_url}/{api_version}");

        Ok(Self {
            client,
            name,
            base_url,
            api_version,
            api_key,
            model,
            extra: config.extra,
        })
    }
}

#[async_trait]
impl Connector for GoogleConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::Google
    }

    async fn chat(
        &self,
        conversation: &[ChatMessage],
        params: &GenerationParameters,
        extra: &ExtraOptions,
    ) -> crate::Result<ChatResult> {
        validate::conversation(conversation)?;

        let model = validate::call_model(&self.model, extra)?;
        let fields = http::pass_through(&self.name, &self.extra, &extra.fields, RESERVED_GENERATION_FIELDS);

        let Some(request) = GoogleGenerateRequest::new(conversation, params, fields) else {
            return Err(LlmError::InvalidRequest(
                "conversation must contain at least one user or assistant message".to_string(),
            ));
        };

        log::debug!(
            "Sending chat request to {} (model {model}, {} messages)",
            self.name,
            conversation.len()
        );

        // Only ever logged without its URL, see `http::send`.
        let url = format!(
            "{}/{}/models/{model}:generateContent?key={}",
            self.base_url,
            self.api_version,
            self.api_key.expose_secret()
        );

        let body = http::send(&self.name, Operation::Chat, self.client.post(url).json(&request)).await?;
        let response: GoogleGenerateResponse = http::parse(&self.name, Operation::Chat, &body)?;

        response.into_chat_result().map_err(|failure| {
            log::error!("Google chat response from {} could not be normalized: {failure}", self.name);
            LlmError::provider(&self.name, Operation::Chat, failure)
        })
    }

    async fn get_embeddings(&self, _: &str, _: &ExtraOptions) -> crate::Result<EmbeddingVector> {
        log::debug!("Embeddings requested from {}, which has no embedding support", self.name);

        Err(LlmError::not_available(ProviderType::Google, Operation::GetEmbeddings))
    }
}
