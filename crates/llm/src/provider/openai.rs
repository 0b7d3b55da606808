mod input;
mod output;

use async_trait::async_trait;
use config::{ExtraFields, OpenAiConfig, ProviderType};
use reqwest::{Client, header::AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};

use self::{
    input::{OpenAIEmbeddingRequest, OpenAIRequest, RESERVED_CHAT_FIELDS, RESERVED_EMBEDDING_FIELDS},
    output::{OpenAIEmbeddingResponse, OpenAIResponse},
};

use crate::{
    error::{LlmError, Operation},
    messages::{ChatMessage, ChatResult, EmbeddingVector, ExtraOptions, GenerationParameters},
    provider::{Connector, http, validate},
};

const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";
const ORGANIZATION_HEADER: &str = "OpenAI-Organization";

/// Connector for the OpenAI Chat Completions and Embeddings APIs.
///
/// `chat` returns the first choice as `content` and passes `choices`, `usage`, `id`,
/// `model` and any other top-level response field through unmodified.
pub struct OpenAIConnector {
    client: Client,
    name: String,
    base_url: String,
    api_key: SecretString,
    model: String,
    embedding_model: String,
    organization: Option<String>,
    extra: ExtraFields,
}

impl OpenAIConnector {
    /// Create a connector. Fails with `LlmError::Configuration` on a blank key, a
    /// non-http(s) base URL or an unusable model name.
    pub fn new(name: impl Into<String>, api_key: SecretString, config: OpenAiConfig) -> crate::Result<Self> {
        let name = name.into();

        validate::api_key(&name, &api_key)?;

        let model = validate::model_name(&name, config.model, DEFAULT_CHAT_MODEL)?;
        let embedding_model = validate::model_name(&name, config.embedding_model, DEFAULT_EMBEDDING_MODEL)?;
        let base_url = validate::base_url(&name, config.base_url, DEFAULT_OPENAI_API_URL)?;

        let client = Client::builder().build().map_err(|e| {
            log::error!("Failed to create HTTP client for OpenAI provider: {e}");
            LlmError::Configuration(format!("failed to create HTTP client: {e}"))
        })?;

        log::debug!("Initialized OpenAI connector '{name}' with model {model} at {base_url}");

        Ok(Self {
            client,
            name,
            base_url,
            api_key,
            model,
            embedding_model,
            organization: config.organization,
            extra: config.extra,
        })
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let request = self
            .client
            .post(format!("{}/{path}", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key.expose_secret()));

        match &self.organization {
            Some(organization) => request.header(ORGANIZATION_HEADER, organization),
            None => request,
        }
    }
}

#[async_trait]
impl Connector for OpenAIConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn provider_type(&self) -> ProviderType {
        ProviderType::Openai
    }

    async fn chat(
        &self,
        conversation: &[ChatMessage],
        params: &GenerationParameters,
        extra: &ExtraOptions,
    ) -> crate::Result<ChatResult> {
        validate::conversation(conversation)?;

        let model = validate::call_model(&self.model, extra)?;
        let fields = http::pass_through(&self.name, &self.extra, &extra.fields, RESERVED_CHAT_FIELDS);
        let request = OpenAIRequest::new(model, conversation, params, fields);

        log::debug!(
            "Sending chat request to {} (model {model}, {} messages)",
            self.name,
            conversation.len()
        );

        let body = http::send(&self.name, Operation::Chat, self.post("chat/completions").json(&request)).await?;
        let response: OpenAIResponse = http::parse(&self.name, Operation::Chat, &body)?;

        response.into_chat_result().map_err(|failure| {
            log::error!("OpenAI chat response from {} could not be normalized: {failure}", self.name);
            LlmError::provider(&self.name, Operation::Chat, failure)
        })
    }

    async fn get_embeddings(&self, text: &str, extra: &ExtraOptions) -> crate::Result<EmbeddingVector> {
        let model = validate::call_model(&self.embedding_model, extra)?;
        let fields = http::pass_through(&self.name, &ExtraFields::new(), &extra.fields, RESERVED_EMBEDDING_FIELDS);

        let request = OpenAIEmbeddingRequest {
            model,
            input: text,
            extra: fields,
        };

        log::debug!("Sending embeddings request to {} (model {model})", self.name);

        let body = http::send(&self.name, Operation::GetEmbeddings, self.post("embeddings").json(&request)).await?;
        let response: OpenAIEmbeddingResponse = http::parse(&self.name, Operation::GetEmbeddings, &body)?;

        response
            .into_vector()
            .map_err(|failure| LlmError::provider(&self.name, Operation::GetEmbeddings, failure))
    }
}
