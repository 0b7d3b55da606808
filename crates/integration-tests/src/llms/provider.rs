use indoc::formatdoc;
use std::future::Future;
use std::net::SocketAddr;

use super::common::RequestLog;

#[derive(Clone, Debug, Copy)]
pub enum ProviderType {
    OpenAI,
    Google,
}

/// Configuration for a test LLM provider
pub struct LlmProviderConfig {
    pub name: String,
    pub address: SocketAddr,
    pub provider_type: ProviderType,
    pub requests: RequestLog,
}

impl LlmProviderConfig {
    /// Base URL the connector should be configured with.
    pub fn base_url(&self) -> String {
        match self.provider_type {
            ProviderType::OpenAI => format!("http://{}/v1", self.address),
            // The connector appends the API version itself.
            ProviderType::Google => format!("http://{}", self.address),
        }
    }
}

/// Trait for test LLM providers
pub trait TestLlmProvider: Send + Sync + 'static {
    /// Get the provider name (used as the config key)
    fn name(&self) -> &str;

    /// Start the mock server and return its configuration
    fn spawn(self: Box<Self>) -> impl Future<Output = anyhow::Result<LlmProviderConfig>> + Send;
}

/// Generate the configuration snippet pointing a provider entry at a running mock
pub fn generate_config(config: &LlmProviderConfig) -> String {
    let (provider_type, api_key) = match config.provider_type {
        ProviderType::OpenAI => ("openai", "sk-test"),
        ProviderType::Google => ("google", "test-google-key"),
    };

    formatdoc! {r#"

        [providers.{}]
        type = "{}"
        api_key = "{}"
        base_url = "{}"
    "#, config.name, provider_type, api_key, config.base_url()}
}
