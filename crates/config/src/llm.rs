//! Provider configuration structures for the LLM connectors.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::{anyhow, bail};
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Opaque provider-specific fields, forwarded verbatim to the provider.
pub type ExtraFields = BTreeMap<String, serde_json::Value>;

/// Provider type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderType {
    /// OpenAI provider.
    Openai,
    /// Google Gemini provider.
    Google,
    /// Microsoft Copilot, declared without a working backend.
    Copilot,
    /// DeepSeek, declared without a working backend.
    Deepseek,
}

impl ProviderType {
    /// The configuration tag of this provider type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Openai => "openai",
            Self::Google => "google",
            Self::Copilot => "copilot",
            Self::Deepseek => "deepseek",
        }
    }

    /// Human readable vendor name, used in error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Openai => "OpenAI",
            Self::Google => "Google Gemini",
            Self::Copilot => "Microsoft Copilot",
            Self::Deepseek => "DeepSeek",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the OpenAI connector.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key for authentication.
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Name of an environment variable holding the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Chat model. Defaults to `gpt-3.5-turbo`.
    #[serde(default)]
    pub model: Option<String>,

    /// Embedding model. Defaults to `text-embedding-ada-002`.
    #[serde(default)]
    pub embedding_model: Option<String>,

    /// Custom base URL for the provider API.
    #[serde(default)]
    pub base_url: Option<Url>,

    /// Value of the `OpenAI-Organization` header.
    #[serde(default)]
    pub organization: Option<String>,

    /// Fields merged into every request body.
    #[serde(default)]
    pub extra: ExtraFields,
}

/// Configuration for the Google Gemini connector.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoogleConfig {
    /// API key for authentication.
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Name of an environment variable holding the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Generative model. Defaults to `gemini-pro`.
    #[serde(default)]
    pub model: Option<String>,

    /// Custom base URL for the provider API, without the version segment.
    #[serde(default)]
    pub base_url: Option<Url>,

    /// API version path segment. Defaults to `v1beta`.
    #[serde(default)]
    pub api_version: Option<String>,

    /// Fields merged into every `generationConfig`.
    #[serde(default)]
    pub extra: ExtraFields,
}

/// Configuration for a provider that is declared but has no backend.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnavailableConfig {
    /// API key for authentication.
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Name of an environment variable holding the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Accepted for symmetry with the working providers, never used.
    #[serde(default)]
    pub extra: ExtraFields,
}

/// Complete provider configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", deny_unknown_fields)]
pub enum ProviderConfig {
    /// OpenAI provider configuration.
    Openai(OpenAiConfig),

    /// Google provider configuration.
    Google(GoogleConfig),

    /// Microsoft Copilot provider configuration.
    Copilot(UnavailableConfig),

    /// DeepSeek provider configuration.
    Deepseek(UnavailableConfig),
}

impl ProviderConfig {
    /// Get the provider type for this configuration.
    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::Openai(_) => ProviderType::Openai,
            Self::Google(_) => ProviderType::Google,
            Self::Copilot(_) => ProviderType::Copilot,
            Self::Deepseek(_) => ProviderType::Deepseek,
        }
    }

    /// Get the base URL (if applicable for this provider type).
    pub fn base_url(&self) -> Option<&Url> {
        match self {
            Self::Openai(config) => config.base_url.as_ref(),
            Self::Google(config) => config.base_url.as_ref(),
            Self::Copilot(_) | Self::Deepseek(_) => None,
        }
    }

    /// Resolve the API key, either the literal value or the named environment variable.
    ///
    /// A literal `api_key` takes precedence over `api_key_env`.
    pub fn api_key(&self) -> anyhow::Result<SecretString> {
        let (api_key, api_key_env) = match self {
            Self::Openai(config) => (&config.api_key, &config.api_key_env),
            Self::Google(config) => (&config.api_key, &config.api_key_env),
            Self::Copilot(config) | Self::Deepseek(config) => (&config.api_key, &config.api_key_env),
        };

        if let Some(key) = api_key {
            return Ok(key.clone());
        }

        let Some(variable) = api_key_env else {
            bail!(
                "no API key configured for {} provider: set `api_key` or `api_key_env`",
                self.provider_type()
            );
        };

        std::env::var(variable)
            .map(SecretString::from)
            .map_err(|_| anyhow!("environment variable `{variable}` holding the API key is not set"))
    }
}
