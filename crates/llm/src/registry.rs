use std::{collections::BTreeMap, sync::Arc};

use config::{Config, GenerationDefaults, ProviderConfig, ProviderType};
use secrecy::SecretString;

use crate::{
    error::LlmError,
    provider::{Capabilities, Connector, google::GoogleConnector, openai::OpenAIConnector, unavailable::UnavailableConnector},
};

/// Construct a single connector from its configuration.
///
/// Copilot and DeepSeek entries fail with `LlmError::NotAvailable`.
pub fn connect(name: &str, api_key: SecretString, config: &ProviderConfig) -> crate::Result<Box<dyn Connector>> {
    let connector: Box<dyn Connector> = match config {
        ProviderConfig::Openai(config) => Box::new(OpenAIConnector::new(name, api_key, config.clone())?),
        ProviderConfig::Google(config) => Box::new(GoogleConnector::new(name, api_key, config.clone())?),
        ProviderConfig::Copilot(config) => Box::new(UnavailableConnector::copilot(name, api_key, config.clone())?),
        ProviderConfig::Deepseek(config) => Box::new(UnavailableConnector::deepseek(name, api_key, config.clone())?),
    };

    Ok(connector)
}

/// A configured provider as listed by [`Registry::providers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEntry<'a> {
    /// Configured name.
    pub name: &'a str,
    /// Provider behind the name.
    pub provider_type: ProviderType,
    /// What the connector can serve.
    pub capabilities: Capabilities,
}

/// Named connectors built from a [`Config`].
pub struct Registry {
    connectors: BTreeMap<String, Arc<dyn Connector>>,
    defaults: GenerationDefaults,
}

impl Registry {
    /// Build every configured connector.
    ///
    /// Providers without an API integration are kept as slots whose calls fail with
    /// `NotAvailable`; they need no API key. Any other construction failure aborts.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let mut connectors: BTreeMap<String, Arc<dyn Connector>> = BTreeMap::new();

        for (name, provider) in &config.providers {
            let provider_type = provider.provider_type();

            if !Capabilities::of(provider_type).is_available() {
                log::warn!("Provider '{name}' ({provider_type}) has no API integration, all calls to it will fail");

                connectors.insert(name.clone(), Arc::new(UnavailableConnector::declared(name, provider_type)));
                continue;
            }

            let api_key = provider
                .api_key()
                .map_err(|e| LlmError::Configuration(format!("provider '{name}': {e:#}")))?;

            let connector = connect(name, api_key, provider)?;

            log::debug!("Registered {provider_type} provider '{name}'");
            connectors.insert(name.clone(), Arc::from(connector));
        }

        if connectors.is_empty() {
            log::warn!("No LLM providers configured");
        }

        Ok(Self {
            connectors,
            defaults: config.defaults,
        })
    }

    /// Look up a connector by name.
    pub fn get(&self, name: &str) -> crate::Result<Arc<dyn Connector>> {
        self.connectors
            .get(name)
            .cloned()
            .ok_or_else(|| LlmError::ProviderNotFound(name.to_string()))
    }

    /// Capabilities of a named provider.
    pub fn capabilities(&self, name: &str) -> crate::Result<Capabilities> {
        self.connectors
            .get(name)
            .map(|connector| connector.capabilities())
            .ok_or_else(|| LlmError::ProviderNotFound(name.to_string()))
    }

    /// All configured providers, ordered by name.
    pub fn providers(&self) -> impl Iterator<Item = ProviderEntry<'_>> {
        self.connectors.iter().map(|(name, connector)| ProviderEntry {
            name,
            provider_type: connector.provider_type(),
            capabilities: connector.capabilities(),
        })
    }

    /// Generation defaults from the configuration.
    pub fn defaults(&self) -> GenerationDefaults {
        self.defaults
    }

    /// Number of configured providers.
    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    /// Whether no provider is configured.
    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}
