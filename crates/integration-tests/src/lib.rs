pub mod llms;

use std::collections::HashMap;
use std::sync::Arc;

use config::Config;
use llm::{Connector, Registry};
use llms::{LlmProviderConfig, RequestLog, TestLlmProvider, generate_config};

/// Builder for a registry wired to in-process mock providers
#[derive(Default)]
pub struct TestRegistryBuilder {
    config: String,
    providers: Vec<LlmProviderConfig>,
}

impl TestRegistryBuilder {
    /// Start a mock provider and add it to the configuration
    pub async fn spawn_llm(&mut self, provider: impl TestLlmProvider) -> &LlmProviderConfig {
        let config = Box::new(provider).spawn().await.unwrap();

        self.config.push_str(&generate_config(&config));
        self.providers.push(config);

        self.providers.last().unwrap()
    }

    /// Build the registry from `config` plus the spawned providers
    pub fn build(self, config: &str) -> TestRegistry {
        let config = format!("{config}\n{}", self.config);
        let config: Config = toml::from_str(&config).unwrap();

        config.validate().unwrap();

        let registry = Registry::from_config(&config).unwrap();

        let requests = self
            .providers
            .into_iter()
            .map(|provider| (provider.name, provider.requests))
            .collect();

        TestRegistry { registry, requests }
    }
}

/// A registry whose providers are served by mocks
pub struct TestRegistry {
    pub registry: Registry,
    requests: HashMap<String, RequestLog>,
}

impl TestRegistry {
    pub fn builder() -> TestRegistryBuilder {
        TestRegistryBuilder::default()
    }

    /// The connector configured under `name`
    pub fn connector(&self, name: &str) -> Arc<dyn Connector> {
        self.registry.get(name).unwrap()
    }

    /// Requests received by the mock behind `name`
    pub fn requests(&self, name: &str) -> &RequestLog {
        &self.requests[name]
    }
}
