//! Connector configuration structures to map the connectors.toml configuration.

#![deny(missing_docs)]

mod llm;
mod loader;

use std::{collections::BTreeMap, path::Path};

pub use llm::{ExtraFields, GoogleConfig, OpenAiConfig, ProviderConfig, ProviderType, UnavailableConfig};
use serde::Deserialize;

/// Default sampling temperature when neither the call nor the configuration sets one.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Main configuration structure for the connectors.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Generation parameters applied when a call does not set its own.
    #[serde(default)]
    pub defaults: GenerationDefaults,
    /// Named provider configurations.
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
        loader::load(path)
    }

    /// Validates value ranges that serde cannot express.
    pub fn validate(&self) -> anyhow::Result<()> {
        loader::validate(self)
    }

    /// Whether there are any providers configured.
    pub fn has_providers(&self) -> bool {
        !self.providers.is_empty()
    }
}

/// Generation parameter defaults.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationDefaults {
    /// Sampling temperature, between 0 and 2.
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: Option<u32>,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
        }
    }
}
