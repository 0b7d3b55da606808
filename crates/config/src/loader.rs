use std::path::Path;

use anyhow::{Context, bail};

use crate::Config;

const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Config> {
    let path = path.as_ref();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration file {}", path.display()))?;

    let config: Config =
        toml::from_str(&content).with_context(|| format!("failed to parse configuration file {}", path.display()))?;

    validate(&config)?;

    if !config.has_providers() {
        log::warn!("No providers configured in {}", path.display());
    }

    Ok(config)
}

pub(crate) fn validate(config: &Config) -> anyhow::Result<()> {
    let temperature = config.defaults.temperature;

    if !TEMPERATURE_RANGE.contains(&temperature) {
        bail!("defaults.temperature must be between 0.0 and 2.0, got {temperature}");
    }

    if config.defaults.max_tokens == Some(0) {
        bail!("defaults.max_tokens must be greater than zero");
    }

    for (name, provider) in &config.providers {
        if name.trim().is_empty() {
            bail!("provider names must not be empty");
        }

        if let Some(url) = provider.base_url()
            && !matches!(url.scheme(), "http" | "https")
        {
            bail!("providers.{name}.base_url must use http or https, got {}", url.scheme());
        }
    }

    Ok(())
}
