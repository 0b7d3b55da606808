use anyhow::Context;
use config::Config;
use llm::{Capabilities, ChatMessage, Connector, ExtraOptions, LlmError};
use secrecy::SecretString;

use crate::args::{Command, Target};

pub(crate) async fn run(command: &Command, config: &Config) -> anyhow::Result<()> {
    match command {
        Command::Providers => {
            println!("{}", serde_json::to_string_pretty(&providers(config))?);
        }
        Command::Chat {
            target,
            generation,
            system,
            message,
        } => {
            let connector = connector(target, config)?;

            let mut messages = Vec::with_capacity(2);

            if let Some(system) = system {
                messages.push(ChatMessage::system(system.as_str()));
            }

            messages.push(ChatMessage::user(message.join(" ")));

            let result = connector
                .chat(&messages, &generation.parameters(config), &generation.extra())
                .await?;

            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Generate {
            target,
            generation,
            prompt,
        } => {
            let connector = connector(target, config)?;

            let text = connector
                .generate_text(&prompt.join(" "), &generation.parameters(config), &generation.extra())
                .await?;

            println!("{text}");
        }
        Command::Embed { target, model, text } => {
            let connector = connector(target, config)?;

            let extra = ExtraOptions {
                model: model.clone(),
                ..Default::default()
            };

            let vector = connector.get_embeddings(&text.join(" "), &extra).await?;

            println!("{}", serde_json::to_string(&vector)?);
        }
    }

    Ok(())
}

/// Configured providers with their capabilities, without constructing any connector.
fn providers(config: &Config) -> Vec<serde_json::Value> {
    config
        .providers
        .iter()
        .map(|(name, provider)| {
            let provider_type = provider.provider_type();

            serde_json::json!({
                "name": name,
                "type": provider_type.as_str(),
                "capabilities": Capabilities::of(provider_type),
            })
        })
        .collect()
}

fn connector(target: &Target, config: &Config) -> anyhow::Result<Box<dyn Connector>> {
    let name = target.provider.as_str();

    let provider = config
        .providers
        .get(name)
        .ok_or_else(|| LlmError::ProviderNotFound(name.to_string()))?;

    let provider_type = provider.provider_type();

    let api_key = match &target.api_key {
        Some(key) => SecretString::from(key.clone()),
        // Stub providers fail on construction, whatever the key.
        None if !Capabilities::of(provider_type).is_available() => SecretString::from(String::new()),
        None => provider
            .api_key()
            .with_context(|| format!("provider '{name}' has no usable API key"))?,
    };

    log::debug!("Connecting to {provider_type} provider '{name}'");

    Ok(llm::connect(name, api_key, provider)?)
}
