use std::{borrow::Cow, fmt, io::IsTerminal, path::PathBuf, str::FromStr};

use clap::{Parser, Subcommand, ValueEnum};
use config::{Config, ExtraFields};
use llm::{ExtraOptions, GenerationParameters};
use logforth::filter::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "connectors", version, long_about = concat!("LLM connectors v", env!("CARGO_PKG_VERSION")))]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(long, short, env = "CONNECTORS_CONFIG_PATH", default_value = "./connectors.toml")]
    pub config: PathBuf,
    /// Set the logging level for all workspace crates.
    #[arg(long = "log", env = "CONNECTORS_LOG", default_value_t = LogLevel::default())]
    pub log_level: LogLevel,
    /// Set the style of log output
    #[arg(long, env = "CONNECTORS_LOG_STYLE", default_value_t = LogStyle::default())]
    pub log_style: LogStyle,
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn config(&self) -> anyhow::Result<Config> {
        let config = if self.config.exists() {
            Config::load(&self.config)?
        } else {
            Config::default()
        };

        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the configured providers and the operations they support
    Providers,
    /// Send a conversation and print the normalized result as JSON
    Chat {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        generation: Generation,
        /// System instructions, sent before the message
        #[arg(long)]
        system: Option<String>,
        /// The user message; multiple words are joined with spaces
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Complete a single prompt and print the text
    Generate {
        #[command(flatten)]
        target: Target,
        #[command(flatten)]
        generation: Generation,
        /// The prompt; multiple words are joined with spaces
        #[arg(required = true)]
        prompt: Vec<String>,
    },
    /// Print the embedding of a text as a JSON array
    Embed {
        #[command(flatten)]
        target: Target,
        /// Embedding model for this call
        #[arg(long)]
        model: Option<String>,
        /// The text to embed; multiple words are joined with spaces
        #[arg(required = true)]
        text: Vec<String>,
    },
}

/// Which provider to call, and with which key.
#[derive(Debug, clap::Args)]
pub struct Target {
    /// Name of a provider in the configuration file
    #[arg(long, short)]
    pub provider: String,
    /// API key, overriding the configured one
    #[arg(long, env = "CONNECTORS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[derive(Debug, clap::Args)]
pub struct Generation {
    /// Sampling temperature, defaults to the configured value
    #[arg(long)]
    pub temperature: Option<f32>,
    /// Maximum number of generated tokens
    #[arg(long)]
    pub max_tokens: Option<u32>,
    /// Model for this call, overriding the configured one
    #[arg(long)]
    pub model: Option<String>,
    /// Provider-specific request field as KEY=VALUE; JSON values are sent as JSON
    #[arg(long = "field", value_parser = parse_field)]
    pub fields: Vec<(String, serde_json::Value)>,
}

impl Generation {
    pub fn parameters(&self, config: &Config) -> GenerationParameters {
        let mut params = GenerationParameters::from(config.defaults);

        if let Some(temperature) = self.temperature {
            params = params.with_temperature(temperature);
        }

        if let Some(max_tokens) = self.max_tokens {
            params = params.with_max_tokens(max_tokens);
        }

        params
    }

    pub fn extra(&self) -> ExtraOptions {
        ExtraOptions {
            model: self.model.clone(),
            fields: self.fields.iter().cloned().collect::<ExtraFields>(),
        }
    }
}

fn parse_field(input: &str) -> Result<(String, serde_json::Value), String> {
    let Some((key, value)) = input.split_once('=') else {
        return Err(format!("expected KEY=VALUE, got '{input}'"));
    };

    if key.is_empty() {
        return Err("field name must not be empty".to_string());
    }

    let value = serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    Ok((key.to_string(), value))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub(crate) enum LogStyle {
    /// Colorized text, used as the default with TTY output
    Color,
    /// Standard text, used as the default with non-TTY output
    Text,
    /// JSON objects
    Json,
}

impl Default for LogStyle {
    fn default() -> Self {
        if std::io::stderr().is_terminal() {
            LogStyle::Color
        } else {
            LogStyle::Text
        }
    }
}

impl AsRef<str> for LogStyle {
    fn as_ref(&self) -> &str {
        match self {
            LogStyle::Color => "color",
            LogStyle::Text => "text",
            LogStyle::Json => "json",
        }
    }
}

impl fmt::Display for LogStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub(crate) enum LogLevel {
    /// Disable logging
    Off,
    /// Only log errors
    Error,
    /// Log errors, and warnings
    #[default]
    Warn,
    /// Log errors, warnings, and info messages
    Info,
    /// Log errors, warnings, info, and debug messages
    Debug,
    /// Log errors, warnings, info, debug, and trace messages
    Trace,
}

impl LogLevel {
    pub fn env_filter(self) -> anyhow::Result<EnvFilter> {
        let filter_str = match self {
            LogLevel::Off => Cow::Borrowed("off"),
            // For other levels, set the default to 'warn' for all crates,
            // but use the selected level for workspace crates
            level => Cow::Owned(format!("warn,connectors={level},config={level},llm={level}")),
        };

        EnvFilter::from_str(&filter_str).map_err(|e| anyhow::anyhow!("invalid log filter '{filter_str}': {e}"))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}

impl AsRef<str> for LogLevel {
    fn as_ref(&self) -> &str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
