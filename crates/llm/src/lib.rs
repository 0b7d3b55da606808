//! Uniform async connectors for large language model providers.
//!
//! Every provider implements [`Connector`]: `chat` over a full conversation,
//! single-turn `generate_text` and `get_embeddings`. Vendor responses are normalized
//! into a [`ChatResult`] with a guaranteed `content`, a bare string or a flat vector.
//! Operations a provider cannot serve fail with [`LlmError::NotAvailable`], which
//! callers can also anticipate through [`Capabilities`].
//!
//! ```no_run
//! use llm::{ChatMessage, Connector, ExtraOptions, GenerationParameters, OpenAIConnector};
//! use secrecy::SecretString;
//!
//! # async fn run() -> llm::Result<()> {
//! let connector = OpenAIConnector::new("openai", SecretString::from("sk-..."), Default::default())?;
//!
//! let result = connector
//!     .chat(
//!         &[ChatMessage::user("Hello")],
//!         &GenerationParameters::default(),
//!         &ExtraOptions::default(),
//!     )
//!     .await?;
//!
//! println!("{}", result.content());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

mod error;
mod messages;
mod provider;
mod registry;

pub use error::{LlmError, Operation, ProviderFailure};
pub use messages::{
    CONTENT_KEY, ChatMessage, ChatResult, ChatRole, EmbeddingVector, ExtraOptions, GenerationParameters,
};
pub use provider::{
    Capabilities, Connector, google::GoogleConnector, openai::OpenAIConnector, unavailable::UnavailableConnector,
};
pub use registry::{ProviderEntry, Registry, connect};

/// Version of the connector library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type of every connector operation.
pub type Result<T> = std::result::Result<T, LlmError>;
