use std::fmt;

use config::ProviderType;
use thiserror::Error;

/// The contract operation an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Constructing the connector.
    Construct,
    /// `Connector::chat`.
    Chat,
    /// `Connector::generate_text`.
    GenerateText,
    /// `Connector::get_embeddings`.
    GetEmbeddings,
}

impl Operation {
    /// The method name of the operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Construct => "construct",
            Self::Chat => "chat",
            Self::GenerateText => "generate_text",
            Self::GetEmbeddings => "get_embeddings",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by connectors.
///
/// Nothing here is retried or recovered locally: every failure reaches the caller as-is.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Invalid or missing construction-time configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Caller input rejected before anything was sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No provider with this name is configured.
    #[error("Provider '{0}' not found")]
    ProviderNotFound(String),

    /// The provider failed while serving a call.
    #[error("{provider} {operation} failed: {failure}")]
    Provider {
        /// Name of the connector instance.
        provider: String,
        /// Operation that failed.
        operation: Operation,
        /// What went wrong at the provider.
        #[source]
        failure: ProviderFailure,
    },

    /// The operation is permanently absent for this provider.
    #[error("{} API integration is not available ({operation})", .provider.display_name())]
    NotAvailable {
        /// Provider lacking the capability.
        provider: ProviderType,
        /// Operation that was refused.
        operation: Operation,
    },
}

impl LlmError {
    pub(crate) fn not_available(provider: ProviderType, operation: Operation) -> Self {
        Self::NotAvailable { provider, operation }
    }

    pub(crate) fn provider(provider: &str, operation: Operation, failure: ProviderFailure) -> Self {
        Self::Provider {
            provider: provider.to_string(),
            operation,
            failure,
        }
    }

    /// Whether this error signals a static capability gap.
    pub fn is_not_available(&self) -> bool {
        matches!(self, Self::NotAvailable { .. })
    }

    /// Whether this error wraps a failure returned by the provider.
    pub fn is_provider_error(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }

    /// Whether this error comes from invalid configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// The operation this error is attributed to, if any.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::Provider { operation, .. } | Self::NotAvailable { operation, .. } => Some(*operation),
            Self::Configuration(_) | Self::InvalidRequest(_) | Self::ProviderNotFound(_) => None,
        }
    }

    /// The provider failure, for `Provider` errors.
    pub fn failure(&self) -> Option<&ProviderFailure> {
        match self {
            Self::Provider { failure, .. } => Some(failure),
            _ => None,
        }
    }

    /// Re-attribute an error raised by a delegated call to the calling operation.
    pub(crate) fn for_operation(self, operation: Operation) -> Self {
        match self {
            Self::Provider { provider, failure, .. } => Self::Provider {
                provider,
                operation,
                failure,
            },
            Self::NotAvailable { provider, .. } => Self::NotAvailable { provider, operation },
            other => other,
        }
    }
}

/// Failure reported by, or while talking to, a provider API.
#[derive(Debug, Error)]
pub enum ProviderFailure {
    /// Authentication failed (missing or invalid API key).
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Insufficient quota or credits.
    #[error("Insufficient quota: {0}")]
    InsufficientQuota(String),

    /// Model not found at the provider.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The provider rejected the request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Provider API returned another error status.
    #[error("Provider API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// Network or connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The response body could not be parsed.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The response parsed but carried no usable content.
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl ProviderFailure {
    /// Map an unsuccessful HTTP status and its body to a failure.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            400 => Self::InvalidRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::InsufficientQuota(message),
            404 => Self::ModelNotFound(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::Api { status, message },
        }
    }

    /// HTTP status code behind this failure, when the provider answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidRequest(_) => Some(400),
            Self::AuthenticationFailed(_) => Some(401),
            Self::InsufficientQuota(_) => Some(403),
            Self::ModelNotFound(_) => Some(404),
            Self::RateLimitExceeded(_) => Some(429),
            Self::Api { status, .. } => Some(*status),
            Self::Connection(_) | Self::MalformedResponse(_) | Self::EmptyResponse => None,
        }
    }
}
