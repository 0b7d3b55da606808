use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::{
    error::LlmError,
    messages::{ChatMessage, ExtraOptions},
};

/// Reject keys that are absent in all but type. The key format itself is never inspected.
pub(super) fn api_key(provider: &str, api_key: &SecretString) -> crate::Result<()> {
    if api_key.expose_secret().trim().is_empty() {
        return Err(LlmError::Configuration(format!("API key for provider '{provider}' is empty")));
    }

    Ok(())
}

/// Model names end up in URL paths, so only `[A-Za-z0-9._-]` is accepted.
fn is_model_name(model: &str) -> bool {
    !model.is_empty()
        && model
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Check a configured model name, falling back to the provider default.
pub(super) fn model_name(provider: &str, configured: Option<String>, default: &str) -> crate::Result<String> {
    let model = configured.unwrap_or_else(|| default.to_string());

    if !is_model_name(&model) {
        return Err(LlmError::Configuration(format!(
            "unsupported model name '{model}' for provider '{provider}'"
        )));
    }

    Ok(model)
}

/// Resolve the base URL without a trailing slash, so paths can be appended with `/`.
pub(super) fn base_url(provider: &str, configured: Option<Url>, default: &str) -> crate::Result<String> {
    let Some(url) = configured else {
        return Ok(default.to_string());
    };

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(LlmError::Configuration(format!(
            "base URL '{url}' for provider '{provider}' must be an absolute http(s) URL"
        )));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(LlmError::Configuration(format!(
            "base URL '{url}' for provider '{provider}' must not have a query or fragment"
        )));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

pub(super) fn conversation(conversation: &[ChatMessage]) -> crate::Result<()> {
    if conversation.is_empty() {
        return Err(LlmError::InvalidRequest("conversation must not be empty".to_string()));
    }

    Ok(())
}

/// The model for one call: the per-call override if present, else the configured one.
pub(super) fn call_model<'a>(configured: &'a str, extra: &'a ExtraOptions) -> crate::Result<&'a str> {
    match extra.model.as_deref() {
        Some(model) if !is_model_name(model) => Err(LlmError::InvalidRequest(
            format!("unsupported model name '{model}'"),
        )),
        Some(model) => Ok(model),
        None => Ok(configured),
    }
}
