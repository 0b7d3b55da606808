use config::ExtraFields;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::{LlmError, Operation, ProviderFailure};

/// Send a prepared request and return the body of a successful response.
///
/// Unsuccessful statuses are mapped to a `ProviderFailure`; the body becomes the message.
/// Transport errors drop the URL, which may carry a query-string key.
pub(super) async fn send(provider: &str, operation: Operation, request: RequestBuilder) -> crate::Result<String> {
    let response = request.send().await.map_err(|e| {
        let e = e.without_url();
        log::error!("Failed to send {operation} request to {provider}: {e}");
        LlmError::provider(provider, operation, ProviderFailure::Connection(e.to_string()))
    })?;

    let status = response.status();

    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        log::error!("{provider} API error ({status}): {error_text}");

        return Err(LlmError::provider(
            provider,
            operation,
            ProviderFailure::from_status(status.as_u16(), error_text),
        ));
    }

    response.text().await.map_err(|e| {
        let e = e.without_url();
        log::error!("Failed to read {provider} response body: {e}");
        LlmError::provider(provider, operation, ProviderFailure::Connection(e.to_string()))
    })
}

/// Parse a response body, logging the raw body when it does not match the expected shape.
pub(super) fn parse<T: DeserializeOwned>(provider: &str, operation: Operation, body: &str) -> crate::Result<T> {
    sonic_rs::from_str(body).map_err(|e| {
        log::error!("Failed to parse {provider} {operation} response: {e}");
        log::debug!("Raw response that failed to parse: {body}");
        LlmError::provider(provider, operation, ProviderFailure::MalformedResponse(e.to_string()))
    })
}

/// Merge configured and per-call pass-through fields; per-call values win.
///
/// Keys in `reserved` are set by the connector itself and are dropped.
pub(super) fn pass_through(
    provider: &str,
    configured: &ExtraFields,
    call: &ExtraFields,
    reserved: &[&str],
) -> ExtraFields {
    configured
        .iter()
        .chain(call)
        .filter(|(key, _)| {
            let keep = !reserved.contains(&key.as_str());

            if !keep {
                log::warn!("Ignoring pass-through field '{key}' for {provider}: it is set by the connector");
            }

            keep
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
