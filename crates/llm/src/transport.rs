//! Shared HTTP plumbing for provider clients

use promptdeck_common::{PromptDeckError, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::provider::Provider;

/// Build the reqwest client shared by all provider clients
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e).into())
}

/// Classify a non-success upstream status
pub(crate) fn status_error(provider: Provider, status: StatusCode, body: &str) -> PromptDeckError {
    let msg = format!("{} API error ({}): {}", provider.display_name(), status, body.trim());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PromptDeckError::unauthorized(msg),
        StatusCode::TOO_MANY_REQUESTS => PromptDeckError::network(msg),
        s if s.is_server_error() => PromptDeckError::network(msg),
        _ => PromptDeckError::llm(msg),
    }
}

/// Send a request and decode its JSON body
pub(crate) async fn send_json(provider: Provider, request: RequestBuilder) -> Result<Value> {
    let response = request.send().await.map_err(|e| {
        PromptDeckError::network(format!(
            "Failed to reach {} API: {}",
            provider.display_name(),
            e
        ))
    })?;

    let status = response.status();
    debug!("{} API response status: {}", provider.display_name(), status);

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_error(provider, status, &body));
    }

    response.json::<Value>().await.map_err(|e| {
        PromptDeckError::llm(format!(
            "Failed to parse {} response: {}",
            provider.display_name(),
            e
        ))
    })
}

/// Pull the generated text at `pointer` out of a response body
pub(crate) fn extract_text(provider: Provider, body: &Value, pointer: &str) -> Result<String> {
    let text = body
        .pointer(pointer)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            PromptDeckError::llm(format!(
                "Unexpected response format from {} API",
                provider.display_name()
            ))
        })?;

    if text.trim().is_empty() {
        return Err(PromptDeckError::llm(format!(
            "Empty response from {} API",
            provider.display_name()
        )));
    }

    Ok(text.to_string())
}

/// Join a base URL and a path without doubling slashes
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
