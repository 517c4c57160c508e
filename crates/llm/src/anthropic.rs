use async_trait::async_trait;
use promptdeck_common::Result;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::llm_trait::LlmClient;
use crate::provider::Provider;
use crate::transport::{extract_text, join_url, send_json};
use crate::types::{ChatMessage, GenerateRequest, ModelInfo};

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-7-sonnet-20250219";
const ANTHROPIC_VERSION: &str = "2023-06-01";

const ANTHROPIC_MODELS: &[(&str, &str)] = &[
    ("claude-3-7-sonnet-20250219", "Claude 3.7 Sonnet"),
    ("claude-3-5-sonnet-20241022", "Claude 3.5 Sonnet"),
    ("claude-3-5-haiku-20241022", "Claude 3.5 Haiku"),
    ("claude-3-opus-20240229", "Claude 3 Opus"),
    ("claude-3-haiku-20240307", "Claude 3 Haiku"),
];

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

/// Anthropic Messages API client
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    base_url: String,
    client: Client,
}

impl AnthropicClient {
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String> {
        let model = request.model.as_deref().unwrap_or(DEFAULT_ANTHROPIC_MODEL);
        debug!("Sending request to Anthropic - Model: {}, Prompt length: {}", model, request.prompt.len());

        let body = MessagesRequest {
            model,
            max_tokens: request.options.max_output_tokens,
            temperature: request.options.temperature,
            messages: vec![ChatMessage::user(&request.prompt)],
        };

        let response = send_json(
            Provider::Anthropic,
            self.client
                .post(join_url(&self.base_url, "v1/messages"))
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body),
        )
        .await?;

        extract_text(Provider::Anthropic, &response, "/content/0/text")
    }

    async fn list_models(&self, _api_key: &str) -> Result<Vec<ModelInfo>> {
        Ok(ANTHROPIC_MODELS
            .iter()
            .map(|(id, name)| ModelInfo::chat(Provider::Anthropic, *id, *name))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_catalog_contains_default() {
        let client = AnthropicClient::new("http://127.0.0.1:9", Client::new());
        let models = client.list_models("").await.unwrap();
        assert!(models.iter().any(|m| m.id == DEFAULT_ANTHROPIC_MODEL));
        assert!(models.iter().all(|m| m.provider == Provider::Anthropic));
    }

    #[test]
    fn test_messages_request_shape() {
        let request = MessagesRequest {
            model: DEFAULT_ANTHROPIC_MODEL,
            max_tokens: 1024,
            temperature: 0.7,
            messages: vec![ChatMessage::user("Improve")],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0]["content"], "Improve");
        assert_eq!(value["model"], "claude-3-7-sonnet-20250219");
    }
}
