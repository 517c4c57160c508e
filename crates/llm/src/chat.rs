//! OpenAI-compatible chat completions (OpenAI, DeepSeek, OpenRouter)

use async_trait::async_trait;
use promptdeck_common::{PromptDeckError, Result};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::llm_trait::LlmClient;
use crate::provider::Provider;
use crate::transport::{extract_text, join_url, send_json};
use crate::types::{ChatMessage, GenerateRequest, ModelInfo};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_DEEPSEEK_MODEL: &str = "deepseek-chat";
pub const DEFAULT_OPENROUTER_MODEL: &str = "anthropic/claude-3-haiku";

/// Title reported to OpenRouter
const OPENROUTER_TITLE: &str = "PromptDeck";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

/// Client for providers exposing `/v1/chat/completions`
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    provider: Provider,
    base_url: String,
    client: Client,
    /// Sent as `HTTP-Referer` to OpenRouter
    referer: Option<String>,
}

impl ChatCompletionsClient {
    pub fn openai(base_url: impl Into<String>, client: Client) -> Self {
        Self::with_provider(Provider::OpenAI, base_url, client)
    }

    pub fn deepseek(base_url: impl Into<String>, client: Client) -> Self {
        Self::with_provider(Provider::Deepseek, base_url, client)
    }

    pub fn openrouter(base_url: impl Into<String>, client: Client, referer: impl Into<String>) -> Self {
        Self {
            referer: Some(referer.into()),
            ..Self::with_provider(Provider::OpenRouter, base_url, client)
        }
    }

    fn with_provider(provider: Provider, base_url: impl Into<String>, client: Client) -> Self {
        Self {
            provider,
            base_url: base_url.into(),
            client,
            referer: None,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self.provider {
            Provider::Deepseek => DEFAULT_DEEPSEEK_MODEL,
            Provider::OpenRouter => DEFAULT_OPENROUTER_MODEL,
            _ => DEFAULT_OPENAI_MODEL,
        }
    }

    fn authorized(&self, builder: RequestBuilder, api_key: &str) -> RequestBuilder {
        let builder = builder.bearer_auth(api_key);
        match &self.referer {
            Some(referer) => builder
                .header("HTTP-Referer", referer)
                .header("X-Title", OPENROUTER_TITLE),
            None => builder,
        }
    }

    fn parse_models(&self, body: &Value) -> Vec<ModelInfo> {
        let Some(data) = body.get("data").and_then(Value::as_array) else {
            return Vec::new();
        };

        data.iter()
            .filter_map(|m| m.get("id").and_then(Value::as_str).map(|id| (id, m)))
            .filter(|(id, _)| self.provider != Provider::OpenAI || id.starts_with("gpt-"))
            .map(|(id, m)| {
                let name = m.get("name").and_then(Value::as_str).unwrap_or(id);
                ModelInfo::chat(self.provider, id, name)
            })
            .collect()
    }

    fn deepseek_models() -> Vec<ModelInfo> {
        vec![
            ModelInfo::chat(Provider::Deepseek, "deepseek-chat", "DeepSeek Chat"),
            ModelInfo::chat(Provider::Deepseek, "deepseek-coder", "DeepSeek Coder"),
        ]
    }
}

#[async_trait]
impl LlmClient for ChatCompletionsClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String> {
        let model = request.model.as_deref().unwrap_or(self.default_model());
        debug!(
            "Sending request to {} - Model: {}, Prompt length: {}",
            self.provider.display_name(),
            model,
            request.prompt.len()
        );

        let body = ChatRequest {
            model,
            messages: vec![ChatMessage::user(&request.prompt)],
            temperature: request.options.temperature,
            top_p: request.options.top_p,
            max_tokens: request.options.max_output_tokens,
        };

        let builder = self
            .client
            .post(join_url(&self.base_url, "v1/chat/completions"))
            .json(&body);
        let response = send_json(self.provider, self.authorized(builder, api_key)).await?;

        extract_text(self.provider, &response, "/choices/0/message/content")
    }

    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>> {
        if self.provider == Provider::Deepseek {
            return Ok(Self::deepseek_models());
        }

        let builder = self.client.get(join_url(&self.base_url, "v1/models"));
        let body = send_json(self.provider, self.authorized(builder, api_key)).await?;

        let models = self.parse_models(&body);
        if models.is_empty() {
            return Err(PromptDeckError::llm(format!(
                "Unexpected response format from {} API",
                self.provider.display_name()
            )));
        }
        Ok(models)
    }
}
