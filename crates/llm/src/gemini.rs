use async_trait::async_trait;
use promptdeck_common::Result;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::llm_trait::LlmClient;
use crate::provider::Provider;
use crate::transport::{extract_text, join_url, send_json};
use crate::types::{GenerateRequest, ModelInfo, ModelKind};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";

/// Google Generative Language API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    base_url: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// `generateContent` endpoint for `model` (accepts `models/<id>` too)
    pub fn generate_url(&self, model: &str) -> String {
        let model = model.trim_start_matches("models/");
        join_url(&self.base_url, &format!("v1beta/models/{}:generateContent", model))
    }

    fn request_body(request: &GenerateRequest) -> Value {
        let options = &request.options;
        let mut generation_config = json!({
            "temperature": options.temperature,
            "topP": options.top_p,
            "maxOutputTokens": options.max_output_tokens,
        });
        if let Some(top_k) = options.top_k {
            generation_config["topK"] = json!(top_k);
        }

        json!({
            "contents": [{ "parts": [{ "text": request.prompt }] }],
            "generationConfig": generation_config,
        })
    }

    fn parse_models(body: &Value) -> Vec<ModelInfo> {
        body.get("models")
            .and_then(Value::as_array)
            .map(|models| {
                models
                    .iter()
                    .filter_map(|m| {
                        let id = m.get("name")?.as_str()?.to_string();
                        let display_name = m
                            .get("displayName")
                            .and_then(Value::as_str)
                            .unwrap_or(&id)
                            .to_string();
                        let generates = m
                            .get("supportedGenerationMethods")
                            .and_then(Value::as_array)
                            .is_some_and(|methods| {
                                methods.iter().any(|v| v.as_str() == Some("generateContent"))
                            });
                        Some(ModelInfo {
                            id,
                            display_name,
                            provider: Provider::Google,
                            kind: if generates { ModelKind::Chat } else { ModelKind::Completion },
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String> {
        let model = request.model.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL);
        debug!("Sending request to Gemini - Model: {}, Prompt length: {}", model, request.prompt.len());

        let body = send_json(
            Provider::Google,
            self.client
                .post(self.generate_url(model))
                .header("x-goog-api-key", api_key)
                .json(&Self::request_body(request)),
        )
        .await?;

        extract_text(Provider::Google, &body, "/candidates/0/content/parts/0/text")
    }

    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>> {
        let body = send_json(
            Provider::Google,
            self.client
                .get(join_url(&self.base_url, "v1beta/models"))
                .header("x-goog-api-key", api_key),
        )
        .await?;

        Ok(Self::parse_models(&body))
    }
}
