use serde::{Deserialize, Serialize};

use crate::provider::Provider;

/// Provider-neutral text generation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Prompt text sent as a single user message
    pub prompt: String,

    /// Model id; the provider's default model when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Generation options
    #[serde(default)]
    pub options: GenerateOptions,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: None,
            options: GenerateOptions::default(),
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model.filter(|m| !m.trim().is_empty());
        self
    }
}

/// Generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateOptions {
    /// Temperature (0.0 - 1.0)
    pub temperature: f32,

    /// Top-k sampling (Gemini only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    /// Top-p sampling
    pub top_p: f32,

    /// Maximum tokens to generate
    pub max_output_tokens: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: Some(40),
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

/// Kind of model as reported by the provider catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Chat,
    Completion,
    Other,
}

/// One entry of a provider's model catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub id: String,
    pub display_name: String,
    pub provider: Provider,
    #[serde(rename = "type")]
    pub kind: ModelKind,
}

impl ModelInfo {
    pub fn chat(provider: Provider, id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            provider,
            kind: ModelKind::Chat,
        }
    }
}

/// Message of an OpenAI-style chat or Anthropic messages request
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}
