//! PromptDeck model gateway
//!
//! Provider clients for Gemini, Anthropic and OpenAI-compatible chat APIs,
//! behind a single retrying gateway.

mod anthropic;
mod chat;
mod gateway;
mod gemini;
mod llm_trait;
mod provider;
mod transport;
mod types;

pub use anthropic::{AnthropicClient, DEFAULT_ANTHROPIC_MODEL};
pub use chat::{
    ChatCompletionsClient, DEFAULT_DEEPSEEK_MODEL, DEFAULT_OPENAI_MODEL, DEFAULT_OPENROUTER_MODEL,
};
pub use gateway::ModelGateway;
pub use gemini::{GeminiClient, DEFAULT_GEMINI_MODEL};
pub use llm_trait::LlmClient;
pub use provider::Provider;
pub use transport::build_http_client;
pub use types::{GenerateOptions, GenerateRequest, ModelInfo, ModelKind};
