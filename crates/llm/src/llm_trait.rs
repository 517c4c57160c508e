use async_trait::async_trait;
use promptdeck_common::Result;

use crate::provider::Provider;
use crate::types::{GenerateRequest, ModelInfo};

/// Common trait for upstream model clients
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider this client talks to
    fn provider(&self) -> Provider;

    /// Generate text from a prompt
    async fn generate(&self, api_key: &str, request: &GenerateRequest) -> Result<String>;

    /// Models available to the given key
    async fn list_models(&self, api_key: &str) -> Result<Vec<ModelInfo>>;
}
