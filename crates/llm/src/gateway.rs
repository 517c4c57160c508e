use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use promptdeck_common::{AppConfig, PromptDeckError, Result};
use tracing::{debug, info, warn};

use crate::anthropic::AnthropicClient;
use crate::chat::ChatCompletionsClient;
use crate::gemini::GeminiClient;
use crate::llm_trait::LlmClient;
use crate::provider::Provider;
use crate::transport::build_http_client;
use crate::types::{GenerateRequest, ModelInfo};

/// Routes generation requests to the configured provider clients
pub struct ModelGateway {
    clients: HashMap<Provider, Arc<dyn LlmClient>>,
    max_retries: u32,
    base_delay: Duration,
}

impl ModelGateway {
    /// Gateway over the given clients with no retries
    pub fn new(clients: Vec<Arc<dyn LlmClient>>) -> Self {
        Self {
            clients: clients.into_iter().map(|c| (c.provider(), c)).collect(),
            max_retries: 1,
            base_delay: Duration::from_secs(1),
        }
    }

    /// Gateway with one client per provider, pointed at the configured base URLs
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let http = build_http_client(Duration::from_secs(config.llm_timeout_secs))?;

        let clients: Vec<Arc<dyn LlmClient>> = vec![
            Arc::new(GeminiClient::new(&config.gemini_base_url, http.clone())),
            Arc::new(AnthropicClient::new(&config.anthropic_base_url, http.clone())),
            Arc::new(ChatCompletionsClient::openai(&config.openai_base_url, http.clone())),
            Arc::new(ChatCompletionsClient::deepseek(&config.deepseek_base_url, http.clone())),
            Arc::new(ChatCompletionsClient::openrouter(
                &config.openrouter_base_url,
                http,
                &config.public_url,
            )),
        ];

        info!(
            "Model gateway initialized ({} providers, max retries: {})",
            clients.len(),
            config.llm_max_retries
        );
        Ok(Self::new(clients).with_retry(config.llm_max_retries, Duration::from_secs(1)))
    }

    /// Retry transient failures up to `max_retries` attempts in total,
    /// waiting `base_delay * 2^(attempt-1)` between attempts
    pub fn with_retry(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries.max(1);
        self.base_delay = base_delay;
        self
    }

    pub fn providers(&self) -> Vec<Provider> {
        let mut providers: Vec<Provider> = self.clients.keys().copied().collect();
        providers.sort();
        providers
    }

    fn client(&self, provider: Provider) -> Result<&Arc<dyn LlmClient>> {
        self.clients.get(&provider).ok_or_else(|| {
            PromptDeckError::invalid_input(format!("Unsupported provider: {}", provider))
        })
    }

    /// Generate text with `provider` (with retry logic)
    pub async fn generate(
        &self,
        provider: Provider,
        api_key: &str,
        request: &GenerateRequest,
    ) -> Result<String> {
        if api_key.trim().is_empty() {
            return Err(PromptDeckError::unauthorized(format!(
                "API key is required for {}",
                provider.display_name()
            )));
        }

        let client = self.client(provider)?;
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match client.generate(api_key, request).await {
                Ok(text) => {
                    debug!("Received response from {} - Length: {}", provider.display_name(), text.len());
                    return Ok(text);
                }
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = self.base_delay.saturating_mul(2u32.saturating_pow(attempt - 1));
                    warn!(
                        "{} request failed (attempt {}/{}): {}. Retrying in {:?}...",
                        provider.display_name(),
                        attempt,
                        self.max_retries,
                        e,
                        delay
                    );
                    last_error = Some(e);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("All retries failed").into()))
    }

    /// Model catalog of one provider
    pub async fn list_models(&self, provider: Provider, api_key: &str) -> Result<Vec<ModelInfo>> {
        self.client(provider)?.list_models(api_key).await
    }

    /// Catalogs of every provider with a key in `api_keys`.
    /// Providers that fail are logged and skipped.
    pub async fn list_all_models(&self, api_keys: &BTreeMap<Provider, String>) -> Vec<ModelInfo> {
        let requests = self
            .providers()
            .into_iter()
            .filter_map(|p| {
                let key = api_keys.get(&p).filter(|k| !k.trim().is_empty())?;
                Some(async move { (p, self.list_models(p, key).await) })
            })
            .collect::<Vec<_>>();

        let mut models = Vec::new();
        for (provider, result) in join_all(requests).await {
            match result {
                Ok(list) => models.extend(list),
                Err(e) => warn!("Failed to list {} models: {}", provider.display_name(), e),
            }
        }
        models
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Client that fails the first `failures` calls with `error`
    struct FlakyClient {
        provider: Provider,
        failures: u32,
        error: fn() -> PromptDeckError,
        calls: AtomicU32,
        last_prompt: Mutex<Option<String>>,
    }

    impl FlakyClient {
        fn new(provider: Provider, failures: u32, error: fn() -> PromptDeckError) -> Arc<Self> {
            Arc::new(Self {
                provider,
                failures,
                error,
                calls: AtomicU32::new(0),
                last_prompt: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl LlmClient for FlakyClient {
        fn provider(&self) -> Provider {
            self.provider
        }

        async fn generate(&self, _api_key: &str, request: &GenerateRequest) -> Result<String> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(request.prompt.clone());
            if call < self.failures {
                return Err((self.error)());
            }
            Ok(format!("enhanced: {}", request.prompt))
        }

        async fn list_models(&self, _api_key: &str) -> Result<Vec<ModelInfo>> {
            if self.failures > 0 {
                return Err((self.error)());
            }
            Ok(vec![ModelInfo::chat(self.provider, "m", "M")])
        }
    }

    fn network() -> PromptDeckError {
        PromptDeckError::network("connection reset")
    }

    fn unauthorized() -> PromptDeckError {
        PromptDeckError::unauthorized("bad key")
    }

    fn gateway(clients: Vec<Arc<dyn LlmClient>>) -> ModelGateway {
        ModelGateway::new(clients).with_retry(3, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_generate_routes_to_provider() {
        let google = FlakyClient::new(Provider::Google, 0, network);
        let gw = gateway(vec![google.clone()]);

        let text = gw
            .generate(Provider::Google, "key", &GenerateRequest::new("hello"))
            .await
            .unwrap();
        assert_eq!(text, "enhanced: hello");
        assert_eq!(google.last_prompt.lock().unwrap().as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried() {
        let client = FlakyClient::new(Provider::OpenAI, 2, network);
        let gw = gateway(vec![client.clone()]);

        let result = gw.generate(Provider::OpenAI, "key", &GenerateRequest::new("x")).await;
        assert!(result.is_ok());
        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_exhausted_returns_last_error() {
        let client = FlakyClient::new(Provider::OpenAI, 5, network);
        let gw = gateway(vec![client.clone()]);

        let err = gw
            .generate(Provider::OpenAI, "key", &GenerateRequest::new("x"))
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_backoff_saturates_for_large_retry_counts() {
        let client = FlakyClient::new(Provider::OpenAI, 35, network);
        let gw = ModelGateway::new(vec![client.clone()]).with_retry(40, Duration::ZERO);

        let result = gw.generate(Provider::OpenAI, "key", &GenerateRequest::new("x")).await;
        assert!(result.is_ok());
        assert_eq!(client.calls.load(Ordering::SeqCst), 36);
    }

    #[tokio::test]
    async fn test_auth_errors_are_not_retried() {
        let client = FlakyClient::new(Provider::Anthropic, 5, unauthorized);
        let gw = gateway(vec![client.clone()]);

        let err = gw
            .generate(Provider::Anthropic, "key", &GenerateRequest::new("x"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_key_and_provider() {
        let client = FlakyClient::new(Provider::Google, 0, network);
        let gw = gateway(vec![client.clone()]);

        let err = gw.generate(Provider::Google, "  ", &GenerateRequest::new("x")).await.unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);

        let err = gw.generate(Provider::Deepseek, "key", &GenerateRequest::new("x")).await.unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_list_all_models_skips_failures_and_missing_keys() {
        let gw = gateway(vec![
            FlakyClient::new(Provider::Google, 0, network),
            FlakyClient::new(Provider::OpenAI, 1, unauthorized),
            FlakyClient::new(Provider::Deepseek, 0, network),
        ]);

        let mut keys = BTreeMap::new();
        keys.insert(Provider::Google, "g".to_string());
        keys.insert(Provider::OpenAI, "o".to_string());

        let models = gw.list_all_models(&keys).await;
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].provider, Provider::Google);
    }

    #[test]
    fn test_from_config_registers_every_provider() {
        let gw = ModelGateway::from_config(&AppConfig::default()).unwrap();
        assert_eq!(gw.providers(), Provider::ALL.to_vec());
    }
}
