use promptdeck_common::{AppConfig, Result};
use promptdeck_llm::{ModelGateway, Provider};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::settings::SettingsRepository;
use crate::store::TemplateStore;

/// Shared application state
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Template store
    pub templates: Arc<RwLock<TemplateStore>>,

    /// User settings
    pub settings: Arc<RwLock<SettingsRepository>>,

    /// Upstream model gateway
    pub gateway: Arc<ModelGateway>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig) -> Result<Self> {
        let gateway = ModelGateway::from_config(&config)?;
        Self::with_gateway(config, gateway)
    }

    /// State backed by an explicit gateway
    pub fn with_gateway(config: AppConfig, gateway: ModelGateway) -> Result<Self> {
        let templates = TemplateStore::load(&config.templates_path())?;

        let default_provider = config.default_provider.parse().unwrap_or_else(|e| {
            warn!("{}; falling back to {}", e, Provider::Google);
            Provider::Google
        });
        let settings = SettingsRepository::load(&config.settings_path(), default_provider)?;

        Ok(Self {
            config,
            templates: Arc::new(RwLock::new(templates)),
            settings: Arc::new(RwLock::new(settings)),
            gateway: Arc::new(gateway),
        })
    }
}
