use crate::error::PromptDeckError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upper bound for `LLM_MAX_RETRIES`
pub const MAX_LLM_RETRIES: u32 = 10;

/// PromptDeck application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Data directory holding templates.json and settings.json
    pub db_base_path: PathBuf,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Built client assets served at `/` (optional)
    pub static_dir: Option<PathBuf>,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Gateway provider used when a request names none
    pub default_provider: String,

    /// Timeout for upstream model calls, in seconds
    pub llm_timeout_secs: u64,

    /// Attempts per upstream model call
    pub llm_max_retries: u32,

    /// Google Generative Language API base URL
    pub gemini_base_url: String,

    /// Anthropic API base URL
    pub anthropic_base_url: String,

    /// OpenAI API base URL
    pub openai_base_url: String,

    /// DeepSeek API base URL
    pub deepseek_base_url: String,

    /// OpenRouter API base URL
    pub openrouter_base_url: String,

    /// Public URL of this app, sent to OpenRouter as HTTP-Referer
    pub public_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_base_path: PathBuf::from("./db"),
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            static_dir: None,
            log_dir: PathBuf::from("./db/log"),
            log_level: "info".to_string(),
            default_provider: "google".to_string(),
            llm_timeout_secs: 120,
            llm_max_retries: 3,
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            anthropic_base_url: "https://api.anthropic.com".to_string(),
            openai_base_url: "https://api.openai.com".to_string(),
            deepseek_base_url: "https://api.deepseek.com".to_string(),
            openrouter_base_url: "https://openrouter.ai/api".to_string(),
            public_url: "http://localhost:8080".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, PromptDeckError> {
        // Load .env from the working directory or its parents (ignore if not exists).
        // Variables already set, e.g. by CLI flags, are kept.
        let _ = dotenv::dotenv();

        let defaults = Self::default();

        let config = Self {
            db_base_path: Self::get_env_path("DB_BASE_PATH")
                .unwrap_or(defaults.db_base_path),
            server_host: std::env::var("SERVER_HOST")
                .unwrap_or(defaults.server_host),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.server_port),
            static_dir: Self::get_env_path("STATIC_DIR"),
            log_dir: Self::get_env_path("LOG_DIR")
                .unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL")
                .unwrap_or(defaults.log_level),
            default_provider: std::env::var("DEFAULT_PROVIDER")
                .unwrap_or(defaults.default_provider),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.llm_timeout_secs),
            llm_max_retries: std::env::var("LLM_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.llm_max_retries),
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or(defaults.gemini_base_url),
            anthropic_base_url: std::env::var("ANTHROPIC_BASE_URL")
                .unwrap_or(defaults.anthropic_base_url),
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or(defaults.openai_base_url),
            deepseek_base_url: std::env::var("DEEPSEEK_BASE_URL")
                .unwrap_or(defaults.deepseek_base_url),
            openrouter_base_url: std::env::var("OPENROUTER_BASE_URL")
                .unwrap_or(defaults.openrouter_base_url),
            public_url: std::env::var("PUBLIC_URL")
                .unwrap_or(defaults.public_url),
        };

        config.validate()?;

        // Ensure required directories exist
        config.ensure_directories()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), PromptDeckError> {
        for dir in [&self.db_base_path, &self.log_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    PromptDeckError::config(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Template store file
    pub fn templates_path(&self) -> PathBuf {
        self.db_base_path.join("templates.json")
    }

    /// Settings file (selected provider, API keys, custom instructions)
    pub fn settings_path(&self) -> PathBuf {
        self.db_base_path.join("settings.json")
    }

    /// Get log file path
    pub fn get_log_path(&self, filename: &str) -> PathBuf {
        self.log_dir.join(filename)
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), PromptDeckError> {
        let urls = [
            ("GEMINI_BASE_URL", &self.gemini_base_url),
            ("ANTHROPIC_BASE_URL", &self.anthropic_base_url),
            ("OPENAI_BASE_URL", &self.openai_base_url),
            ("DEEPSEEK_BASE_URL", &self.deepseek_base_url),
            ("OPENROUTER_BASE_URL", &self.openrouter_base_url),
        ];

        for (key, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(PromptDeckError::config(format!(
                    "{} must start with http:// or https://",
                    key
                )));
            }
        }

        // Validate port range
        if self.server_port == 0 {
            return Err(PromptDeckError::config("Server port cannot be 0"));
        }

        if !(1..=MAX_LLM_RETRIES).contains(&self.llm_max_retries) {
            return Err(PromptDeckError::config(format!(
                "LLM_MAX_RETRIES must be between 1 and {}",
                MAX_LLM_RETRIES
            )));
        }

        if self.llm_timeout_secs == 0 {
            return Err(PromptDeckError::config("LLM_TIMEOUT_SECS cannot be 0"));
        }

        Ok(())
    }
}
