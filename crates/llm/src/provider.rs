use promptdeck_common::PromptDeckError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upstream model provider reachable through the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Anthropic,
    OpenAI,
    Deepseek,
    OpenRouter,
}

impl Provider {
    pub const ALL: [Provider; 5] = [
        Provider::Google,
        Provider::Anthropic,
        Provider::OpenAI,
        Provider::Deepseek,
        Provider::OpenRouter,
    ];

    /// Identifier used in requests and settings (e.g. `"openrouter"`)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Anthropic => "anthropic",
            Self::OpenAI => "openai",
            Self::Deepseek => "deepseek",
            Self::OpenRouter => "openrouter",
        }
    }

    /// Human-readable name for messages
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Google => "Gemini",
            Self::Anthropic => "Anthropic",
            Self::OpenAI => "OpenAI",
            Self::Deepseek => "DeepSeek",
            Self::OpenRouter => "OpenRouter",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = PromptDeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| PromptDeckError::invalid_input(format!("Unsupported provider: {}", s)))
    }
}
