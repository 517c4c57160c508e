use promptdeck_common::{PromptDeckError, Result};
use promptdeck_compose::{InstructionOverrides, InstructionTables};
use promptdeck_llm::Provider;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// User settings persisted next to the templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Provider used when a request names none
    pub selected_provider: Provider,

    /// Model used when a request names none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_model: Option<String>,

    #[serde(default)]
    pub api_keys: BTreeMap<Provider, String>,

    /// Appended to every composed enhancement instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_instruction: Option<String>,

    #[serde(default, skip_serializing_if = "InstructionOverrides::is_empty")]
    pub instruction_overrides: InstructionOverrides,
}

impl Settings {
    pub fn new(selected_provider: Provider) -> Self {
        Self {
            selected_provider,
            selected_model: None,
            api_keys: BTreeMap::new(),
            custom_instruction: None,
            instruction_overrides: InstructionOverrides::default(),
        }
    }

    /// Stored key for `provider`, ignoring blank entries
    pub fn api_key(&self, provider: Provider) -> Option<&str> {
        self.api_keys
            .get(&provider)
            .map(String::as_str)
            .filter(|k| !k.trim().is_empty())
    }

    /// Settings as returned over HTTP, with keys masked
    pub fn masked(&self) -> SettingsView {
        SettingsView {
            selected_provider: self.selected_provider,
            selected_model: self.selected_model.clone(),
            api_keys: self
                .api_keys
                .iter()
                .map(|(p, k)| (*p, mask_key(k)))
                .collect(),
            custom_instruction: self.custom_instruction.clone(),
            custom_instructions: !self.instruction_overrides.is_empty(),
        }
    }
}

/// Keep only the last four characters of a key
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

/// Masked settings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub selected_provider: Provider,
    pub selected_model: Option<String>,
    pub api_keys: BTreeMap<Provider, String>,
    pub custom_instruction: Option<String>,
    /// Whether any instruction category is customized
    pub custom_instructions: bool,
}

/// Partial settings update; absent fields are left as they are.
/// Blank strings clear the model, a key or the custom instruction.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub selected_provider: Option<Provider>,
    pub selected_model: Option<String>,
    pub api_keys: Option<BTreeMap<Provider, String>>,
    pub custom_instruction: Option<String>,
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Loads, validates and persists [`Settings`]
pub struct SettingsRepository {
    settings: Settings,
    tables: InstructionTables,
    file_path: PathBuf,
}

impl SettingsRepository {
    /// Load settings from `path`, or start from defaults when it is missing.
    /// Customized instructions that no longer cover every variant are dropped.
    pub fn load(path: &Path, default_provider: Provider) -> Result<Self> {
        let mut settings = if path.exists() {
            let data = fs::read_to_string(path)?;
            serde_json::from_str(&data).map_err(|e| {
                PromptDeckError::Serialization(format!(
                    "Failed to parse {}: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            Settings::new(default_provider)
        };

        let tables = match InstructionTables::with_overrides(&settings.instruction_overrides) {
            Ok(tables) => tables,
            Err(e) => {
                warn!("Ignoring stored instruction overrides: {}", e);
                settings.instruction_overrides = InstructionOverrides::default();
                InstructionTables::builtin()
            }
        };

        info!(
            "Settings loaded (provider: {}, customized instructions: {})",
            settings.selected_provider,
            !settings.instruction_overrides.is_empty()
        );

        Ok(Self {
            settings,
            tables,
            file_path: path.to_path_buf(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Effective instruction tables
    pub fn tables(&self) -> &InstructionTables {
        &self.tables
    }

    pub fn update(&mut self, update: SettingsUpdate) -> Result<&Settings> {
        if let Some(provider) = update.selected_provider {
            self.settings.selected_provider = provider;
        }
        if let Some(model) = update.selected_model {
            self.settings.selected_model = non_blank(model);
        }
        if let Some(keys) = update.api_keys {
            for (provider, key) in keys {
                match non_blank(key) {
                    Some(key) => self.settings.api_keys.insert(provider, key),
                    None => self.settings.api_keys.remove(&provider),
                };
            }
        }
        if let Some(custom) = update.custom_instruction {
            self.settings.custom_instruction = non_blank(custom);
        }

        self.save()?;
        Ok(&self.settings)
    }

    /// Replace the customized instruction categories.
    ///
    /// # Errors
    ///
    /// `InvalidInput` when a given category misses a variant; the stored
    /// settings are left untouched.
    pub fn set_instructions(&mut self, overrides: InstructionOverrides) -> Result<&InstructionTables> {
        let tables = InstructionTables::with_overrides(&overrides)
            .map_err(|e| PromptDeckError::invalid_input(e.to_string()))?;

        self.settings.instruction_overrides = overrides;
        self.tables = tables;
        self.save()?;
        Ok(&self.tables)
    }

    /// Back to the built-in instructions
    pub fn reset_instructions(&mut self) -> Result<&InstructionTables> {
        self.settings.instruction_overrides = InstructionOverrides::default();
        self.tables = InstructionTables::builtin();
        self.save()?;
        Ok(&self.tables)
    }

    pub fn save(&self) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.settings)?;
        fs::write(&self.file_path, data)?;
        Ok(())
    }
}
