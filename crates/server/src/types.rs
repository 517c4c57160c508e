use chrono::{DateTime, Utc};
use promptdeck_compose::{DynamicFields, Methodology, TemplateAttributes};
use promptdeck_common::{PromptDeckError, Result};
use serde::{Deserialize, Serialize};

/// Stored prompt template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Unique identifier
    pub id: u64,

    /// Display name
    pub name: String,

    /// Template body with `{{placeholder}}` tokens
    pub content: String,

    /// Built-in template flag
    #[serde(default)]
    pub is_core: bool,

    /// Domain, provider, model, role and methodologies
    #[serde(flatten)]
    pub attributes: TemplateAttributes,

    /// Position in the template list
    pub order: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of template create and update requests
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInput {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub is_core: bool,
    #[serde(flatten)]
    pub attributes: TemplateAttributes,
}

impl TemplateInput {
    /// Reject blank names and drop repeated methodologies
    pub fn normalized(mut self) -> Result<Self> {
        if self.name.trim().is_empty() {
            return Err(PromptDeckError::invalid_input("Template name is required"));
        }

        let mut unique: Vec<Methodology> = Vec::with_capacity(self.attributes.methodologies.len());
        for m in self.attributes.methodologies {
            if !unique.contains(&m) {
                unique.push(m);
            }
        }
        self.attributes.methodologies = unique;
        Ok(self)
    }
}

/// One entry of a reorder request
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReorderItem {
    pub id: u64,
    pub order: i64,
}

/// Template list query
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateQuery {
    /// Domain label, e.g. `Creative Writing`
    pub domain: Option<String>,

    /// List core templates before the others
    #[serde(default)]
    pub core_first: bool,
}

/// Render request
#[derive(Debug, Default, Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub fields: DynamicFields,
}

/// Render response
#[derive(Debug, Serialize, Deserialize)]
pub struct RenderResponse {
    pub prompt: String,
    pub placeholders: Vec<String>,
    pub unresolved: Vec<String>,
}

/// Instruction preview request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionRequest {
    /// Replaces the stored custom instruction for this call
    pub custom_instruction: Option<String>,
}

/// Instruction preview response
#[derive(Debug, Serialize)]
pub struct InstructionResponse {
    pub instruction: String,
}

/// Template enhancement request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceTemplateRequest {
    #[serde(default)]
    pub fields: DynamicFields,
    pub custom_instruction: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
}

/// Template enhancement response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceTemplateResponse {
    /// Rendered template before enhancement
    pub generated_prompt: String,
    pub enhanced_prompt: String,
}

/// Placeholder extraction request
#[derive(Debug, Deserialize)]
pub struct PlaceholdersRequest {
    pub content: String,
}

/// Placeholder extraction response
#[derive(Debug, Serialize)]
pub struct PlaceholdersResponse {
    pub placeholders: Vec<String>,
}

/// Raw prompt enhancement request
#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    pub prompt: String,
    pub provider: Option<String>,
    pub model: Option<String>,
}

/// Raw prompt enhancement response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceResponse {
    pub enhanced_prompt: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub templates: usize,
}

/// Error body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

