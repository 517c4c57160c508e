//! Enhancement-prompt composition.
//!
//! Builds the instruction text sent alongside a rendered prompt when asking
//! a model to improve it. Composition is a pure function of the template
//! attributes, the instruction tables and the optional custom instruction.

use serde::{Deserialize, Serialize};

use crate::category::{role_type, Methodology, ModelType, ProviderType, Role, TemplateDomain};
use crate::instructions::InstructionTables;

/// Directive appended to every enhancement instruction
pub const CLOSING_DIRECTIVE: &str = "IMPORTANT: Return only the enhanced version of the prompt. Do not include any commentary, explanations, or formatting markers. Do not prefix with phrases like \"Enhanced Prompt:\" or add any other labels.";

/// Lead-in of the full enhancement request
pub const ENHANCEMENT_PREAMBLE: &str =
    "Please enhance the following prompt while maintaining its core intent and purpose:";

/// Classification attributes of a template that drive composition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateAttributes {
    pub domain: TemplateDomain,
    pub provider_type: ProviderType,
    pub model_type: ModelType,
    #[serde(with = "role_type")]
    pub role_type: Option<Role>,
    /// Selected methodologies in insertion order
    #[serde(default)]
    pub methodologies: Vec<Methodology>,
}

/// Compose the enhancement instruction for a template.
///
/// Segments appear in a fixed order: domain, provider, model, role (absent
/// when the template has no role), one per methodology in stored order,
/// then `custom` when it is not blank. The [`CLOSING_DIRECTIVE`] follows
/// after an empty line.
///
/// # Examples
///
/// ```
/// use promptdeck_compose::{compose_enhancement_instruction, InstructionTables, TemplateAttributes};
///
/// let tables = InstructionTables::builtin();
/// let text = compose_enhancement_instruction(&TemplateAttributes::default(), &tables, None);
/// assert!(text.ends_with("or add any other labels."));
/// ```
pub fn compose_enhancement_instruction(
    attrs: &TemplateAttributes,
    tables: &InstructionTables,
    custom: Option<&str>,
) -> String {
    let mut segments: Vec<&str> = vec![
        tables.domains.get(attrs.domain),
        tables.providers.get(attrs.provider_type),
        tables.models.get(attrs.model_type),
    ];

    if let Some(role) = attrs.role_type {
        segments.push(tables.roles.get(role));
    }

    segments.extend(attrs.methodologies.iter().map(|m| tables.methodologies.get(*m)));

    if let Some(custom) = custom.map(str::trim).filter(|c| !c.is_empty()) {
        segments.push(custom);
    }

    format!("{}\n\n{}", segments.join(" "), CLOSING_DIRECTIVE)
}

/// Full text sent to the model: the rendered prompt plus composed instructions.
pub fn build_enhancement_prompt(
    original_prompt: &str,
    attrs: &TemplateAttributes,
    tables: &InstructionTables,
    custom: Option<&str>,
) -> String {
    format!(
        "{} Original Prompt: {} Enhancement Instructions: {}",
        ENHANCEMENT_PREAMBLE,
        original_prompt,
        compose_enhancement_instruction(attrs, tables, custom)
    )
}
