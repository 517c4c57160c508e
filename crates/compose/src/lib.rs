//! PromptDeck composition core
//!
//! Placeholder extraction/substitution/preservation for `{{name}}`
//! templates and composition of model enhancement instructions from the
//! template's classification attributes.
//!
//! # Usage
//!
//! ```
//! use std::collections::HashMap;
//! use promptdeck_compose::{extract_placeholders, render_template};
//!
//! let content = "Review {{file}} for {{concern}}";
//! assert_eq!(extract_placeholders(content), vec!["file", "concern"]);
//!
//! let mut fields = HashMap::new();
//! fields.insert("file".to_string(), "main.rs".to_string());
//! assert_eq!(render_template(content, &fields), "Review main.rs for {{concern}}");
//! ```

pub mod category;
mod composer;
mod error;
mod fields;
mod instructions;
mod placeholder;

pub use category::{
    parse_role_type, role_type, Category, Methodology, ModelType, ProviderType, Role,
    TemplateDomain, NO_ROLE,
};
pub use composer::{
    build_enhancement_prompt, compose_enhancement_instruction, TemplateAttributes,
    CLOSING_DIRECTIVE, ENHANCEMENT_PREAMBLE,
};
pub use error::ComposeError;
pub use fields::{DynamicField, DynamicFields};
pub use instructions::{CategoryTable, InstructionOverrides, InstructionTables};
pub use placeholder::{
    extract_placeholders, placeholder_token, preserve_placeholders, render_template,
    unresolved_placeholders,
};
