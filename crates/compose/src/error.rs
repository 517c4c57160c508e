//! Error types for the composition core.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// A category value that has no variant (e.g. an unknown domain string)
    #[error("Unknown {category} value: {value}")]
    UnknownVariant { category: &'static str, value: String },

    /// A custom instruction table that does not cover every variant
    #[error("Instruction table for {category} is missing entries: {}", missing.join(", "))]
    IncompleteTable {
        category: &'static str,
        missing: Vec<String>,
    },
}

impl ComposeError {
    pub fn unknown_variant(category: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            category,
            value: value.into(),
        }
    }
}
