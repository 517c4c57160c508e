//! Instruction tables used by the enhancement composer.
//!
//! A [`CategoryTable`] always holds exactly one instruction per variant of
//! its category, so lookups cannot miss. User-customized tables come in as
//! [`InstructionOverrides`]; a customized category replaces the built-in one
//! as a whole and is rejected up front if it leaves any variant uncovered.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::{Category, Methodology, ModelType, ProviderType, Role, TemplateDomain};
use crate::error::ComposeError;

/// One instruction text per variant of `C`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable<C: Category> {
    entries: Vec<String>,
    _category: PhantomData<C>,
}

impl<C: Category> CategoryTable<C> {
    /// Table filled with the built-in instructions
    pub fn builtin() -> Self {
        Self {
            entries: C::ALL
                .iter()
                .map(|v| v.builtin_instruction().to_string())
                .collect(),
            _category: PhantomData,
        }
    }

    /// Build a table from a user-supplied mapping.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::IncompleteTable` listing every variant the
    /// mapping does not cover.
    pub fn from_map(map: &BTreeMap<C, String>) -> Result<Self, ComposeError> {
        let missing: Vec<String> = C::ALL
            .iter()
            .filter(|v| !map.contains_key(v))
            .map(|v| v.as_str().to_string())
            .collect();

        if !missing.is_empty() {
            return Err(ComposeError::IncompleteTable {
                category: C::NAME,
                missing,
            });
        }

        Ok(Self {
            entries: C::ALL
                .iter()
                .filter_map(|v| map.get(v).cloned())
                .collect(),
            _category: PhantomData,
        })
    }

    /// Instruction text for `key`
    pub fn get(&self, key: C) -> &str {
        &self.entries[key.index()]
    }

    pub fn to_map(&self) -> BTreeMap<C, String> {
        C::ALL
            .iter()
            .map(|v| (*v, self.get(*v).to_string()))
            .collect()
    }
}

/// User-customized instruction categories; `None` keeps the built-in table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<BTreeMap<TemplateDomain, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<BTreeMap<ProviderType, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<BTreeMap<ModelType, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<BTreeMap<Role, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub methodologies: Option<BTreeMap<Methodology, String>>,
}

impl InstructionOverrides {
    pub fn is_empty(&self) -> bool {
        self.domains.is_none()
            && self.providers.is_none()
            && self.models.is_none()
            && self.roles.is_none()
            && self.methodologies.is_none()
    }
}

/// The five instruction tables the composer reads from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionTables {
    pub domains: CategoryTable<TemplateDomain>,
    pub providers: CategoryTable<ProviderType>,
    pub models: CategoryTable<ModelType>,
    pub roles: CategoryTable<Role>,
    pub methodologies: CategoryTable<Methodology>,
}

impl Default for InstructionTables {
    fn default() -> Self {
        Self::builtin()
    }
}

fn resolve<C: Category>(custom: Option<&BTreeMap<C, String>>) -> Result<CategoryTable<C>, ComposeError> {
    match custom {
        Some(map) => {
            debug!("Using customized {} instructions", C::NAME);
            CategoryTable::from_map(map)
        }
        None => Ok(CategoryTable::builtin()),
    }
}

impl InstructionTables {
    pub fn builtin() -> Self {
        Self {
            domains: CategoryTable::builtin(),
            providers: CategoryTable::builtin(),
            models: CategoryTable::builtin(),
            roles: CategoryTable::builtin(),
            methodologies: CategoryTable::builtin(),
        }
    }

    /// Built-in tables shadowed per category by `overrides`.
    ///
    /// # Errors
    ///
    /// Returns `ComposeError::IncompleteTable` for the first customized
    /// category that misses a variant.
    pub fn with_overrides(overrides: &InstructionOverrides) -> Result<Self, ComposeError> {
        Ok(Self {
            domains: resolve(overrides.domains.as_ref())?,
            providers: resolve(overrides.providers.as_ref())?,
            models: resolve(overrides.models.as_ref())?,
            roles: resolve(overrides.roles.as_ref())?,
            methodologies: resolve(overrides.methodologies.as_ref())?,
        })
    }

    /// Every category of the effective tables, spelled out in full
    pub fn to_overrides(&self) -> InstructionOverrides {
        InstructionOverrides {
            domains: Some(self.domains.to_map()),
            providers: Some(self.providers.to_map()),
            models: Some(self.models.to_map()),
            roles: Some(self.roles.to_map()),
            methodologies: Some(self.methodologies.to_map()),
        }
    }
}
