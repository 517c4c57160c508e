use chrono::Utc;
use promptdeck_common::{PromptDeckError, Result};
use promptdeck_compose::TemplateDomain;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::{ReorderItem, Template, TemplateInput};

/// Template collection persisted as a JSON file
pub struct TemplateStore {
    templates: Vec<Template>,
    file_path: PathBuf,
}

impl TemplateStore {
    pub fn load(path: &Path) -> Result<Self> {
        let templates: Vec<Template> = if path.exists() {
            let data = fs::read_to_string(path)?;
            serde_json::from_str(&data).map_err(|e| {
                PromptDeckError::Serialization(format!(
                    "Failed to parse {}: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            Vec::new()
        };

        info!("Loaded {} templates from {}", templates.len(), path.display());

        Ok(Self {
            templates,
            file_path: path.to_path_buf(),
        })
    }

    /// All templates by list position
    pub fn list(&self) -> Vec<Template> {
        let mut templates = self.templates.clone();
        templates.sort_by_key(|t| (t.order, t.id));
        templates
    }

    /// Templates of one domain, optionally with core templates first
    pub fn list_filtered(&self, domain: Option<TemplateDomain>, core_first: bool) -> Vec<Template> {
        let mut templates: Vec<Template> = self
            .list()
            .into_iter()
            .filter(|t| domain.map_or(true, |d| t.attributes.domain == d))
            .collect();

        if core_first {
            // stable, so list order holds within each group
            templates.sort_by_key(|t| !t.is_core);
        }
        templates
    }

    pub fn get(&self, id: u64) -> Result<&Template> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(id))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Add a template at the end of the list
    pub fn create(&mut self, input: TemplateInput) -> Result<Template> {
        let input = input.normalized()?;
        let now = Utc::now();

        let template = Template {
            id: self.next_id(),
            name: input.name,
            content: input.content,
            is_core: input.is_core,
            attributes: input.attributes,
            order: self.next_order(),
            created_at: now,
            updated_at: now,
        };

        debug!("Creating template {} ({})", template.id, template.name);
        self.templates.push(template.clone());
        self.save()?;
        Ok(template)
    }

    /// Replace a template's fields, keeping its id, position and creation time
    pub fn update(&mut self, id: u64, input: TemplateInput) -> Result<Template> {
        let input = input.normalized()?;
        let template = self
            .templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(id))?;

        template.name = input.name;
        template.content = input.content;
        template.is_core = input.is_core;
        template.attributes = input.attributes;
        template.updated_at = Utc::now();

        let updated = template.clone();
        self.save()?;
        Ok(updated)
    }

    pub fn delete(&mut self, id: u64) -> Result<()> {
        let index = self
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| not_found(id))?;

        self.templates.remove(index);
        self.save()
    }

    /// Apply new positions. Nothing changes if any id is unknown.
    pub fn reorder(&mut self, items: &[ReorderItem]) -> Result<Vec<Template>> {
        if let Some(missing) = items.iter().find(|item| self.get(item.id).is_err()) {
            return Err(not_found(missing.id));
        }

        let now = Utc::now();
        for item in items {
            if let Some(template) = self.templates.iter_mut().find(|t| t.id == item.id) {
                template.order = item.order;
                template.updated_at = now;
            }
        }

        self.save()?;
        Ok(self.list())
    }

    /// Copy a template to the end of the list as a non-core template
    pub fn duplicate(&mut self, id: u64) -> Result<Template> {
        let source = self.get(id)?.clone();
        let now = Utc::now();

        let copy = Template {
            id: self.next_id(),
            name: format!("{} (Copy)", source.name),
            is_core: false,
            order: self.next_order(),
            created_at: now,
            updated_at: now,
            ..source
        };

        self.templates.push(copy.clone());
        self.save()?;
        Ok(copy)
    }

    fn next_id(&self) -> u64 {
        self.templates.iter().map(|t| t.id).max().map_or(1, |id| id + 1)
    }

    fn next_order(&self) -> i64 {
        self.templates
            .iter()
            .map(|t| t.order)
            .max()
            .map_or(0, |order| order + 1)
    }

    fn save(&self) -> Result<()> {
        let data = serde_json::to_string_pretty(&self.templates)?;
        fs::write(&self.file_path, data)?;
        Ok(())
    }
}

fn not_found(id: u64) -> PromptDeckError {
    PromptDeckError::not_found(format!("Template {} not found", id))
}
