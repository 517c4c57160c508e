//! Dynamic field values supplied for a template's placeholders.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::placeholder::{extract_placeholders, render_template};

/// Value entered for one placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicField {
    pub name: String,
    pub value: String,
}

impl DynamicField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Field values of one editing session, keyed by placeholder name.
///
/// Fields are derived from template content: [`DynamicFields::for_content`]
/// starts a fresh set when another template is selected, and
/// [`DynamicFields::retain_for_content`] follows edits of the same content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DynamicField>", into = "Vec<DynamicField>")]
pub struct DynamicFields {
    fields: Vec<DynamicField>,
}

impl DynamicFields {
    /// One empty field per placeholder of `content`, in order
    pub fn for_content(content: &str) -> Self {
        Self {
            fields: extract_placeholders(content)
                .into_iter()
                .map(|name| DynamicField::new(name, ""))
                .collect(),
        }
    }

    /// Set a value, creating the field if it is not tracked yet.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(DynamicField::new(name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Re-align with edited `content`: placeholders that disappeared are
    /// dropped, new ones are added empty, surviving values are kept.
    pub fn retain_for_content(&mut self, content: &str) {
        let names = extract_placeholders(content);
        let mut previous: HashMap<String, String> = self
            .fields
            .drain(..)
            .map(|f| (f.name, f.value))
            .collect();

        self.fields = names
            .into_iter()
            .map(|name| {
                let value = previous.remove(&name).unwrap_or_default();
                DynamicField { name, value }
            })
            .collect();
    }

    pub fn values(&self) -> HashMap<String, String> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect()
    }

    /// Render `content` with the current values
    pub fn render(&self, content: &str) -> String {
        render_template(content, &self.values())
    }

    pub fn iter(&self) -> impl Iterator<Item = &DynamicField> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Vec<DynamicField>> for DynamicFields {
    fn from(fields: Vec<DynamicField>) -> Self {
        fields.into_iter().collect()
    }
}

impl From<DynamicFields> for Vec<DynamicField> {
    fn from(fields: DynamicFields) -> Self {
        fields.fields
    }
}

impl FromIterator<DynamicField> for DynamicFields {
    fn from_iter<I: IntoIterator<Item = DynamicField>>(iter: I) -> Self {
        let mut fields = Self::default();
        for field in iter {
            fields.set(&field.name, field.value);
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_content_creates_empty_fields_in_order() {
        let fields = DynamicFields::for_content("{{b}} {{a}} {{b}}");
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert!(fields.iter().all(|f| f.value.is_empty()));
    }

    #[test]
    fn test_set_creates_on_demand() {
        let mut fields = DynamicFields::default();
        fields.set("topic", "rust");
        fields.set("topic", "ownership");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("topic"), Some("ownership"));
    }

    #[test]
    fn test_retain_for_content_drops_stale_fields() {
        let mut fields = DynamicFields::for_content("{{a}} {{b}}");
        fields.set("a", "1");
        fields.set("b", "2");

        fields.retain_for_content("{{b}} {{c}}");

        assert_eq!(fields.get("a"), None);
        assert_eq!(fields.get("b"), Some("2"));
        assert_eq!(fields.get("c"), Some(""));
    }

    #[test]
    fn test_render_uses_current_values() {
        let content = "Explain {{topic}} to a {{level}}";
        let mut fields = DynamicFields::for_content(content);
        fields.set("topic", "lifetimes");
        assert_eq!(fields.render(content), "Explain lifetimes to a {{level}}");
    }

    #[test]
    fn test_deserializes_from_field_list() {
        let fields: DynamicFields =
            serde_json::from_str(r#"[{"name":"a","value":"1"},{"name":"a","value":"2"}]"#).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get("a"), Some("2"));

        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"[{"name":"a","value":"2"}]"#);
    }
}
