//! `{{placeholder}}` extraction, substitution and preservation.
//!
//! An identifier is any run of one or more characters other than `}`
//! between `{{` and `}}`. Whitespace inside the braces belongs to the
//! identifier, so `{{ name }}` and `{{name}}` are different placeholders.
//! Unbalanced braces never match and are passed through untouched.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::{Captures, Regex, RegexBuilder};
use tracing::{debug, warn};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern is valid"));

/// Canonical token for `name`
pub fn placeholder_token(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

/// Distinct placeholder identifiers in first-occurrence order.
///
/// # Examples
///
/// ```
/// use promptdeck_compose::extract_placeholders;
///
/// let names = extract_placeholders("Hi {{name}}, your {{name}} order of {{item}} is ready");
/// assert_eq!(names, vec!["name", "item"]);
/// ```
pub fn extract_placeholders(content: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PLACEHOLDER_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Replace every `{{identifier}}` that has a non-blank value in `fields`.
///
/// The content is scanned once, so substituted values are never scanned
/// again and the order of `fields` is irrelevant. Identifiers without a
/// value, or with an empty value, keep their literal token.
pub fn render_template(content: &str, fields: &HashMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(content, |caps: &Captures<'_>| {
            match fields.get(&caps[1]) {
                Some(value) if !value.is_empty() => value.clone(),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Placeholders that [`render_template`] would leave unresolved.
pub fn unresolved_placeholders(content: &str, fields: &HashMap<String, String>) -> Vec<String> {
    extract_placeholders(content)
        .into_iter()
        .filter(|name| fields.get(name).map_or(true, |v| v.is_empty()))
        .collect()
}

fn variant_pattern(name: &str) -> Result<Regex, regex::Error> {
    let escaped = regex::escape(name);
    RegexBuilder::new(&format!(
        r"\{{\{{\s*{escaped}\s*\}}\}}|\[{escaped}\]|<{escaped}>"
    ))
    .case_insensitive(true)
    .build()
}

/// Delimited text of a variant match: `{{ x }}`, `[x]` or `<x>`
fn variant_inner(matched: &str) -> &str {
    matched
        .strip_prefix("{{")
        .and_then(|m| m.strip_suffix("}}"))
        .unwrap_or_else(|| &matched[1..matched.len() - 1])
}

/// Restore canonical placeholder syntax in model output.
///
/// For each placeholder of `original`, the variants `{{ name }}` (any inner
/// whitespace), `[name]` and `<name>` are rewritten to `{{name}}` in
/// `enhanced`, matching the identifier case-insensitively. A `{{token}}`
/// that is already an exact placeholder of `original` is left alone, and a
/// variant whose trimmed text names another placeholder exactly is restored
/// to that one. Placeholders the model dropped are not reinserted.
pub fn preserve_placeholders(enhanced: &str, original: &str) -> String {
    let names = extract_placeholders(original);
    let known: HashSet<&str> = names.iter().map(String::as_str).collect();
    let mut result = enhanced.to_string();

    for name in &names {
        let pattern = match variant_pattern(name) {
            Ok(re) => re,
            Err(e) => {
                warn!("Skipping placeholder '{}' during preservation: {}", name, e);
                continue;
            }
        };

        let replaced = pattern
            .replace_all(&result, |caps: &Captures<'_>| {
                let matched = &caps[0];
                let inner = variant_inner(matched);
                if matched.starts_with("{{") && known.contains(inner) {
                    matched.to_string()
                } else if known.contains(inner.trim()) {
                    placeholder_token(inner.trim())
                } else {
                    placeholder_token(name)
                }
            })
            .into_owned();
        if replaced != result {
            debug!("Restored placeholder syntax for '{}'", name);
            result = replaced;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extract_first_occurrence_order() {
        let names = extract_placeholders("Hi {{name}}, your {{name}} order of {{item}} is ready");
        assert_eq!(names, vec!["name", "item"]);
    }

    #[test]
    fn test_extract_keeps_inner_whitespace() {
        let names = extract_placeholders("{{ name }} and {{name}}");
        assert_eq!(names, vec![" name ", "name"]);
    }

    #[test]
    fn test_extract_ignores_malformed_tokens() {
        assert!(extract_placeholders("").is_empty());
        assert!(extract_placeholders("no placeholders here").is_empty());
        assert!(extract_placeholders("{{open and {single} and {{}}").is_empty());
        assert_eq!(extract_placeholders("{{a}"), Vec::<String>::new());
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        let out = render_template(
            "Hi {{name}}, your {{name}} order of {{item}} is ready",
            &fields(&[("name", "Ada"), ("item", "tea")]),
        );
        assert_eq!(out, "Hi Ada, your Ada order of tea is ready");
        assert!(!out.contains("{{"));
    }

    #[test]
    fn test_render_leaves_unmapped_and_blank_tokens() {
        let out = render_template(
            "{{a}} {{b}} {{c}}",
            &fields(&[("a", "1"), ("b", "")]),
        );
        assert_eq!(out, "1 {{b}} {{c}}");
    }

    #[test]
    fn test_render_without_placeholders_is_identity() {
        let content = "plain text with { braces } and }} stray";
        assert_eq!(render_template(content, &fields(&[("x", "y")])), content);
    }

    #[test]
    fn test_render_does_not_rescan_values() {
        let out = render_template(
            "{{a}} {{b}}",
            &fields(&[("a", "{{b}}"), ("b", "B")]),
        );
        assert_eq!(out, "{{b}} B");
    }

    #[test]
    fn test_render_treats_regex_metacharacters_literally() {
        let out = render_template(
            "cost: {{price ($)}} / {{a.*}}",
            &fields(&[("price ($)", "$5"), ("a.*", "x")]),
        );
        assert_eq!(out, "cost: $5 / x");
    }

    #[test]
    fn test_unresolved_placeholders() {
        let missing = unresolved_placeholders(
            "{{a}} {{b}} {{c}} {{a}}",
            &fields(&[("a", "1"), ("b", "")]),
        );
        assert_eq!(missing, vec!["b", "c"]);
    }

    #[test]
    fn test_preserve_restores_variants() {
        let original = "Write about {{topic}} for {{audience}}";
        let enhanced = "Write a post about [topic] aimed at <Audience>, covering {{ TOPIC }}.";
        assert_eq!(
            preserve_placeholders(enhanced, original),
            "Write a post about {{topic}} aimed at {{audience}}, covering {{topic}}."
        );
    }

    #[test]
    fn test_preserve_does_not_invent_placeholders() {
        let original = "Summarize {{text}} in {{language}}";
        let enhanced = "Summarize {{text}} concisely.";
        assert_eq!(preserve_placeholders(enhanced, original), enhanced);
    }

    #[test]
    fn test_preserve_handles_special_characters_and_dollars() {
        let original = "Use {{a+b}} and {{$x}}";
        let enhanced = "Use [a+b] and <$X>";
        assert_eq!(preserve_placeholders(enhanced, original), "Use {{a+b}} and {{$x}}");
    }

    #[test]
    fn test_preserve_keeps_case_distinct_placeholders() {
        let original = "{{Name}} vs {{name}}";
        let enhanced = "Compare {{Name}} with {{name}}.";
        assert_eq!(preserve_placeholders(enhanced, original), enhanced);

        assert_eq!(
            preserve_placeholders("Compare [Name] with <name>.", original),
            "Compare {{Name}} with {{name}}."
        );
    }

    #[test]
    fn test_preserve_keeps_whitespace_distinct_placeholders() {
        let original = "{{topic}} and {{ topic }}";
        let enhanced = "About {{topic}} and {{ topic }}.";
        assert_eq!(preserve_placeholders(enhanced, original), enhanced);

        assert_eq!(
            preserve_placeholders("About {{  topic  }}.", original),
            "About {{topic}}."
        );
    }

    #[test]
    fn test_preserve_leaves_unrelated_brackets() {
        let original = "{{name}}";
        let enhanced = "[note] <b>{{ name }}</b>";
        assert_eq!(preserve_placeholders(enhanced, original), "[note] <b>{{name}}</b>");
    }
}
