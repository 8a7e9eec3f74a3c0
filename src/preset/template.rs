// src/preset/template.rs

//! `{placeholder}` handling for argv templates.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is a valid regex")
});

/// Names of all placeholders in one template element, in order of
/// appearance.
pub fn placeholders(element: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(element)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}

/// Substitute every `{name}` in every element with `values[name]`.
///
/// Placeholders without a value are left as they are. Each element stays
/// one argv entry regardless of what the value contains; nothing is split
/// or shell-expanded.
pub fn render(template: &[String], values: &BTreeMap<String, String>) -> Vec<String> {
    template
        .iter()
        .map(|element| {
            PLACEHOLDER
                .replace_all(element, |caps: &Captures<'_>| match values.get(&caps[1]) {
                    Some(value) => value.clone(),
                    None => caps[0].to_string(),
                })
                .into_owned()
        })
        .collect()
}
