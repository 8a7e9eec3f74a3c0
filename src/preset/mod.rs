// src/preset/mod.rs

//! Turning a named preset plus `key=value` overrides into a [`CommandLine`].
//!
//! - [`template`] finds and substitutes `{placeholder}` markers.
//! - [`value`] checks override values against the parameter declaration.

pub mod template;
pub mod value;

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::model::{ConfigFile, PresetConfig};
use crate::errors::{FfshellError, Result};
use crate::exec::CommandLine;

/// Parse a `key=value` assignment as given to `--set`.
///
/// Only the first `=` separates; the value may itself contain `=`
/// (e.g. `filter=scale=1280:-1`).
pub fn parse_assignment(s: &str) -> Result<(String, String)> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(FfshellError::PresetError(format!(
            "invalid parameter assignment '{s}' (expected KEY=VALUE)"
        ))),
    }
}

/// Compute the final value of every parameter of `preset`.
///
/// Overrides win over defaults; later overrides of the same key win over
/// earlier ones. Unknown keys and invalid values are rejected.
pub fn resolve_values(
    id: &str,
    preset: &PresetConfig,
    overrides: &[(String, String)],
) -> Result<BTreeMap<String, String>> {
    let mut values: BTreeMap<String, String> = preset
        .params
        .iter()
        .map(|(name, param)| (name.clone(), param.default.to_string()))
        .collect();

    for (key, value) in overrides {
        let Some(param) = preset.params.get(key) else {
            return Err(FfshellError::PresetError(format!(
                "preset '{id}' has no parameter '{key}'"
            )));
        };
        param.check_value(value).map_err(|msg| {
            FfshellError::PresetError(format!("preset '{id}', parameter '{key}': {msg}"))
        })?;
        values.insert(key.clone(), value.clone());
    }

    Ok(values)
}

/// Render preset `id` from `cfg` into a ready-to-run command line.
pub fn build_command(
    cfg: &ConfigFile,
    id: &str,
    overrides: &[(String, String)],
) -> Result<CommandLine> {
    let preset = cfg
        .preset
        .get(id)
        .ok_or_else(|| FfshellError::PresetNotFound(id.to_string()))?;

    let values = resolve_values(id, preset, overrides)?;
    let argv = template::render(&preset.template, &values);
    debug!(preset = %id, ?argv, "rendered preset");

    CommandLine::new(argv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_splits_on_first_equals() {
        assert_eq!(
            parse_assignment("filter=scale=1280:-1").unwrap(),
            ("filter".to_string(), "scale=1280:-1".to_string())
        );
        assert_eq!(
            parse_assignment("output=").unwrap(),
            ("output".to_string(), String::new())
        );
    }

    #[test]
    fn assignment_needs_a_key() {
        assert!(matches!(
            parse_assignment("=x"),
            Err(FfshellError::PresetError(_))
        ));
        assert!(matches!(
            parse_assignment("novalue"),
            Err(FfshellError::PresetError(_))
        ));
    }
}
