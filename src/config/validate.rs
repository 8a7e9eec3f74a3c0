// src/config/validate.rs

use std::collections::BTreeSet;

use crate::config::model::{ConfigFile, ParamConfig, ParamKind, PresetConfig, RawConfigFile};
use crate::errors::{FfshellError, Result};
use crate::preset::template::placeholders;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = FfshellError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.preset))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_global_config(cfg)?;
    for (id, preset) in cfg.preset.iter() {
        validate_preset(id, preset)?;
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.buffer_size == 0 {
        return Err(FfshellError::ConfigError(
            "[config].buffer_size must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_preset(id: &str, preset: &PresetConfig) -> Result<()> {
    let Some(program) = preset.template.first() else {
        return Err(preset_error(id, "template must not be empty"));
    };

    if program.is_empty() || placeholders(program).next().is_some() {
        return Err(preset_error(
            id,
            format!("first template element must be a literal program name (got '{program}')"),
        ));
    }

    let used: BTreeSet<&str> = preset
        .template
        .iter()
        .flat_map(|element| placeholders(element))
        .collect();

    for name in used.iter() {
        if !preset.params.contains_key(*name) {
            return Err(preset_error(
                id,
                format!("template uses undeclared parameter '{{{name}}}'"),
            ));
        }
    }

    for (name, param) in preset.params.iter() {
        if !used.contains(name.as_str()) {
            return Err(preset_error(
                id,
                format!("parameter '{name}' is declared but never used in the template"),
            ));
        }
        validate_param(id, name, param)?;
    }

    Ok(())
}

fn validate_param(id: &str, name: &str, param: &ParamConfig) -> Result<()> {
    if matches!(param.kind, ParamKind::Select | ParamKind::Multiselect) && param.options.is_empty()
    {
        return Err(preset_error(
            id,
            format!("parameter '{name}' is a {} but has no options", param.kind),
        ));
    }

    if let (Some(min), Some(max)) = (param.min, param.max) {
        if min > max {
            return Err(preset_error(
                id,
                format!("parameter '{name}' has min {min} greater than max {max}"),
            ));
        }
    }

    param
        .check_value(&param.default.to_string())
        .map_err(|msg| preset_error(id, format!("default of parameter '{name}' is invalid: {msg}")))
}

fn preset_error(id: &str, msg: impl AsRef<str>) -> FfshellError {
    FfshellError::ConfigError(format!("preset '{}': {}", id, msg.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_str;

    fn validate(toml: &str) -> Result<ConfigFile> {
        ConfigFile::try_from(parse_str(toml)?)
    }

    fn config_error(toml: &str) -> String {
        match validate(toml) {
            Err(FfshellError::ConfigError(msg)) => msg,
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_is_valid() {
        let cfg = validate("").unwrap();
        assert_eq!(cfg.config.buffer_size, 1024);
        assert!(cfg.preset.is_empty());
    }

    #[test]
    fn zero_buffer_size_is_rejected() {
        let msg = config_error("[config]\nbuffer_size = 0\n");
        assert!(msg.contains("buffer_size"));
    }

    #[test]
    fn undeclared_placeholder_is_rejected() {
        let msg = config_error(
            r#"
[preset.a]
template = ["ffmpeg", "-i", "{input}"]
"#,
        );
        assert!(msg.contains("undeclared parameter '{input}'"), "{msg}");
    }

    #[test]
    fn unused_parameter_is_rejected() {
        let msg = config_error(
            r#"
[preset.a]
template = ["ffmpeg"]

[preset.a.params.input]
kind = "file"
"#,
        );
        assert!(msg.contains("never used"), "{msg}");
    }

    #[test]
    fn placeholder_program_is_rejected() {
        let msg = config_error(
            r#"
[preset.a]
template = ["{tool}"]

[preset.a.params.tool]
kind = "string"
default = "ffmpeg"
"#,
        );
        assert!(msg.contains("literal program name"), "{msg}");
    }

    #[test]
    fn out_of_range_default_is_rejected() {
        let msg = config_error(
            r#"
[preset.a]
template = ["ffmpeg", "-crf", "{crf}"]

[preset.a.params.crf]
kind = "slider"
default = 99
min = 0
max = 51
"#,
        );
        assert!(msg.contains("default of parameter 'crf'"), "{msg}");
    }

    #[test]
    fn select_without_options_is_rejected() {
        let msg = config_error(
            r#"
[preset.a]
template = ["ffmpeg", "-preset", "{speed}"]

[preset.a.params.speed]
kind = "select"
default = "fast"
"#,
        );
        assert!(msg.contains("no options"), "{msg}");
    }
}
