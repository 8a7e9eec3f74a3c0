// src/config/model.rs

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::exec::{DEFAULT_BUFFER_SIZE, RunnerOptions};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// buffer_size = 1024
///
/// [preset.cut]
/// name = "Cut a clip"
/// template = ["ffmpeg", "-i", "{input}", "-ss", "{start}", "-t", "{duration}", "-c", "copy", "{output}"]
///
/// [preset.cut.params.input]
/// kind = "file"
/// default = "input.mp4"
/// ```
///
/// All sections are optional. This is the unchecked form straight from
/// `serde`; see [`ConfigFile`] for the validated one.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    /// Runner settings from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All presets from `[preset.<id>]`, keyed by id.
    #[serde(default)]
    pub preset: BTreeMap<String, PresetConfig>,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so holders can rely on
/// every preset rendering to a usable command line.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub preset: BTreeMap<String, PresetConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        preset: BTreeMap<String, PresetConfig>,
    ) -> Self {
        Self { config, preset }
    }

    pub fn runner_options(&self) -> RunnerOptions {
        RunnerOptions {
            buffer_size: self.config.buffer_size,
        }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Bytes per pipe read. Must be >= 1.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
        }
    }
}

/// `[preset.<id>]` section: an argv template plus the parameters that fill it.
#[derive(Debug, Clone, Deserialize)]
pub struct PresetConfig {
    /// Human readable name shown by `ffshell presets`.
    #[serde(default)]
    pub name: Option<String>,

    /// The argv, with `{param}` placeholders. The first element is the
    /// program and may not contain placeholders.
    pub template: Vec<String>,

    /// Parameters keyed by placeholder name.
    #[serde(default)]
    pub params: BTreeMap<String, ParamConfig>,
}

impl PresetConfig {
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(id)
    }
}

/// `[preset.<id>.params.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ParamConfig {
    pub kind: ParamKind,

    #[serde(default)]
    pub label: Option<String>,

    /// Value used when the caller does not override the parameter.
    #[serde(default)]
    pub default: ParamValue,

    /// Allowed values for `select` / `multiselect`.
    #[serde(default)]
    pub options: Vec<ParamOption>,

    /// Inclusive bounds for `number` / `slider`.
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,

    #[serde(default)]
    pub description: Option<String>,
}

/// What sort of value a parameter takes.
///
/// `file`, `directory`, `string` and `color` accept any text; the others
/// are checked by [`ParamConfig::check_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Number,
    String,
    Boolean,
    Select,
    Multiselect,
    File,
    Time,
    Slider,
    Color,
    Directory,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParamKind::Number => "number",
            ParamKind::String => "string",
            ParamKind::Boolean => "boolean",
            ParamKind::Select => "select",
            ParamKind::Multiselect => "multiselect",
            ParamKind::File => "file",
            ParamKind::Time => "time",
            ParamKind::Slider => "slider",
            ParamKind::Color => "color",
            ParamKind::Directory => "directory",
        };
        f.write_str(s)
    }
}

/// One entry of a `select` / `multiselect` parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct ParamOption {
    #[serde(default)]
    pub label: Option<String>,
    pub value: ParamValue,
}

/// A TOML scalar, rendered into the argv as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Default for ParamValue {
    fn default() -> Self {
        ParamValue::Text(String::new())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Integer(i) => write!(f, "{i}"),
            ParamValue::Float(x) => write!(f, "{x}"),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}
