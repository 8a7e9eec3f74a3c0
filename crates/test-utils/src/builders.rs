#![allow(dead_code)]

use std::collections::BTreeMap;

use ffshell::config::{
    ConfigFile, ConfigSection, ParamConfig, ParamKind, ParamOption, ParamValue, PresetConfig,
    RawConfigFile,
};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                preset: BTreeMap::new(),
            },
        }
    }

    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.config.buffer_size = size;
        self
    }

    pub fn with_preset(mut self, id: &str, preset: PresetConfig) -> Self {
        self.config.preset.insert(id.to_string(), preset);
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `PresetConfig`.
pub struct PresetBuilder {
    preset: PresetConfig,
}

impl PresetBuilder {
    pub fn new(template: &[&str]) -> Self {
        Self {
            preset: PresetConfig {
                name: None,
                template: template.iter().map(|s| s.to_string()).collect(),
                params: BTreeMap::new(),
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.preset.name = Some(name.to_string());
        self
    }

    pub fn param(mut self, name: &str, param: ParamConfig) -> Self {
        self.preset.params.insert(name.to_string(), param);
        self
    }

    pub fn build(self) -> PresetConfig {
        self.preset
    }
}

/// Builder for `ParamConfig`.
pub struct ParamBuilder {
    param: ParamConfig,
}

impl ParamBuilder {
    pub fn new(kind: ParamKind) -> Self {
        Self {
            param: ParamConfig {
                kind,
                label: None,
                default: ParamValue::default(),
                options: vec![],
                min: None,
                max: None,
                description: None,
            },
        }
    }

    pub fn default_text(mut self, value: &str) -> Self {
        self.param.default = ParamValue::Text(value.to_string());
        self
    }

    pub fn default_int(mut self, value: i64) -> Self {
        self.param.default = ParamValue::Integer(value);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.param.min = Some(min);
        self.param.max = Some(max);
        self
    }

    pub fn option(mut self, value: &str) -> Self {
        self.param.options.push(ParamOption {
            label: None,
            value: ParamValue::Text(value.to_string()),
        });
        self
    }

    pub fn build(self) -> ParamConfig {
        self.param
    }
}
