// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// The presets shipped with the binary.
const BUILTIN_CONFIG: &str = include_str!("../../presets/ffmpeg.toml");

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    parse_str(&contents)
}

/// Deserialize configuration from TOML text.
pub fn parse_str(contents: &str) -> Result<RawConfigFile> {
    let config: RawConfigFile = toml::from_str(contents)?;
    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks runner settings and that every preset renders to a sane argv.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// The built-in ffmpeg presets, validated.
pub fn builtin() -> Result<ConfigFile> {
    ConfigFile::try_from(parse_str(BUILTIN_CONFIG)?)
}

/// Load `path` if given, otherwise fall back to the built-in presets.
pub fn load_or_builtin(path: Option<&Path>) -> Result<ConfigFile> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            load_and_validate(path)
        }
        None => {
            debug!("no config file given; using built-in presets");
            builtin()
        }
    }
}
