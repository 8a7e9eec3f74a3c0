// src/config/mod.rs

//! Configuration loading and validation for ffshell.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or the built-in presets (`loader.rs`).
//! - Validate runner settings and preset templates (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{builtin, load_and_validate, load_from_path, load_or_builtin};
pub use model::{
    ConfigFile, ConfigSection, ParamConfig, ParamKind, ParamOption, ParamValue, PresetConfig,
    RawConfigFile,
};
