// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Only contract violations and configuration problems surface as errors.
//! Failures of the child process itself are reported through
//! [`TerminationReport`](crate::types::TerminationReport) instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FfshellError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Preset error: {0}")]
    PresetError(String),

    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    #[error("Command line must contain at least a program name")]
    EmptyCommand,

    #[error("A command is already running; stop it before starting another")]
    Busy,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FfshellError>;
