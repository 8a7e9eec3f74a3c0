// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::errors::FfshellError;
use crate::preset::parse_assignment;

/// Command-line arguments for `ffshell`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ffshell",
    version,
    about = "Run ffmpeg (or any command) and stream its output live; Ctrl-C stops it.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a config file (TOML) with runner settings and presets.
    ///
    /// Default: the built-in ffmpeg presets.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FFSHELL_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Run a command verbatim (no shell): `ffshell exec -- ffmpeg -i in.mp4 out.webm`.
    Exec {
        /// Program followed by its arguments.
        #[arg(
            required = true,
            num_args = 1..,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_name = "PROGRAM"
        )]
        argv: Vec<String>,
    },

    /// Render a preset and run it.
    Preset {
        /// Preset id, as listed by `ffshell presets`.
        id: String,

        /// Override a parameter; may be repeated.
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_set)]
        set: Vec<(String, String)>,

        /// Print the rendered command line without running it.
        #[arg(long)]
        dry_run: bool,
    },

    /// List available presets and their parameters.
    Presets,
}

fn parse_set(s: &str) -> Result<(String, String), FfshellError> {
    parse_assignment(s)
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_keeps_hyphenated_arguments_verbatim() {
        let args = CliArgs::try_parse_from([
            "ffshell", "exec", "--", "ffmpeg", "-i", "in.mp4", "-c:a", "copy", "out.mkv",
        ])
        .unwrap();
        match args.command {
            CliCommand::Exec { argv } => {
                assert_eq!(argv, ["ffmpeg", "-i", "in.mp4", "-c:a", "copy", "out.mkv"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn preset_collects_overrides() {
        let args = CliArgs::try_parse_from([
            "ffshell", "--log-level", "debug", "preset", "crop", "--set", "width=640", "--set",
            "output=small.mp4", "--dry-run",
        ])
        .unwrap();
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        match args.command {
            CliCommand::Preset { id, set, dry_run } => {
                assert_eq!(id, "crop");
                assert!(dry_run);
                assert_eq!(
                    set,
                    vec![
                        ("width".to_string(), "640".to_string()),
                        ("output".to_string(), "small.mp4".to_string()),
                    ]
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn malformed_set_is_a_usage_error() {
        assert!(CliArgs::try_parse_from(["ffshell", "preset", "crop", "--set", "width"]).is_err());
    }

    #[test]
    fn exec_requires_a_program() {
        assert!(CliArgs::try_parse_from(["ffshell", "exec"]).is_err());
    }
}
