// src/logging.rs

//! Logging for `ffshell` (`tracing` + `tracing-subscriber`).
//!
//! The filter is chosen in this order:
//! 1. `--log-level` on the command line, applied to every target;
//! 2. `FFSHELL_LOG`, read as an `EnvFilter` directive string, so
//!    `FFSHELL_LOG=ffshell::exec=debug` works as well as a bare level;
//! 3. `warn`.
//!
//! Everything goes to STDERR. The child's stdout is forwarded to ours
//! untouched and must stay pipeable.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "FFSHELL_LOG";

/// Install the global subscriber. Call once, before any run starts.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = select_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

fn select_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level.as_directive());
    }
    env.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
