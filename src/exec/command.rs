// src/exec/command.rs

use std::fmt;
use std::process::Stdio;

use tokio::process::Command;

use crate::errors::{FfshellError, Result};

/// An argv to execute: program first, then its arguments.
///
/// Arguments are handed to the OS verbatim; no shell is involved, so there
/// is no globbing, quoting or variable expansion. A bare program name is
/// looked up on `PATH` by the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    argv: Vec<String>,
}

impl CommandLine {
    pub fn new(argv: Vec<String>) -> Result<Self> {
        match argv.first() {
            Some(program) if !program.is_empty() => Ok(Self { argv }),
            _ => Err(FfshellError::EmptyCommand),
        }
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Build the tokio command with both output pipes captured separately.
    ///
    /// On unix the child leads a fresh process group, so a stop can reach
    /// anything it forks that still holds the pipes.
    pub(crate) fn to_command(&self) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        cmd.process_group(0);
        cmd
    }
}

impl TryFrom<Vec<String>> for CommandLine {
    type Error = FfshellError;

    fn try_from(argv: Vec<String>) -> std::result::Result<Self, Self::Error> {
        CommandLine::new(argv)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.argv.join(" "))
    }
}
