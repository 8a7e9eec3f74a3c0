// src/exec/mod.rs

//! Process execution layer.
//!
//! This module starts the external tool with `tokio::process::Command`,
//! drains its two output pipes concurrently and reports what happened
//! through an [`EventSink`].
//!
//! - [`command`] holds the validated argv value object.
//! - [`runner`] owns the single-slot [`ProcessRunner`]: spawn, wait, kill.
//! - [`drain`] contains the per-pipe read loop and the UTF-8 decoder.
//! - [`sink`] provides the `EventSink` trait and the channel-backed
//!   [`ChannelSink`] used by the CLI, which tests can replace with a
//!   recording implementation.

pub mod command;
pub mod drain;
pub mod runner;
pub mod sink;

pub use command::CommandLine;
pub use runner::{DEFAULT_BUFFER_SIZE, ProcessRunner, RunnerOptions};
pub use sink::{ChannelSink, EventSink};
