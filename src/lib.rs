// src/lib.rs

pub mod cli;
pub mod config;
pub mod console;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod preset;
pub mod types;

use std::fmt::Write as _;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::cli::{CliArgs, CliCommand};
use crate::config::{ConfigFile, load_or_builtin};
use crate::console::ConsolePrinter;
use crate::exec::{ChannelSink, CommandLine, ProcessRunner, RunnerOptions};
use crate::types::TerminationReport;

/// High-level entry point used by `main.rs`.
///
/// Returns the exit code the process should terminate with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_or_builtin(args.config.as_deref())?;

    match args.command {
        CliCommand::Presets => {
            print_presets(&cfg);
            Ok(0)
        }
        CliCommand::Preset { id, set, dry_run } => {
            let command = preset::build_command(&cfg, &id, &set)?;
            if dry_run {
                print_dry_run(&id, &command);
                return Ok(0);
            }
            let report = run_command(command, cfg.runner_options()).await?;
            Ok(report.exit_code())
        }
        CliCommand::Exec { argv } => {
            let command = CommandLine::new(argv)?;
            let report = run_command(command, cfg.runner_options()).await?;
            Ok(report.exit_code())
        }
    }
}

/// Run one command with live output on the terminal.
///
/// This wires together:
/// - a `ProcessRunner` feeding a `ChannelSink`
/// - a console printer draining the sink's receiver
/// - Ctrl-C → `ProcessRunner::stop`
pub async fn run_command(command: CommandLine, options: RunnerOptions) -> Result<TerminationReport> {
    let (sink, rx) = ChannelSink::new();
    let runner = Arc::new(ProcessRunner::new(sink, options));

    let printer = tokio::spawn(async move {
        let mut printer = ConsolePrinter::stdio();
        printer.run(rx).await
    });

    // Ctrl-C → kill the child; `execute` then reports KilledByUser.
    let ctrl_c = {
        let runner = Arc::clone(&runner);
        tokio::spawn(async move {
            loop {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!(error = %e, "failed to listen for Ctrl+C");
                    return;
                }
                runner.stop();
            }
        })
    };

    let result = runner.execute(command).await;

    ctrl_c.abort();
    let _ = ctrl_c.await;
    drop(runner);

    let report = result?;
    match printer.await {
        Ok(Ok(_)) => {}
        Ok(Err(e)) => debug!(error = %e, "console output failed"),
        Err(e) => warn!(error = %e, "console printer task failed"),
    }

    Ok(report)
}

/// Print the rendered argv, one element per line.
fn print_dry_run(id: &str, command: &CommandLine) {
    println!("ffshell dry-run");
    println!("  preset: {id}");
    println!("  argv:");
    for arg in command.argv() {
        println!("    {arg:?}");
    }
}

/// List presets with their parameters and defaults.
fn print_presets(cfg: &ConfigFile) {
    print!("{}", describe_presets(cfg));
}

/// The `presets` listing: every preset with its template and parameters,
/// including labels, descriptions, ranges and selectable options.
pub fn describe_presets(cfg: &ConfigFile) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_presets(&mut out, cfg);
    out
}

fn write_presets(out: &mut String, cfg: &ConfigFile) -> std::fmt::Result {
    writeln!(out, "presets ({}):", cfg.preset.len())?;
    for (id, preset) in cfg.preset.iter() {
        writeln!(out, "  - {id}: {}", preset.display_name(id))?;
        writeln!(out, "      template: {}", preset.template.join(" "))?;
        for (name, param) in preset.params.iter() {
            let label = param.label.as_deref().unwrap_or(name.as_str());
            writeln!(
                out,
                "      {name} ({}, default {:?}): {label}",
                param.kind,
                param.default.to_string()
            )?;
            if let Some(description) = &param.description {
                writeln!(out, "          {description}")?;
            }
            match (param.min, param.max) {
                (Some(min), Some(max)) => writeln!(out, "          range: {min} to {max}")?,
                (Some(min), None) => writeln!(out, "          range: at least {min}")?,
                (None, Some(max)) => writeln!(out, "          range: at most {max}")?,
                (None, None) => {}
            }
            if !param.options.is_empty() {
                let options: Vec<String> = param
                    .options
                    .iter()
                    .map(|o| {
                        let value = o.value.to_string();
                        match o.label.as_deref() {
                            Some(label) if label != value => format!("{value} ({label})"),
                            _ => value,
                        }
                    })
                    .collect();
                writeln!(out, "          options: {}", options.join(", "))?;
            }
        }
    }
    Ok(())
}
