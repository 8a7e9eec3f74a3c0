// src/console.rs

//! Terminal front end for run events.
//!
//! Plays the part of the UI: child stdout goes to our stdout, child stderr
//! and lifecycle notes go to our stderr, so `ffshell exec -- tool > out`
//! still captures exactly what the tool printed.

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt, Stderr, Stdout};
use tokio::sync::mpsc;
use tracing::debug;

use crate::types::{Channel, RunEvent, TerminationReport};

/// Writes [`RunEvent`]s to a pair of output streams.
pub struct ConsolePrinter<O, E> {
    out: O,
    err: E,
}

impl ConsolePrinter<Stdout, Stderr> {
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdout(), tokio::io::stderr())
    }
}

impl<O, E> ConsolePrinter<O, E>
where
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    pub fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// Print events until the run finishes or the sender side goes away.
    ///
    /// Returns the final report if one was received.
    pub async fn run(
        &mut self,
        mut rx: mpsc::UnboundedReceiver<RunEvent>,
    ) -> io::Result<Option<TerminationReport>> {
        while let Some(event) = rx.recv().await {
            match event {
                RunEvent::Output(chunk) => match chunk.channel {
                    Channel::Stdout => write_flushed(&mut self.out, &chunk.text).await?,
                    Channel::Stderr => write_flushed(&mut self.err, &chunk.text).await?,
                },
                RunEvent::StopRequested => {
                    self.note("stopping command...").await?;
                }
                RunEvent::Finished(report) => {
                    if !report.is_success() {
                        self.note(&format!("command {report}")).await?;
                    }
                    self.out.flush().await?;
                    return Ok(Some(report));
                }
            }
        }

        debug!("event channel closed before the run finished");
        Ok(None)
    }

    async fn note(&mut self, msg: &str) -> io::Result<()> {
        self.err.write_all(format!("\n[ffshell] {msg}\n").as_bytes()).await?;
        self.err.flush().await
    }
}

// Flush per chunk: progress lines end in '\r', not '\n'.
async fn write_flushed<W: AsyncWrite + Unpin>(w: &mut W, text: &str) -> io::Result<()> {
    w.write_all(text.as_bytes()).await?;
    w.flush().await
}
