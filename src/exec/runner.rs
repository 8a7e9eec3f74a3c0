// src/exec/runner.rs

//! Single-slot process runner.

use std::fmt;
use std::process::ExitStatus;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::io::AsyncRead;
use tokio::process::Child;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::errors::{FfshellError, Result};
use crate::exec::command::CommandLine;
use crate::exec::drain::drain_stream;
use crate::exec::sink::EventSink;
use crate::types::{Channel, RunEvent, TerminationReport};

/// Read size used by the drain loops when nothing else is configured.
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// How long readers may keep delivering already-buffered output after a
/// stop before they are abandoned.
const STOP_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Tunables for [`ProcessRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerOptions {
    /// Maximum number of bytes per pipe read (and so per output chunk).
    pub buffer_size: usize,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Bookkeeping for the run currently owning the slot.
///
/// `cancel` is taken by the first `stop` call; the executing task owns the
/// receiving end and performs the kill itself.
struct ActiveRun {
    id: u64,
    cancel: Option<oneshot::Sender<()>>,
}

/// How the wait on the child ended.
enum RunExit {
    Exited(std::io::Result<ExitStatus>),
    Killed,
}

/// Runs one external command at a time, streaming its output to a sink.
///
/// `execute` and `stop` may be called from different tasks or threads; share
/// the runner behind an `Arc`. A second `execute` while one is in flight is
/// rejected with [`FfshellError::Busy`] so `stop` always targets the process
/// the caller expects.
pub struct ProcessRunner<S: EventSink> {
    sink: Arc<S>,
    options: RunnerOptions,
    active: Mutex<Option<ActiveRun>>,
    runs_started: AtomicU64,
}

impl<S: EventSink> fmt::Debug for ProcessRunner<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessRunner")
            .field("options", &self.options)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl<S: EventSink> ProcessRunner<S> {
    pub fn new(sink: S, options: RunnerOptions) -> Self {
        Self::with_shared_sink(Arc::new(sink), options)
    }

    /// Like [`ProcessRunner::new`], for callers that keep their own handle
    /// to the sink.
    pub fn with_shared_sink(sink: Arc<S>, options: RunnerOptions) -> Self {
        Self {
            sink,
            options,
            active: Mutex::new(None),
            runs_started: AtomicU64::new(0),
        }
    }

    pub fn options(&self) -> RunnerOptions {
        self.options
    }

    pub fn is_running(&self) -> bool {
        self.lock_active().is_some()
    }

    /// Run `command` to completion.
    ///
    /// Output is forwarded to the sink while the process runs. Once the
    /// process has exited (or been killed) and both pipes are fully drained,
    /// exactly one [`RunEvent::Finished`] is emitted and the same report is
    /// returned.
    ///
    /// Process-level failures (spawn errors, non-zero exit, signals) are
    /// reports, not errors. `Err` is returned only when another run is
    /// already active on this runner; in that case nothing is emitted.
    pub async fn execute(&self, command: CommandLine) -> Result<TerminationReport> {
        let (cancel_tx, cancel_rx) = oneshot::channel::<()>();
        let run_id = self.claim_slot(cancel_tx)?;
        let slot = SlotGuard {
            active: &self.active,
        };

        info!(run_id, cmd = %command, "starting process");

        let report = self.run_to_completion(run_id, &command, cancel_rx).await;

        info!(
            run_id,
            program = %command.program(),
            outcome = %report,
            "process run finished"
        );

        // Free the slot first so a consumer reacting to `Finished` can start
        // the next run straight away.
        drop(slot);
        self.sink.emit(RunEvent::Finished(report.clone()));

        Ok(report)
    }

    /// Forcefully terminate the active run, if any.
    ///
    /// The process and anything left in its process group are killed, even
    /// when the process itself has already exited and only its output is
    /// still being drained; the run then reports
    /// [`TerminationReport::KilledByUser`].
    ///
    /// Never fails and never blocks on the process. Calling it with nothing
    /// running, or calling it again after a stop was already requested, is a
    /// no-op. The final report is still produced by `execute`.
    pub fn stop(&self) {
        let mut active = self.lock_active();

        let Some(run) = active.as_mut() else {
            debug!("stop requested but no process is running");
            return;
        };

        let Some(cancel) = run.cancel.take() else {
            debug!(run_id = run.id, "stop already requested for this run");
            return;
        };

        // Emit while holding the slot lock: `execute` clears the slot before
        // emitting `Finished`, so this cannot overtake the final report.
        if cancel.send(()).is_err() {
            debug!(run_id = run.id, "process already finished while stopping");
            return;
        }

        info!(run_id = run.id, "stop requested; killing process");
        self.sink.emit(RunEvent::StopRequested);
    }

    fn claim_slot(&self, cancel: oneshot::Sender<()>) -> Result<u64> {
        let mut active = self.lock_active();
        if let Some(run) = active.as_ref() {
            warn!(run_id = run.id, "execute called while another process is running");
            return Err(FfshellError::Busy);
        }

        let id = self.runs_started.fetch_add(1, Ordering::Relaxed) + 1;
        *active = Some(ActiveRun {
            id,
            cancel: Some(cancel),
        });
        Ok(id)
    }

    fn lock_active(&self) -> MutexGuard<'_, Option<ActiveRun>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run_to_completion(
        &self,
        run_id: u64,
        command: &CommandLine,
        cancel_rx: oneshot::Receiver<()>,
    ) -> TerminationReport {
        let mut child = match command.to_command().spawn() {
            Ok(child) => child,
            Err(e) => {
                error!(
                    run_id,
                    program = %command.program(),
                    error = %e,
                    "failed to spawn process"
                );
                return TerminationReport::abnormal(
                    None,
                    format!("failed to start '{}': {e}", command.program()),
                );
            }
        };

        // The child leads its own process group; its pid names the group
        // even after the child itself has been reaped.
        let pgid = child.id();
        debug!(run_id, pid = ?pgid, "process spawned");

        let mut drains: Vec<JoinHandle<u64>> = [
            self.spawn_drain(run_id, child.stdout.take(), Channel::Stdout),
            self.spawn_drain(run_id, child.stderr.take(), Channel::Stderr),
        ]
        .into_iter()
        .flatten()
        .collect();

        // Fires only on a real stop request. The sender lives in the slot,
        // so it is not dropped while this run is in flight.
        let stop_requested = async move {
            if cancel_rx.await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        tokio::pin!(stop_requested);

        let exit = tokio::select! {
            status = child.wait() => RunExit::Exited(status),

            () = &mut stop_requested => {
                kill_child(run_id, &mut child, pgid).await;
                RunExit::Killed
            }
        };

        let exit = match exit {
            RunExit::Killed => {
                settle_drains(run_id, &mut drains).await;
                RunExit::Killed
            }
            RunExit::Exited(status) => {
                // The pipes can outlive the process: buffered output, or a
                // forked helper still holding them. A stop here still ends
                // the run.
                // A stop already announced wins over drains finishing in
                // the same poll.
                let stopped = tokio::select! {
                    biased;
                    () = &mut stop_requested => true,
                    () = join_drains(run_id, &mut drains) => false,
                };
                if stopped {
                    info!(run_id, "stop requested while draining output");
                    kill_group(run_id, pgid);
                    settle_drains(run_id, &mut drains).await;
                    RunExit::Killed
                } else {
                    RunExit::Exited(status)
                }
            }
        };

        match exit {
            RunExit::Killed => TerminationReport::KilledByUser,
            RunExit::Exited(Ok(status)) if status.success() => TerminationReport::NormalExit {
                code: status.code().unwrap_or(0),
            },
            RunExit::Exited(Ok(status)) => {
                TerminationReport::abnormal(status.code(), status.to_string())
            }
            RunExit::Exited(Err(e)) => {
                error!(run_id, error = %e, "failed to wait for process");
                TerminationReport::abnormal(None, format!("waiting for process failed: {e}"))
            }
        }
    }

    fn spawn_drain<R>(
        &self,
        run_id: u64,
        pipe: Option<R>,
        channel: Channel,
    ) -> Option<JoinHandle<u64>>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let Some(pipe) = pipe else {
            warn!(run_id, channel = %channel, "child pipe not available; not draining");
            return None;
        };

        let sink = Arc::clone(&self.sink);
        let buffer_size = self.options.buffer_size;
        Some(tokio::spawn(drain_stream(pipe, channel, buffer_size, sink)))
    }
}

/// Kill the child and everything left in its process group, then reap it.
async fn kill_child(run_id: u64, child: &mut Child, pgid: Option<u32>) {
    kill_group(run_id, pgid);
    if let Err(e) = child.kill().await {
        warn!(run_id, error = %e, "failed to kill process");
        if let Err(e) = child.wait().await {
            warn!(run_id, error = %e, "failed to reap process after kill");
        }
    }
}

#[cfg(unix)]
fn kill_group(run_id: u64, pgid: Option<u32>) {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Some(raw) = pgid.and_then(|id| i32::try_from(id).ok()) else {
        return;
    };
    match killpg(Pid::from_raw(raw), Signal::SIGKILL) {
        Ok(()) => debug!(run_id, pgid = raw, "killed process group"),
        Err(Errno::ESRCH) => debug!(run_id, pgid = raw, "process group already gone"),
        Err(e) => warn!(run_id, pgid = raw, error = %e, "failed to kill process group"),
    }
}

#[cfg(not(unix))]
fn kill_group(_run_id: u64, _pgid: Option<u32>) {}

/// Wait for every drain task, removing each as it completes so the list can
/// be resumed after a cancelled wait.
async fn join_drains(run_id: u64, drains: &mut Vec<JoinHandle<u64>>) {
    while let Some(handle) = drains.last_mut() {
        let joined = handle.await;
        drains.pop();
        match joined {
            Ok(bytes) => debug!(run_id, bytes, "drain task finished"),
            Err(e) if e.is_cancelled() => debug!(run_id, "drain task abandoned"),
            Err(e) => warn!(run_id, error = %e, "drain task panicked"),
        }
    }
}

/// After a stop: let the readers flush what is already buffered, then
/// abandon any pipe still held open by a process we could not reach.
async fn settle_drains(run_id: u64, drains: &mut Vec<JoinHandle<u64>>) {
    if tokio::time::timeout(STOP_DRAIN_GRACE, join_drains(run_id, drains))
        .await
        .is_ok()
    {
        return;
    }

    warn!(
        run_id,
        open = drains.len(),
        "output pipes still open after stop; abandoning readers"
    );
    for handle in drains.iter() {
        handle.abort();
    }
    // Aborted readers emit nothing further once joined.
    join_drains(run_id, drains).await;
}

/// Clears the runner's slot when the run ends, including when the `execute`
/// future is dropped part-way (the child is then killed by `kill_on_drop`).
struct SlotGuard<'a> {
    active: &'a Mutex<Option<ActiveRun>>,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        *active = None;
    }
}
