// src/exec/sink.rs

//! Where run notifications go.
//!
//! The runner never touches UI state directly. It pushes [`RunEvent`]s into
//! an `EventSink`, which is called from the drain tasks as well as from the
//! task running `execute`, so implementations must be thread-safe.
//!
//! - [`ChannelSink`] is the default: it forwards events over an unbounded
//!   mpsc channel so the consumer can process them in delivery order.
//! - Tests can provide their own sink that records what it saw.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::types::RunEvent;

/// Consumer of output chunks and lifecycle notifications.
pub trait EventSink: Send + Sync + 'static {
    fn emit(&self, event: RunEvent);
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn emit(&self, event: RunEvent) {
        (**self).emit(event);
    }
}

/// Sink backed by an unbounded mpsc channel.
///
/// Sending never blocks, so a slow consumer cannot stall the pipe readers
/// (and through them the child process).
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<RunEvent>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RunEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: RunEvent) {
        if let Err(err) = self.tx.send(event) {
            debug!(event = ?err.0, "event receiver dropped; discarding event");
        }
    }
}
