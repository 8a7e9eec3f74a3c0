use std::sync::{Arc, Mutex};

use ffshell::exec::EventSink;
use ffshell::types::{Channel, RunEvent, TerminationReport};
use tokio::sync::Notify;

/// A sink that:
/// - records every event in delivery order
/// - wakes waiters whenever something arrives, so tests can wait for output
///   before calling `stop`.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RunEvent>>,
    notify: Notify,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<RunEvent> {
        self.events.lock().unwrap().clone()
    }

    /// All text received on `channel`, concatenated in arrival order.
    pub fn text(&self, channel: Channel) -> String {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                RunEvent::Output(c) if c.channel == channel => Some(c.text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn output_count(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, RunEvent::Output(_)))
            .count()
    }

    pub fn finished_reports(&self) -> Vec<TerminationReport> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                RunEvent::Finished(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    /// Wait until `channel` has received text containing `needle`.
    pub async fn wait_for_text(&self, channel: Channel, needle: &str) {
        loop {
            let notified = self.notify.notified();
            if self.text(channel).contains(needle) {
                return;
            }
            notified.await;
        }
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: RunEvent) {
        self.events.lock().unwrap().push(event);
        self.notify.notify_waiters();
    }
}
