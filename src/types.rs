use std::fmt;

/// Which of the child's output pipes a chunk was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Stdout,
    Stderr,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Stdout => f.write_str("stdout"),
            Channel::Stderr => f.write_str("stderr"),
        }
    }
}

/// A piece of decoded output, tagged with its source pipe.
///
/// Chunks from one channel arrive in read order. There is no ordering
/// between the two channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChunk {
    pub channel: Channel,
    pub text: String,
}

impl OutputChunk {
    pub fn new(channel: Channel, text: impl Into<String>) -> Self {
        Self {
            channel,
            text: text.into(),
        }
    }
}

/// Terminal outcome of one `execute` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReport {
    /// The process exited on its own with status 0.
    NormalExit { code: i32 },
    /// The process could not be started, exited non-zero, or died from a
    /// signal nobody asked for.
    AbnormalExit {
        code: Option<i32>,
        description: String,
    },
    /// The process was killed because `stop` was called.
    KilledByUser,
}

impl TerminationReport {
    pub fn abnormal(code: Option<i32>, description: impl Into<String>) -> Self {
        TerminationReport::AbnormalExit {
            code,
            description: description.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TerminationReport::NormalExit { .. })
    }

    /// Shell-style exit code for a front end that mirrors the child.
    ///
    /// - `NormalExit` → the child's code (0)
    /// - `AbnormalExit` → the child's code, or 1 when there is none
    /// - `KilledByUser` → 130, as a shell reports an interrupted job
    pub fn exit_code(&self) -> i32 {
        match self {
            TerminationReport::NormalExit { code } => *code,
            TerminationReport::AbnormalExit { code, .. } => match code {
                Some(c) if *c != 0 => *c,
                _ => 1,
            },
            TerminationReport::KilledByUser => 130,
        }
    }
}

impl fmt::Display for TerminationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReport::NormalExit { code } => write!(f, "exited normally (code {code})"),
            TerminationReport::AbnormalExit { description, .. } => {
                write!(f, "failed: {description}")
            }
            TerminationReport::KilledByUser => f.write_str("stopped by user"),
        }
    }
}

/// Notifications delivered to an [`EventSink`](crate::exec::EventSink).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    /// Text read from one of the child's pipes.
    Output(OutputChunk),
    /// `stop` was called while a process was active.
    StopRequested,
    /// The run is over. Always the last event of a run.
    Finished(TerminationReport),
}
