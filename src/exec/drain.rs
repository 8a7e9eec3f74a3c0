// src/exec/drain.rs

//! Pipe drain loop.
//!
//! One drain task owns one pipe exclusively and forwards whatever it reads
//! to the sink until the pipe reports end-of-stream. Reads are raw byte
//! reads, not line reads: progress output from media tools is usually
//! carriage-return terminated and would otherwise sit in a line buffer.

use std::io::ErrorKind;

use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::exec::sink::EventSink;
use crate::types::{Channel, OutputChunk, RunEvent};

/// Incremental UTF-8 decoder.
///
/// Holds back an incomplete multi-byte sequence at the end of a read so a
/// character split across two reads is decoded whole. Invalid bytes become
/// U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut out = String::with_capacity(self.pending.len());
        let mut start = 0;
        let tail_start = loop {
            match std::str::from_utf8(&self.pending[start..]) {
                Ok(s) => {
                    out.push_str(s);
                    break self.pending.len();
                }
                Err(e) => {
                    let valid_end = start + e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[start..valid_end]));
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            start = valid_end + len;
                        }
                        // Truncated sequence at the end: wait for more bytes.
                        None => break valid_end,
                    }
                }
            }
        };

        self.pending.drain(..tail_start);
        out
    }

    /// Flush whatever is still held back. Used at end-of-stream.
    pub fn finish(&mut self) -> String {
        let out = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        out
    }
}

/// Read `reader` to end-of-stream, emitting one [`OutputChunk`] per
/// non-empty read.
///
/// - `Ok(0)` is end-of-stream and ends the loop cleanly.
/// - `Interrupted` is retried.
/// - Any other error is forwarded as a final chunk on this channel and ends
///   this reader only; the sibling reader and the process are unaffected.
///
/// Returns the number of bytes read.
pub async fn drain_stream<R, S>(
    mut reader: R,
    channel: Channel,
    buffer_size: usize,
    sink: S,
) -> u64
where
    R: AsyncRead + Unpin,
    S: EventSink,
{
    let mut buf = vec![0u8; buffer_size.max(1)];
    let mut decoder = Utf8Decoder::default();
    let mut total: u64 = 0;

    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                total += n as u64;
                let text = decoder.decode(&buf[..n]);
                if !text.is_empty() {
                    debug!(channel = %channel, "{}", text);
                    sink.emit(RunEvent::Output(OutputChunk::new(channel, text)));
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                emit_rest(&mut decoder, channel, &sink);
                warn!(channel = %channel, error = %e, "failed to read from child pipe");
                sink.emit(RunEvent::Output(OutputChunk::new(channel, e.to_string())));
                return total;
            }
        }
    }

    emit_rest(&mut decoder, channel, &sink);
    debug!(channel = %channel, bytes = total, "pipe reached end-of-stream");
    total
}

fn emit_rest<S: EventSink>(decoder: &mut Utf8Decoder, channel: Channel, sink: &S) {
    let rest = decoder.finish();
    if !rest.is_empty() {
        sink.emit(RunEvent::Output(OutputChunk::new(channel, rest)));
    }
}
