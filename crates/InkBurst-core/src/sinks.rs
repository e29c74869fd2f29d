use std::sync::{Mutex, PoisonError};

use stroke_canvas::{DrawCommand, wire};
use tokio::sync::mpsc;

use crate::traits::{CommandSink, TransportGate};

/// Gate for sinks that are always usable (recording, offline export).
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysOpen;

impl TransportGate for AlwaysOpen {
    fn is_open(&self) -> bool {
        true
    }
}

/// Keeps every accepted command in memory, in order.
///
/// Optionally starts refusing commands after a fixed number of accepted ones,
/// which simulates a connection dropping mid-effect.
#[derive(Debug, Default)]
pub struct RecordingSink {
    commands: Mutex<Vec<DrawCommand>>,
    fail_after: Option<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `limit` commands, then reports every send as failed.
    pub fn failing_after(limit: usize) -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            fail_after: Some(limit),
        }
    }

    pub fn len(&self) -> usize {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the accepted commands.
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drains the accepted commands.
    pub fn take(&self) -> Vec<DrawCommand> {
        std::mem::take(&mut *self.commands.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl CommandSink for RecordingSink {
    fn send(&self, cmd: &DrawCommand) -> bool {
        let mut guard = self.commands.lock().unwrap_or_else(PoisonError::into_inner);
        if self.fail_after.is_some_and(|limit| guard.len() >= limit) {
            return false;
        }
        guard.push(cmd.clone());
        true
    }
}

/// Encodes commands into socket frames and hands them to a writer task.
///
/// The channel doubles as the transport gate: once the receiving side is
/// dropped the connection is considered closed.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<String>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl CommandSink for ChannelSink {
    fn send(&self, cmd: &DrawCommand) -> bool {
        self.tx.send(wire::encode_frame(cmd)).is_ok()
    }
}

impl TransportGate for ChannelSink {
    fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stroke_canvas::{Color, Vec2};

    fn sample() -> DrawCommand {
        DrawCommand::line(Vec2::ZERO, Vec2::ONE, Color::BLACK, 2.0)
    }

    #[test]
    fn test_recording_sink_fails_after_limit() {
        let sink = RecordingSink::failing_after(2);
        assert!(sink.send(&sample()));
        assert!(sink.send(&sample()));
        assert!(!sink.send(&sample()));
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_channel_sink_closes_with_receiver() {
        let (sink, mut rx) = ChannelSink::new();
        assert!(sink.is_open());
        assert!(sink.send(&sample()));
        let frame = rx.try_recv().unwrap();
        assert!(frame.starts_with("42[\"drawcmd\""));

        drop(rx);
        assert!(!sink.is_open());
        assert!(!sink.send(&sample()));
    }
}
