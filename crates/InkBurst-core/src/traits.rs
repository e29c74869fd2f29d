//! Seams to the world outside the pipeline.
//!
//! The transport, the notification surface and the clock all belong to the
//! host. The pipeline only ever talks to them through these traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stroke_canvas::DrawCommand;

/// Reports whether the outbound channel can currently carry commands.
pub trait TransportGate: Send + Sync {
    fn is_open(&self) -> bool;
}

/// Accepts one primitive draw instruction and attempts to transmit it.
pub trait CommandSink: Send + Sync {
    /// Returns `false` when the command could not be handed to the transport.
    fn send(&self, cmd: &DrawCommand) -> bool;
}

/// Severity of a user-facing notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    Info,
    Warning,
    Error,
    Success,
}

/// Fire-and-forget presentation surface.
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotifyLevel, message: &str);
}

/// Suspends the current task.
#[async_trait]
pub trait Timer: Send + Sync {
    async fn delay(&self, ms: u64);
}
