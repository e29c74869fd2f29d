use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::traits::{Notifier, NotifyLevel};

/// Forwards notifications to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        match level {
            NotifyLevel::Info => tracing::info!(target: "inkburst::notify", "{}", message),
            NotifyLevel::Success => {
                tracing::info!(target: "inkburst::notify", success = true, "{}", message)
            }
            NotifyLevel::Warning => tracing::warn!(target: "inkburst::notify", "{}", message),
            NotifyLevel::Error => tracing::error!(target: "inkburst::notify", "{}", message),
        }
    }
}

/// A notification as published on the broadcast bus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
}

/// Publishes notifications to any number of UI subscribers.
///
/// Sending never blocks; without subscribers the notification is dropped.
#[derive(Clone, Debug)]
pub struct BroadcastNotifier {
    tx: broadcast::Sender<Notification>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }
}

impl Notifier for BroadcastNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        let _ = self.tx.send(Notification {
            level,
            message: message.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        });
    }
}
