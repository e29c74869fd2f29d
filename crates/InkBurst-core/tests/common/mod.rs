#![allow(dead_code)]

use async_trait::async_trait;
use inkburst_core::{
    CommandSink, DrawConfig, DrawSession, InstantTimer, Notifier, NotifyLevel, Timer,
    TransportGate,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, Weak};
use stroke_canvas::DrawCommand;

/// Keeps every notification for later assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<(NotifyLevel, String)>>,
}

impl RecordingNotifier {
    pub fn events(&self) -> Vec<(NotifyLevel, String)> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, level: NotifyLevel) -> usize {
        self.events().iter().filter(|(l, _)| *l == level).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NotifyLevel, message: &str) {
        self.events.lock().unwrap().push((level, message.to_string()));
    }
}

/// Accepts commands and stops the session right after the `limit`-th one.
pub struct StopAfter {
    limit: usize,
    sent: AtomicUsize,
    session: OnceLock<Weak<DrawSession>>,
}

impl StopAfter {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            sent: AtomicUsize::new(0),
            session: OnceLock::new(),
        }
    }

    pub fn attach(&self, session: &Arc<DrawSession>) {
        let _ = self.session.set(Arc::downgrade(session));
    }

    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

impl CommandSink for StopAfter {
    fn send(&self, _cmd: &DrawCommand) -> bool {
        let sent = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        if sent == self.limit {
            if let Some(session) = self.session.get().and_then(Weak::upgrade) {
                session.stop();
            }
        }
        true
    }
}

/// Returns immediately but remembers every pause it was asked for.
#[derive(Default)]
pub struct RecordingTimer {
    pub waits: Mutex<Vec<u64>>,
}

impl RecordingTimer {
    pub fn waits(&self) -> Vec<u64> {
        self.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl Timer for RecordingTimer {
    async fn delay(&self, ms: u64) {
        self.waits.lock().unwrap().push(ms);
    }
}

pub struct ClosedGate;

impl TransportGate for ClosedGate {
    fn is_open(&self) -> bool {
        false
    }
}

/// Routes library logs through the test harness; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn seeded_config(seed: u64) -> DrawConfig {
    DrawConfig {
        draw_delay_ms: 0,
        seed: Some(seed),
        ..DrawConfig::default()
    }
}

/// A session wired to `sink`, a recording notifier and instant pacing.
pub fn session_with(
    sink: Arc<dyn CommandSink>,
    notifier: Arc<RecordingNotifier>,
) -> DrawSession {
    DrawSession::builder()
        .with_sink(sink)
        .with_notifier(notifier)
        .with_timer(Arc::new(InstantTimer))
        .with_config(seeded_config(7))
        .build()
}
