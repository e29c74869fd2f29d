//! # Drawing Session
//!
//! A `DrawSession` owns the collaborators, the configuration and the only
//! state that outlives a single effect: the slot holding the active
//! [`CancelToken`] and the frame counter used by the rotating effects.
//!
//! At most one effect is active per session. Starting a new effect while
//! another is running supersedes it: the old token is cancelled before the
//! new one is installed, and the old effect finalizes itself on its next
//! check.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use crate::config::DrawConfig;
use crate::effects::{self, Effect};
use crate::notify::TracingNotifier;
use crate::pipeline::{CancelToken, Collaborators, DrawContext, EffectOutcome, RunStats};
use crate::sinks::{AlwaysOpen, RecordingSink};
use crate::timer::TokioTimer;
use crate::traits::{CommandSink, Notifier, NotifyLevel, Timer, TransportGate};

pub const NOT_CONNECTED_MESSAGE: &str = "Not connected to Drawaria. Please be in a room.";

#[derive(Debug, thiserror::Error)]
pub enum DrawError {
    #[error("transport is not open")]
    TransportUnavailable,
    #[error("unknown effect '{0}'")]
    UnknownEffect(String),
}

/// Summary of one effect invocation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EffectReport {
    pub run_id: Uuid,
    pub effect: &'static str,
    pub outcome: EffectOutcome,
    /// Frame counter value the effect ran with.
    pub frame: u64,
    #[serde(flatten)]
    pub stats: RunStats,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

pub struct SessionBuilder {
    sink: Option<Arc<dyn CommandSink>>,
    gate: Option<Arc<dyn TransportGate>>,
    notifier: Option<Arc<dyn Notifier>>,
    timer: Option<Arc<dyn Timer>>,
    config: DrawConfig,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            sink: None,
            gate: None,
            notifier: None,
            timer: None,
            config: DrawConfig::default(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn CommandSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_gate(mut self, gate: Arc<dyn TransportGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = Some(timer);
        self
    }

    pub fn with_config(mut self, config: DrawConfig) -> Self {
        self.config = config;
        self
    }

    /// Missing collaborators fall back to an in-memory sink, an always-open
    /// gate, tracing notifications and real-time pacing.
    pub fn build(self) -> DrawSession {
        let collaborators = Collaborators {
            sink: self.sink.unwrap_or_else(|| Arc::new(RecordingSink::new())),
            gate: self.gate.unwrap_or_else(|| Arc::new(AlwaysOpen)),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
            timer: self.timer.unwrap_or_else(|| Arc::new(TokioTimer)),
        };
        DrawSession {
            collaborators,
            config: self.config,
            current: Mutex::new(None),
            frame_counter: AtomicU64::new(0),
        }
    }
}

pub struct DrawSession {
    collaborators: Collaborators,
    config: DrawConfig,
    current: Mutex<Option<CancelToken>>,
    frame_counter: AtomicU64,
}

impl DrawSession {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    /// Completed bloom and nova invocations so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_counter.load(Ordering::SeqCst)
    }

    pub fn is_active(&self) -> bool {
        self.slot().as_ref().is_some_and(CancelToken::is_active)
    }

    /// Cancels the running effect, if any. Returns whether one was active.
    pub fn stop(&self) -> bool {
        match self.slot().as_ref() {
            Some(token) if token.is_active() => {
                token.cancel();
                tracing::info!("Stop requested");
                true
            }
            _ => false,
        }
    }

    /// Runs `effect` to completion, cancellation or transport failure.
    ///
    /// Fails only when the transport is closed before the effect starts. An
    /// effect already running on this session is cancelled first.
    #[tracing::instrument(skip_all, fields(effect = effect.name(), run_id = tracing::field::Empty))]
    pub async fn run(&self, effect: &Effect) -> Result<EffectReport, DrawError> {
        let notifier = &self.collaborators.notifier;
        if !self.collaborators.gate.is_open() {
            notifier.notify(NotifyLevel::Error, NOT_CONNECTED_MESSAGE);
            return Err(DrawError::TransportUnavailable);
        }

        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        let token = self.begin();
        let title = effect.title();
        notifier.notify(NotifyLevel::Info, &format!("Starting {title}..."));

        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let frame = self.frame_count();
        let mut ctx = DrawContext::new(&self.collaborators, &token, &self.config, rng);
        let outcome = EffectOutcome::from(effects::run(effect, &mut ctx, frame).await);
        let stats = ctx.stats();

        if effect.advances_frame() {
            self.frame_counter.fetch_add(1, Ordering::SeqCst);
        }
        self.finish(&token);

        let (level, message) = match outcome {
            EffectOutcome::Completed => (NotifyLevel::Success, format!("{title} finished.")),
            EffectOutcome::Cancelled => (NotifyLevel::Info, format!("{title} stopped.")),
            EffectOutcome::TransportFailed => (
                NotifyLevel::Error,
                format!("{title} aborted: connection lost."),
            ),
        };
        notifier.notify(level, &message);
        tracing::info!(
            ?outcome,
            commands_sent = stats.commands_sent,
            units = stats.units,
            "Effect finished"
        );

        Ok(EffectReport {
            run_id,
            effect: effect.name(),
            outcome,
            frame,
            stats,
            finished_at: chrono::Utc::now(),
        })
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<CancelToken>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Installs a fresh token, cancelling the one it replaces.
    fn begin(&self) -> CancelToken {
        let token = CancelToken::new();
        if let Some(previous) = self.slot().replace(token.clone()) {
            if previous.is_active() {
                tracing::info!("Superseding the running effect");
            }
            previous.cancel();
        }
        token
    }

    /// Clears `token` and frees the slot unless a newer effect owns it.
    fn finish(&self, token: &CancelToken) {
        token.cancel();
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|current| current.same_as(token)) {
            *slot = None;
        }
    }
}
