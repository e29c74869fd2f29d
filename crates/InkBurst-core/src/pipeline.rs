//! # Cooperative Drawing Pipeline
//!
//! Every effect runs as one logical task that alternates between sending a
//! primitive and pacing. `DrawContext` is the only door to the transport:
//! it checks the cancellation token before each send, turns a failed send
//! into a terminal [`Halt`], and owns the single suspension point (`pace`).
//!
//! Generators return [`Step`] and propagate halts with `?`, so a failure deep
//! inside a nested shape stops the whole effect at once.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use stroke_canvas::{DrawCommand, Surface};

use crate::config::DrawConfig;
use crate::traits::{CommandSink, Notifier, NotifyLevel, Timer, TransportGate};

/// Cancellation latch of one effect invocation.
///
/// Cloning shares the latch. A token is active from creation until the first
/// call to [`CancelToken::cancel`]; it is never re-armed.
#[derive(Clone, Debug)]
pub struct CancelToken {
    active: Arc<AtomicBool>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn cancel(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        !self.is_active()
    }

    /// True when both tokens share the same latch.
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.active, &other.active)
    }
}

/// Why an effect stopped before its natural end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Halt {
    #[error("effect was cancelled")]
    Cancelled,
    #[error("transport refused a draw command")]
    TransportFailed,
}

/// Result of one unit of generator work.
pub type Step<T = ()> = Result<T, Halt>;

/// How an effect invocation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectOutcome {
    Completed,
    Cancelled,
    TransportFailed,
}

impl From<Step> for EffectOutcome {
    fn from(step: Step) -> Self {
        match step {
            Ok(()) => EffectOutcome::Completed,
            Err(Halt::Cancelled) => EffectOutcome::Cancelled,
            Err(Halt::TransportFailed) => EffectOutcome::TransportFailed,
        }
    }
}

/// Counters collected while an effect runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Commands accepted by the sink.
    pub commands_sent: usize,
    /// Top-level iterations started (shapes, frames, sprites...).
    pub units: usize,
}

/// The host-provided collaborators, shared by every invocation of a session.
#[derive(Clone)]
pub struct Collaborators {
    pub sink: Arc<dyn CommandSink>,
    pub gate: Arc<dyn TransportGate>,
    pub notifier: Arc<dyn Notifier>,
    pub timer: Arc<dyn Timer>,
}

/// Everything a generator may touch while it runs.
pub struct DrawContext<'a> {
    collaborators: &'a Collaborators,
    token: &'a CancelToken,
    surface: Surface,
    draw_delay_ms: u64,
    rng: StdRng,
    stats: RunStats,
}

impl<'a> DrawContext<'a> {
    pub fn new(
        collaborators: &'a Collaborators,
        token: &'a CancelToken,
        config: &DrawConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            collaborators,
            token,
            surface: config.surface,
            draw_delay_ms: config.draw_delay_ms,
            rng,
            stats: RunStats::default(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fails with [`Halt::Cancelled`] once the token has been cleared.
    pub fn check(&self) -> Step {
        if self.is_cancelled() {
            Err(Halt::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Hands `cmd` to the transport without looking at the token.
    ///
    /// A closed gate or a refused send clears the token, warns the user once
    /// and halts the effect.
    pub fn try_send(&mut self, cmd: &DrawCommand) -> Step {
        let Collaborators { sink, gate, .. } = self.collaborators;
        if gate.is_open() && sink.send(cmd) {
            self.stats.commands_sent += 1;
            return Ok(());
        }

        self.token.cancel();
        tracing::warn!(
            commands_sent = self.stats.commands_sent,
            "Draw command rejected, halting effect"
        );
        self.collaborators.notifier.notify(
            NotifyLevel::Warning,
            "Drawing interrupted: connection closed or send failed.",
        );
        Err(Halt::TransportFailed)
    }

    /// Checks cancellation, then sends.
    pub fn send(&mut self, cmd: &DrawCommand) -> Step {
        self.check()?;
        self.try_send(cmd)
    }

    /// Suspends for `ms` milliseconds; zero returns immediately.
    pub async fn pace(&self, ms: u64) {
        if ms > 0 {
            self.collaborators.timer.delay(ms).await;
        }
    }

    /// `send` followed by `pace`.
    pub async fn send_paced(&mut self, cmd: &DrawCommand, ms: u64) -> Step {
        self.send(cmd)?;
        self.pace(ms).await;
        Ok(())
    }

    /// Marks the start of a top-level iteration.
    pub fn begin_unit(&mut self) -> Step {
        self.check()?;
        self.stats.units += 1;
        Ok(())
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The configured per-command delay for command lists.
    pub fn draw_delay_ms(&self) -> u64 {
        self.draw_delay_ms
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// An independent generator for helpers that must own their randomness.
    pub fn fork_rng(&mut self) -> StdRng {
        StdRng::seed_from_u64(self.rng.next_u64())
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }
}
