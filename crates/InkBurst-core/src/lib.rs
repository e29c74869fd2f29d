//! # InkBurst Core
//!
//! `inkburst_core` turns procedural art effects into streams of line-segment
//! commands and paces them onto a shared multiplayer canvas.
//!
//! ## Core Architecture
//! - **Pipeline (`src/pipeline.rs`)**: `DrawContext`, the cancellation token
//!   and the send/pace contract every effect goes through.
//! - **Session (`src/session.rs`)**: One active effect at a time, start and
//!   finish notifications, the frame counter.
//! - **Effects (`src/effects/`)**: Sweeps, shape festivals, fireworks,
//!   stained glass, particle ballet, fractal trees, star novas, sprites.
//! - **Font (`src/font.rs`)**: A 5-row pixel font and its rasterizer.
//! - **Traits (`src/traits.rs`)**: Seams to the host: sink, gate, notifier,
//!   timer. Stock implementations live in `sinks`, `notify` and `timer`.

pub mod config;
pub mod effects;
pub mod font;
pub mod notify;
pub mod pipeline;
pub mod session;
pub mod sinks;
pub mod timer;
pub mod traits;

pub use config::DrawConfig;
pub use effects::Effect;
pub use font::{PixelFont, PixelText};
pub use notify::{BroadcastNotifier, Notification, TracingNotifier};
pub use pipeline::{CancelToken, DrawContext, EffectOutcome, Halt, RunStats, Step};
pub use session::{DrawError, DrawSession, EffectReport, SessionBuilder};
pub use sinks::{AlwaysOpen, ChannelSink, RecordingSink};
pub use timer::{InstantTimer, TokioTimer};
pub use traits::{CommandSink, Notifier, NotifyLevel, Timer, TransportGate};
