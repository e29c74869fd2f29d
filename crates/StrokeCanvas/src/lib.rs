//! # StrokeCanvas
//!
//! `stroke_canvas` holds the value types shared by every InkBurst effect.
//! Nothing in here talks to a network or waits on a timer; it only describes
//! what gets drawn.
//!
//! ## Core Architecture
//! - **Math (`src/math.rs`)**: Normalized rectangles and point helpers.
//! - **Color (`src/color.rs`)**: Hex, `rgb(...)` and `hsl(...)` color specs.
//! - **Render (`src/render.rs`)**: The `DrawCommand` primitive (one line segment).
//! - **Wire (`src/wire.rs`)**: Encoding of commands into the game's socket frames.
//! - **Persistence (`src/persistence.rs`)**: JSON command batches on disk.

pub mod color;
pub mod config;
pub mod math;
pub mod persistence;
pub mod render;
pub mod wire;

// Re-exports for convenience
pub use color::{Color, ColorParseError};
pub use config::Surface;
pub use glam::Vec2;
pub use math::Rect;
pub use persistence::{BatchError, CommandBatch};
pub use render::DrawCommand;
