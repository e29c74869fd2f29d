//! # Draw Commands
//!
//! The remote surface only understands straight line segments. Every effect,
//! however elaborate, is lowered into a stream of `DrawCommand`s.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::config::Surface;

/// Offset used to turn a point into a drawable, near zero-length segment.
const PIXEL_SPAN: f32 = 0.0001;
/// Share of the pixel cell covered by a filled pixel's stroke.
const PIXEL_FILL: f32 = 0.9;

/// A single drawing primitive.
///
/// Coordinates are **normalized** to `[0, 1]` on both axes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    /// Segment start.
    pub start: Vec2,
    /// Segment end.
    pub end: Vec2,
    /// Stroke color.
    pub color: Color,
    /// Stroke thickness in surface units.
    pub thickness: f32,
    /// Erase instead of paint.
    #[serde(default)]
    pub erase: bool,
}

impl DrawCommand {
    pub fn line(start: Vec2, end: Vec2, color: Color, thickness: f32) -> Self {
        Self {
            start,
            end,
            color,
            thickness,
            erase: false,
        }
    }

    pub fn eraser(start: Vec2, end: Vec2, color: Color, thickness: f32) -> Self {
        Self {
            erase: true,
            ..Self::line(start, end, color, thickness)
        }
    }

    /// A short dot at `at`, used by sweep effects.
    pub fn dot(at: Vec2, color: Color, thickness: f32) -> Self {
        Self::line(at, at + Vec2::splat(0.001), color, thickness)
    }

    /// A filled square pixel of normalized `size` whose top-left is `at`.
    ///
    /// The primitive has no fill, so the pixel is a degenerate segment with a
    /// stroke wide enough to cover the cell on the given surface.
    pub fn pixel(at: Vec2, size: f32, color: Color, surface: &Surface) -> Self {
        Self::line(
            at,
            at + Vec2::splat(size * PIXEL_SPAN),
            color,
            size * surface.min_side() * PIXEL_FILL,
        )
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// A list of draw commands, in transmission order.
pub type RenderList = Vec<DrawCommand>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_is_degenerate_and_thick() {
        let surface = Surface::new(800.0, 600.0);
        let cmd = DrawCommand::pixel(Vec2::new(0.2, 0.3), 0.01, Color::BLACK, &surface);
        assert!(cmd.length() < 1e-5);
        assert!((cmd.thickness - 0.01 * 600.0 * 0.9).abs() < 1e-4);
        assert!(!cmd.erase);
    }

    #[test]
    fn test_eraser_flag() {
        let cmd = DrawCommand::eraser(Vec2::ZERO, Vec2::ONE, Color::WHITE, 2000.0);
        assert!(cmd.erase);
        assert_eq!(cmd.thickness, 2000.0);
    }
}
