//! # Surface
//!
//! Physical dimensions of the remote drawing surface.

use serde::{Deserialize, Serialize};

/// Pixel size of the drawing surface.
///
/// Commands are expressed in normalized coordinates; the surface is only needed
/// where a thickness has to be derived from a normalized size (filled pixels).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    /// Width in pixels. Default: 800.
    pub width: f32,
    /// Height in pixels. Default: 630.
    pub height: f32,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 630.0,
        }
    }
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The shorter of the two sides, in pixels.
    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }
}
