use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in normalized surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    pub const fn from_bounds(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        Self {
            min: Vec2::new(x_min, y_min),
            max: Vec2::new(x_max, y_max),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn expand(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    /// Clamps `p` into the rectangle.
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// The whole drawing surface.
pub const UNIT: Rect = Rect::from_bounds(0.0, 0.0, 1.0, 1.0);

pub const TOP_LEFT: Rect = Rect::from_bounds(0.0, 0.0, 0.5, 0.5);
pub const TOP_RIGHT: Rect = Rect::from_bounds(0.5, 0.0, 1.0, 0.5);
pub const BOTTOM_LEFT: Rect = Rect::from_bounds(0.0, 0.5, 0.5, 1.0);
pub const BOTTOM_RIGHT: Rect = Rect::from_bounds(0.5, 0.5, 1.0, 1.0);

/// Surface center, the origin of every radial effect.
pub const CENTER: Vec2 = Vec2::new(0.5, 0.5);

/// Point at `t` along the segment `start -> end`.
pub fn lerp(start: Vec2, end: Vec2, t: f32) -> Vec2 {
    start + (end - start) * t
}

/// Point at `radius` from `center` in direction `angle` (radians).
pub fn polar(center: Vec2, angle: f32, radius: f32) -> Vec2 {
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}

pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) * 0.5
}
