//! Celestial ballet: dancers orbiting their own centres, drawn as trails.

use glam::Vec2;
use once_cell::sync::Lazy;
use rand::Rng;
use std::f32::consts::FRAC_PI_2;
use stroke_canvas::math::{CENTER, UNIT};
use stroke_canvas::{Color, DrawCommand, Rect};

use crate::pipeline::{DrawContext, Step};

pub const STEPS: usize = 150;
pub const STEP_MS: u64 = 25;
pub const TRAIL_THICKNESS: f32 = 3.0;

const ORBIT_GAIN: f32 = 0.1;
const CENTERING: f32 = 0.0005;
const DAMPING: f32 = 0.97;
const BOUNCE: f32 = -0.8;
const WALL_MARGIN: f32 = 0.01;
const HUE_DRIFT: f32 = 0.5;

/// Where dancers may move; they bounce off its edges.
static ARENA: Lazy<Rect> = Lazy::new(|| UNIT.expand(-WALL_MARGIN));

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dancer {
    pub pos: Vec2,
    pub vel: Vec2,
    pub orbit_center: Vec2,
    /// Signed; the sign picks the orbit direction.
    pub orbit_speed: f32,
    pub hue: f32,
}

impl Dancer {
    pub fn random(rng: &mut impl Rng) -> Self {
        let speed = rng.gen_range(0.02..0.07);
        let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        Self {
            pos: CENTER,
            vel: Vec2::new(rng.gen_range(-0.01..0.01), rng.gen_range(-0.01..0.01)),
            orbit_center: CENTER + Vec2::new(rng.gen_range(-0.2..0.2), rng.gen_range(-0.2..0.2)),
            orbit_speed: speed * direction,
            hue: rng.gen_range(0.0..360.0),
        }
    }

    /// Advances one simulation step and returns the trail segment.
    pub fn step(&mut self) -> DrawCommand {
        let last = self.pos;

        let to_dancer = self.pos - self.orbit_center;
        let tangent = to_dancer.y.atan2(to_dancer.x) + FRAC_PI_2;
        self.vel += Vec2::new(tangent.cos(), tangent.sin()) * self.orbit_speed * ORBIT_GAIN;
        self.vel += (CENTER - self.pos) * CENTERING;
        self.vel *= DAMPING;
        self.pos += self.vel;

        let arena = *ARENA;
        if !(arena.min.x..=arena.max.x).contains(&self.pos.x) {
            self.vel.x *= BOUNCE;
        }
        if !(arena.min.y..=arena.max.y).contains(&self.pos.y) {
            self.vel.y *= BOUNCE;
        }
        self.pos = arena.clamp(self.pos);
        self.hue = (self.hue + HUE_DRIFT) % 360.0;

        DrawCommand::line(
            last,
            self.pos,
            Color::hsl(self.hue, 100.0, 70.0),
            TRAIL_THICKNESS,
        )
    }
}

pub async fn celestial_ballet(ctx: &mut DrawContext<'_>) -> Step {
    let count = ctx.rng().gen_range(8..=12);
    let mut dancers: Vec<Dancer> = (0..count).map(|_| Dancer::random(ctx.rng())).collect();

    for _ in 0..STEPS {
        ctx.begin_unit()?;
        for dancer in &mut dancers {
            let trail = dancer.step();
            ctx.send(&trail)?;
        }
        ctx.pace(STEP_MS).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_dancer_stays_on_surface() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut dancer = Dancer::random(&mut rng);
        dancer.vel = Vec2::new(0.5, -0.5);
        for _ in 0..STEPS {
            let seg = dancer.step();
            assert!(ARENA.contains(seg.end));
            assert!(seg.end.x >= 0.01 - 1e-6 && seg.end.x <= 0.99 + 1e-6);
        }
    }

    #[test]
    fn test_trail_is_continuous() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut dancer = Dancer::random(&mut rng);
        let first = dancer.step();
        let second = dancer.step();
        assert_eq!(first.start, CENTER);
        assert_eq!(first.end, second.start);
    }

    #[test]
    fn test_wall_reflects_velocity() {
        let mut dancer = Dancer {
            pos: Vec2::new(0.985, 0.5),
            vel: Vec2::new(0.1, 0.0),
            orbit_center: Vec2::new(0.985, 0.5),
            orbit_speed: 0.0,
            hue: 0.0,
        };
        dancer.step();
        assert!(dancer.vel.x < 0.0);
        assert_eq!(dancer.pos.x, ARENA.max.x);
    }
}
