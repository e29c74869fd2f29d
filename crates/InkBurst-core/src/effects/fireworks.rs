//! Light-speed fireworks: a rising trail followed by a radial explosion.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;
use stroke_canvas::math::{lerp, polar};
use stroke_canvas::{Color, DrawCommand, render::RenderList};

use crate::pipeline::{DrawContext, Step};

pub const FIREWORK_COUNT: usize = 8;
pub const LAUNCH_STEPS: usize = 25;
pub const LAUNCH_STEP_MS: u64 = 4;
pub const PARTICLE_MS: u64 = 8;
pub const PAUSE_MS: u64 = 600;

const LAUNCH_THICKNESS: f32 = 6.0;
const HUE_JITTER: f32 = 30.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Firework {
    pub start: Vec2,
    pub peak: Vec2,
    pub trail_color: Color,
    pub base_hue: f32,
    pub particles: Vec<Particle>,
}

/// One radial segment of an explosion, relative to the peak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub angle: f32,
    pub distance: f32,
    pub hue_offset: f32,
    pub thickness: f32,
}

impl Firework {
    pub fn random(rng: &mut impl Rng) -> Self {
        let start = Vec2::new(rng.gen_range(0.2..0.8), 0.95);
        let peak = Vec2::new(
            start.x + rng.gen_range(-0.15..0.15),
            rng.gen_range(0.05..0.45),
        );
        let trail_color = Color::random_hsl(rng, 100.0, 70.0);
        let base_hue = rng.gen_range(0.0..360.0);
        let count = rng.gen_range(40..=80);
        let particles = (0..count)
            .map(|_| Particle {
                angle: rng.gen_range(0.0..TAU),
                distance: rng.gen_range(0.05..0.25),
                hue_offset: rng.gen_range(-HUE_JITTER..HUE_JITTER),
                thickness: rng.gen_range(4..=7) as f32,
            })
            .collect();

        Self {
            start,
            peak,
            trail_color,
            base_hue,
            particles,
        }
    }

    /// Segments of the rising trail, start to peak.
    pub fn launch(&self) -> RenderList {
        (1..=LAUNCH_STEPS)
            .map(|i| {
                let from = lerp(self.start, self.peak, (i - 1) as f32 / LAUNCH_STEPS as f32);
                let to = lerp(self.start, self.peak, i as f32 / LAUNCH_STEPS as f32);
                DrawCommand::line(from, to, self.trail_color, LAUNCH_THICKNESS)
            })
            .collect()
    }

    pub fn explosion(&self) -> RenderList {
        self.particles
            .iter()
            .map(|p| {
                DrawCommand::line(
                    self.peak,
                    polar(self.peak, p.angle, p.distance),
                    Color::hsl(self.base_hue + p.hue_offset, 100.0, 60.0),
                    p.thickness,
                )
            })
            .collect()
    }
}

pub async fn light_speed_fireworks(ctx: &mut DrawContext<'_>) -> Step {
    for _ in 0..FIREWORK_COUNT {
        ctx.begin_unit()?;
        let firework = Firework::random(ctx.rng());
        for segment in firework.launch() {
            ctx.send_paced(&segment, LAUNCH_STEP_MS).await?;
        }
        for particle in firework.explosion() {
            ctx.send_paced(&particle, PARTICLE_MS).await?;
        }
        ctx.pace(PAUSE_MS).await;
    }
    Ok(())
}
