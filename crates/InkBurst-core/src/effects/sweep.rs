//! Sweeps: dots stepped along fixed straight paths with a rotating hue.

use glam::Vec2;
use stroke_canvas::math::{self, CENTER};
use stroke_canvas::{Color, DrawCommand};

use crate::pipeline::{DrawContext, Step};

pub const BLAST_STEPS: u32 = 100;
pub const BLAST_STEP_MS: u64 = 40;

/// Top to bottom, bottom to top, left to right, right to left; all through the centre.
pub const BLAST_AXES: [(Vec2, Vec2); 4] = [
    (Vec2::new(0.5, 0.0), Vec2::new(0.5, 1.0)),
    (Vec2::new(0.5, 1.0), Vec2::new(0.5, 0.0)),
    (Vec2::new(0.0, 0.5), Vec2::new(1.0, 0.5)),
    (Vec2::new(1.0, 0.5), Vec2::new(0.0, 0.5)),
];

pub const BURST_RAYS: u32 = 12;
pub const BURST_STEPS: u32 = 60;
pub const BURST_RADIUS: f32 = 0.45;
pub const BURST_STEP_MS: u64 = 30;

/// The dots of one step of the hue blast, one per axis.
pub fn blast_step(step: u32) -> impl Iterator<Item = DrawCommand> {
    let t = step as f32 / BLAST_STEPS as f32;
    let color = Color::hsl(step as f32 * 3.6, 100.0, 50.0);
    let thickness = 10.0 + step as f32 * 0.5;
    BLAST_AXES
        .into_iter()
        .map(move |(start, end)| DrawCommand::dot(math::lerp(start, end, t), color, thickness))
}

pub async fn directional_hue_blast(ctx: &mut DrawContext<'_>) -> Step {
    for step in 0..BLAST_STEPS {
        ctx.begin_unit()?;
        for cmd in blast_step(step) {
            ctx.send(&cmd)?;
        }
        ctx.pace(BLAST_STEP_MS).await;
    }
    Ok(())
}

/// The ray tips of one step of the radial burst.
pub fn burst_step(step: u32) -> impl Iterator<Item = DrawCommand> {
    let radius = BURST_RADIUS * step as f32 / BURST_STEPS as f32;
    let color = Color::hsl(step as f32 * 6.0, 100.0, 50.0);
    let thickness = 4.0 + step as f32 * 0.1;
    (0..BURST_RAYS).map(move |ray| {
        let angle = ray as f32 / BURST_RAYS as f32 * std::f32::consts::TAU;
        DrawCommand::dot(math::polar(CENTER, angle, radius), color, thickness)
    })
}

/// Twelve rays growing out of the centre, starting one step away from it.
pub async fn radial_burst(ctx: &mut DrawContext<'_>) -> Step {
    for step in 1..=BURST_STEPS {
        ctx.begin_unit()?;
        for cmd in burst_step(step) {
            ctx.send(&cmd)?;
        }
        ctx.pace(BURST_STEP_MS).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DrawConfig;
    use crate::notify::TracingNotifier;
    use crate::pipeline::{CancelToken, Collaborators};
    use crate::sinks::{AlwaysOpen, RecordingSink};
    use crate::timer::InstantTimer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_blast_step_positions_and_style() {
        let dots: Vec<_> = blast_step(50).collect();
        assert_eq!(dots.len(), 4);
        assert!((dots[0].start - Vec2::new(0.5, 0.5)).length() < 1e-6);
        assert_eq!(dots[0].thickness, 35.0);
        let hue = dots[0].color.hue().unwrap();
        assert!((hue - 180.0).abs() < 1e-3);
    }

    #[tokio::test]
    async fn test_radial_burst_never_repeats_a_dot() {
        let sink = std::sync::Arc::new(RecordingSink::new());
        let collaborators = Collaborators {
            sink: sink.clone(),
            gate: std::sync::Arc::new(AlwaysOpen),
            notifier: std::sync::Arc::new(TracingNotifier),
            timer: std::sync::Arc::new(InstantTimer),
        };
        let token = CancelToken::new();
        let mut ctx = DrawContext::new(
            &collaborators,
            &token,
            &DrawConfig::default(),
            StdRng::seed_from_u64(0),
        );

        radial_burst(&mut ctx).await.unwrap();

        let commands = sink.commands();
        assert_eq!(commands.len(), (BURST_STEPS * BURST_RAYS) as usize);
        assert!(commands.iter().all(|c| (c.start - CENTER).length() > 1e-4));
        for (i, a) in commands.iter().enumerate() {
            assert!(commands[i + 1..].iter().all(|b| (a.start - b.start).length() > 1e-6));
        }
    }

    #[test]
    fn test_burst_rays_stay_in_radius() {
        for cmd in burst_step(BURST_STEPS) {
            let r = (cmd.start - CENTER).length();
            assert!((r - BURST_RADIUS).abs() < 1e-4);
        }
    }
}
