//! Canvas chores: wiping the shared surface and replaying saved batches.

use glam::Vec2;
use stroke_canvas::{Color, CommandBatch, DrawCommand, render::RenderList};

use crate::pipeline::{DrawContext, Step};

pub const CLEAR_SWEEPS: usize = 5;
pub const CLEAR_THICKNESS: f32 = 2000.0;
pub const CLEAR_STEP_MS: u64 = 5;

/// Alternating horizontal and vertical eraser passes across the surface.
pub fn clear_strokes() -> RenderList {
    (0..=CLEAR_SWEEPS)
        .flat_map(|i| {
            let t = i as f32 / CLEAR_SWEEPS as f32;
            [
                DrawCommand::eraser(
                    Vec2::new(0.01, t),
                    Vec2::new(0.99, t),
                    Color::WHITE,
                    CLEAR_THICKNESS,
                ),
                DrawCommand::eraser(
                    Vec2::new(t, 0.01),
                    Vec2::new(t, 0.99),
                    Color::WHITE,
                    CLEAR_THICKNESS,
                ),
            ]
        })
        .collect()
}

pub async fn clear_canvas(ctx: &mut DrawContext<'_>) -> Step {
    ctx.begin_unit()?;
    for stroke in clear_strokes() {
        ctx.send_paced(&stroke, CLEAR_STEP_MS).await?;
    }
    Ok(())
}

/// Sends a saved batch as-is, pacing by the configured draw delay.
pub async fn replay(ctx: &mut DrawContext<'_>, batch: &CommandBatch) -> Step {
    let delay = ctx.draw_delay_ms();
    tracing::debug!(commands = batch.len(), delay_ms = delay, "Replaying batch");
    for cmd in &batch.commands {
        ctx.begin_unit()?;
        ctx.send_paced(cmd, delay).await?;
    }
    Ok(())
}
