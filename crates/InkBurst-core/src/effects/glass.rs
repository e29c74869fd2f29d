//! Pulsating stained glass.
//!
//! The surface is cut into a grid of cells. Each cell is outlined once, then
//! re-coloured every frame with a lightness that oscillates on its own phase
//! and speed.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;
use stroke_canvas::math::midpoint;
use stroke_canvas::{Color, DrawCommand, Rect, render::RenderList};

use crate::pipeline::{DrawContext, Step};

pub const FRAMES: u32 = 150;
pub const FRAME_MS: u64 = 50;
pub const OUTLINE_MS: u64 = 5;
pub const OUTLINE_COLOR: Color = Color::Rgb([40, 40, 40]);
pub const OUTLINE_THICKNESS: f32 = 3.0;
pub const FILL_THICKNESS: f32 = OUTLINE_THICKNESS * 3.0 + 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellShape {
    Rectangle,
    /// Two triangles split along a diagonal; `flipped` picks the other one.
    DiagonalSplit { flipped: bool },
    /// Four triangles meeting in the cell centre.
    StarFan,
}

impl CellShape {
    pub fn random(rng: &mut impl Rng) -> Self {
        let roll: f32 = rng.gen_range(0.0..1.0);
        if roll < 0.33 {
            CellShape::Rectangle
        } else if roll < 0.66 {
            CellShape::DiagonalSplit {
                flipped: rng.gen_bool(0.5),
            }
        } else {
            CellShape::StarFan
        }
    }

    /// Point list of the cell; consecutive triples form triangles.
    pub fn points(&self, bounds: &Rect) -> Vec<Vec2> {
        let tl = bounds.min;
        let br = bounds.max;
        let tr = Vec2::new(br.x, tl.y);
        let bl = Vec2::new(tl.x, br.y);
        match self {
            // Only the first three corners form a full triangle.
            CellShape::Rectangle => vec![tl, tr, br, bl],
            CellShape::DiagonalSplit { flipped: false } => vec![tl, tr, br, tl, bl, br],
            CellShape::DiagonalSplit { flipped: true } => vec![tl, tr, bl, tr, br, bl],
            CellShape::StarFan => {
                let c = bounds.center();
                vec![tl, tr, c, tr, br, c, br, bl, c, bl, tl, c]
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlassCell {
    pub points: Vec<Vec2>,
    pub hue: f32,
    pub phase: f32,
    pub speed: f32,
}

impl GlassCell {
    pub fn triangles(&self) -> impl Iterator<Item = [Vec2; 3]> + '_ {
        self.points.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    pub fn lightness(&self, frame: u32) -> f32 {
        40.0 + 20.0 * (self.phase + frame as f32 * self.speed).sin()
    }

    pub fn outline(&self) -> RenderList {
        self.triangles()
            .flat_map(|[a, b, c]| {
                [(a, b), (b, c), (c, a)]
                    .map(|(s, e)| DrawCommand::line(s, e, OUTLINE_COLOR, OUTLINE_THICKNESS))
            })
            .collect()
    }

    /// Fill strokes for one animation frame.
    pub fn fill(&self, frame: u32) -> RenderList {
        let color = Color::hsl(self.hue, 80.0, self.lightness(frame));
        self.triangles()
            .flat_map(|[p1, p2, p3]| {
                [
                    DrawCommand::line(midpoint(p1, p2), p3, color, FILL_THICKNESS),
                    DrawCommand::line(midpoint(p2, p3), p1, color, FILL_THICKNESS),
                ]
            })
            .collect()
    }
}

/// A `cols x rows` grid of random cells, row-major.
pub fn build_cells(rng: &mut impl Rng, cols: usize, rows: usize) -> Vec<GlassCell> {
    let size = Vec2::new(1.0 / cols as f32, 1.0 / rows as f32);
    let mut cells = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let bounds = Rect::new(Vec2::new(col as f32, row as f32) * size, size);
            let shape = CellShape::random(rng);
            cells.push(GlassCell {
                points: shape.points(&bounds),
                hue: rng.gen_range(0.0..360.0),
                phase: rng.gen_range(0.0..TAU),
                speed: rng.gen_range(0.05..0.15),
            });
        }
    }
    cells
}

pub async fn draw_outlines(ctx: &mut DrawContext<'_>, cells: &[GlassCell]) -> Step {
    for cell in cells {
        for triangle in cell.outline().chunks(3) {
            for edge in triangle {
                ctx.send(edge)?;
            }
            ctx.pace(OUTLINE_MS).await;
        }
    }
    Ok(())
}

pub async fn animate(ctx: &mut DrawContext<'_>, cells: &[GlassCell], frames: u32) -> Step {
    for frame in 0..frames {
        ctx.begin_unit()?;
        for cell in cells {
            for stroke in cell.fill(frame) {
                ctx.send(&stroke)?;
            }
        }
        ctx.pace(FRAME_MS).await;
    }
    Ok(())
}

pub async fn pulsating_stained_glass(ctx: &mut DrawContext<'_>) -> Step {
    let (cols, rows) = {
        let rng = ctx.rng();
        (rng.gen_range(5..=8), rng.gen_range(4..=6))
    };
    let cells = build_cells(ctx.rng(), cols, rows);
    tracing::debug!(cols, rows, "Built stained glass grid");

    draw_outlines(ctx, &cells).await?;
    animate(ctx, &cells, FRAMES).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_triangle_counts_per_shape() {
        let bounds = Rect::from_bounds(0.0, 0.0, 0.2, 0.25);
        let count = |shape: CellShape| {
            GlassCell {
                points: shape.points(&bounds),
                hue: 0.0,
                phase: 0.0,
                speed: 0.1,
            }
            .triangles()
            .count()
        };
        assert_eq!(count(CellShape::Rectangle), 1);
        assert_eq!(count(CellShape::DiagonalSplit { flipped: true }), 2);
        assert_eq!(count(CellShape::StarFan), 4);
    }

    #[test]
    fn test_lightness_oscillates_in_range() {
        let cell = GlassCell {
            points: Vec::new(),
            hue: 10.0,
            phase: 1.0,
            speed: 0.1,
        };
        assert!((cell.lightness(0) - (40.0 + 20.0 * 1.0f32.sin())).abs() < 1e-5);
        for frame in 0..FRAMES {
            let l = cell.lightness(frame);
            assert!((20.0..=60.0).contains(&l));
        }
    }

    #[test]
    fn test_grid_covers_surface() {
        let mut rng = StdRng::seed_from_u64(5);
        let cells = build_cells(&mut rng, 6, 4);
        assert_eq!(cells.len(), 24);
        let last = cells.last().unwrap();
        assert!(last.points.iter().any(|p| (*p - Vec2::ONE).length() < 1e-5));
    }
}
