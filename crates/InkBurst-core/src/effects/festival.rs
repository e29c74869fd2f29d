//! Color festival: a burst of small random shapes.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::{PI, TAU};
use stroke_canvas::math::polar;
use stroke_canvas::{Color, DrawCommand, render::RenderList};

use crate::pipeline::{DrawContext, Step};

pub const SHAPE_COUNT: usize = 120;
pub const STROKE_MS: u64 = 10;
pub const SHAPE_MS: u64 = 60;

const STAR_RAYS: usize = 8;
const SPIRAL_SEGMENTS: usize = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Hatch,
    Triangle,
    Star,
    Spiral,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Hatch,
        ShapeKind::Triangle,
        ShapeKind::Star,
        ShapeKind::Spiral,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub center: Vec2,
    pub brush: f32,
    pub color: Color,
    pub thickness: f32,
}

impl Shape {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            kind: ShapeKind::ALL[rng.gen_range(0..ShapeKind::ALL.len())],
            center: Vec2::new(rng.gen_range(0.1..=0.9), rng.gen_range(0.1..=0.9)),
            brush: rng.gen_range(0.03..0.11),
            color: Color::random_hsl(rng, 90.0, 55.0),
            thickness: rng.gen_range(4..14) as f32,
        }
    }

    /// The strokes of this shape, in drawing order.
    pub fn strokes(&self) -> RenderList {
        let Shape {
            center: c,
            brush: b,
            color,
            thickness,
            ..
        } = *self;
        let line = |start: Vec2, end: Vec2| DrawCommand::line(start, end, color, thickness);

        match self.kind {
            ShapeKind::Hatch => {
                // One line every half-thickness across a band of brush height.
                let step = thickness / 2.0;
                let mut strokes = RenderList::new();
                let mut j = 0.0;
                while j < b * 100.0 {
                    let y = c.y - b / 2.0 + j / 100.0;
                    strokes.push(line(Vec2::new(c.x - b / 2.0, y), Vec2::new(c.x + b / 2.0, y)));
                    j += step;
                }
                strokes
            }
            ShapeKind::Triangle => {
                let top = Vec2::new(c.x, c.y - b / 2.0);
                let left = Vec2::new(c.x - b / 2.0, c.y + b / 2.0);
                let right = Vec2::new(c.x + b / 2.0, c.y + b / 2.0);
                vec![line(top, left), line(left, right), line(right, top)]
            }
            ShapeKind::Star => (0..STAR_RAYS)
                .map(|k| {
                    let angle = k as f32 / STAR_RAYS as f32 * TAU;
                    line(c, polar(c, angle, b * 0.7))
                })
                .collect(),
            ShapeKind::Spiral => {
                let point = |k: usize| {
                    let t = k as f32 / SPIRAL_SEGMENTS as f32;
                    polar(c, t * 4.0 * PI, t * b)
                };
                (1..=SPIRAL_SEGMENTS)
                    .map(|k| line(point(k - 1), point(k)))
                    .collect()
            }
        }
    }
}

pub async fn color_festival(ctx: &mut DrawContext<'_>) -> Step {
    for _ in 0..SHAPE_COUNT {
        ctx.begin_unit()?;
        let shape = Shape::random(ctx.rng());
        for stroke in shape.strokes() {
            ctx.send_paced(&stroke, STROKE_MS).await?;
        }
        ctx.pace(SHAPE_MS).await;
    }
    Ok(())
}
