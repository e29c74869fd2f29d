//! Recursive star polygon nova.
//!
//! A `{n/skip}` star whose every corner hosts a smaller star, down to a fixed
//! depth. [`NovaWalker`] flattens the recursion into a stream of edges.

use glam::Vec2;
use rand::Rng;
use std::collections::VecDeque;
use std::f32::consts::{PI, TAU};
use stroke_canvas::math::{CENTER, polar};
use stroke_canvas::{Color, DrawCommand};

use crate::effects::bloom::FRAME_ROTATION;
use crate::pipeline::{DrawContext, Step};

pub const EDGE_MS: u64 = 15;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NovaParams {
    pub points: usize,
    pub skip: usize,
    pub radius: f32,
    pub max_depth: u32,
    pub scale: f32,
    pub min_radius: f32,
    pub thickness: f32,
    pub thickness_decay: f32,
    /// Added to every corner angle.
    pub rotation: f32,
    pub hue: f32,
}

impl Default for NovaParams {
    fn default() -> Self {
        Self {
            points: 5,
            skip: 2,
            radius: 0.25,
            max_depth: 3,
            scale: 0.4,
            min_radius: 0.005,
            thickness: 6.0,
            thickness_decay: 0.7,
            rotation: 0.0,
            hue: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Star {
    center: Vec2,
    radius: f32,
    depth: u32,
    thickness: f32,
    parent_angle: f32,
}

/// Yields the edges of every star, a star's own edges before its children.
pub struct NovaWalker {
    params: NovaParams,
    stack: Vec<Star>,
    pending: VecDeque<DrawCommand>,
}

impl NovaWalker {
    pub fn new(center: Vec2, params: NovaParams) -> Self {
        let mut walker = Self {
            params,
            stack: Vec::new(),
            pending: VecDeque::new(),
        };
        walker.push(Star {
            center,
            radius: params.radius,
            depth: 1,
            thickness: params.thickness,
            parent_angle: 0.0,
        });
        walker
    }

    fn push(&mut self, star: Star) {
        if star.depth <= self.params.max_depth && star.radius >= self.params.min_radius {
            self.stack.push(star);
        }
    }

    fn expand(&mut self, star: Star) {
        let NovaParams {
            points: n,
            skip,
            rotation,
            hue,
            ..
        } = self.params;
        let d = star.depth as f32;
        let color = Color::hsl(hue + d * 30.0, 95.0, 65.0 - d * 10.0);
        let thickness = star.thickness.max(1.0);

        let corners: Vec<Vec2> = (0..n)
            .map(|i| {
                let angle = i as f32 / n as f32 * TAU + star.parent_angle + rotation;
                polar(star.center, angle, star.radius)
            })
            .collect();

        for i in 0..n {
            self.pending.push_back(DrawCommand::line(
                corners[i],
                corners[(i + skip) % n],
                color,
                thickness,
            ));
        }

        for (i, corner) in corners.iter().enumerate().rev() {
            self.push(Star {
                center: *corner,
                radius: star.radius * self.params.scale,
                depth: star.depth + 1,
                thickness: thickness * self.params.thickness_decay,
                parent_angle: i as f32 / n as f32 * TAU + star.parent_angle + PI / n as f32,
            });
        }
    }
}

impl Iterator for NovaWalker {
    type Item = DrawCommand;

    fn next(&mut self) -> Option<DrawCommand> {
        loop {
            if let Some(edge) = self.pending.pop_front() {
                return Some(edge);
            }
            let star = self.stack.pop()?;
            self.expand(star);
        }
    }
}

pub async fn recursive_star_nova(ctx: &mut DrawContext<'_>, frame: u64) -> Step {
    let params = {
        let rng = ctx.rng();
        NovaParams {
            points: if rng.gen_bool(0.5) { 5 } else { 7 },
            hue: rng.gen_range(0.0..360.0),
            rotation: frame as f32 * FRAME_ROTATION,
            ..NovaParams::default()
        }
    };
    tracing::debug!(points = params.points, "Drawing star nova");

    ctx.begin_unit()?;
    for edge in NovaWalker::new(CENTER, params) {
        ctx.send_paced(&edge, EDGE_MS).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_count_for_three_levels() {
        let edges = NovaWalker::new(CENTER, NovaParams::default()).count();
        assert_eq!(edges, 5 * (1 + 5 + 25));

        let seven = NovaParams {
            points: 7,
            ..NovaParams::default()
        };
        assert_eq!(NovaWalker::new(CENTER, seven).count(), 7 * (1 + 7 + 49));
    }

    #[test]
    fn test_root_star_drawn_first() {
        let params = NovaParams::default();
        let edges: Vec<_> = NovaWalker::new(CENTER, params).take(6).collect();
        for edge in &edges[..5] {
            assert!(((edge.start - CENTER).length() - 0.25).abs() < 1e-5);
            assert_eq!(edge.thickness, 6.0);
        }
        // The first child star sits on the first corner.
        let child_center = polar(CENTER, 0.0, 0.25);
        assert!(((edges[5].start - child_center).length() - 0.1).abs() < 1e-5);
        assert!((edges[5].thickness - 4.2).abs() < 1e-5);
    }

    #[test]
    fn test_depth_colors() {
        let params = NovaParams {
            hue: 100.0,
            ..NovaParams::default()
        };
        let first = NovaWalker::new(CENTER, params).next().unwrap();
        assert_eq!(first.color.lightness(), Some(55.0));
        assert_eq!(first.color.hue(), Some(130.0));
    }
}
