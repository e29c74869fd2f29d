//! # Fractal Bloom Mandala
//!
//! Trees of branching segments radiating from the centre. Each branch forks
//! into two children rotated by `±angle_step` and, sometimes, a shorter
//! middle child.
//!
//! Traversal is an explicit depth-first stack rather than recursion:
//! [`BranchWalker`] yields segments in the exact order a recursive
//! left/right/middle descent would draw them.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::{PI, TAU};
use stroke_canvas::math::{CENTER, polar};
use stroke_canvas::{Color, DrawCommand};

use crate::pipeline::{DrawContext, Step};

pub const SEGMENT_MS: u64 = 20;
pub const TREE_PAUSE_MS: u64 = SEGMENT_MS * 3;
/// Rotation applied per completed bloom or nova invocation.
pub const FRAME_ROTATION: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomParams {
    pub max_depth: u32,
    pub initial_length: f32,
    pub length_ratio: f32,
    pub min_length: f32,
    /// Probability of a middle branch.
    pub middle_chance: f64,
    pub middle_ratio: f32,
    pub base_thickness: f32,
}

impl Default for BloomParams {
    fn default() -> Self {
        Self {
            max_depth: 4,
            initial_length: 0.15,
            length_ratio: 0.65,
            min_length: 0.005,
            middle_chance: 0.4,
            middle_ratio: 0.8,
            base_thickness: 10.0,
        }
    }
}

/// One segment of a tree, with depth starting at 1 for the trunk.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Branch {
    pub origin: Vec2,
    pub angle: f32,
    pub length: f32,
    pub depth: u32,
    pub hue: f32,
}

impl Branch {
    pub fn end(&self) -> Vec2 {
        polar(self.origin, self.angle, self.length)
    }

    pub fn command(&self, params: &BloomParams) -> DrawCommand {
        let d = self.depth as f32;
        let thickness =
            (params.base_thickness * params.length_ratio.powi(self.depth as i32 - 1) * 2.0).max(1.0);
        let color = Color::hsl(self.hue + d * 20.0, 80.0 - d * 10.0, 60.0 - d * 8.0);
        DrawCommand::line(self.origin, self.end(), color, thickness)
    }
}

/// Depth-first iterator over the branches of one tree.
pub struct BranchWalker<R> {
    params: BloomParams,
    angle_step: f32,
    stack: Vec<Branch>,
    rng: R,
}

impl<R: Rng> BranchWalker<R> {
    pub fn new(trunk: Branch, params: BloomParams, angle_step: f32, rng: R) -> Self {
        let mut walker = Self {
            params,
            angle_step,
            stack: Vec::new(),
            rng,
        };
        walker.push(trunk);
        walker
    }

    fn push(&mut self, branch: Branch) {
        if branch.depth <= self.params.max_depth && branch.length >= self.params.min_length {
            self.stack.push(branch);
        }
    }
}

impl<R: Rng> Iterator for BranchWalker<R> {
    type Item = Branch;

    fn next(&mut self) -> Option<Branch> {
        let branch = self.stack.pop()?;
        let child = |angle: f32, length: f32| Branch {
            origin: branch.end(),
            angle,
            length,
            depth: branch.depth + 1,
            hue: branch.hue,
        };
        let length = branch.length * self.params.length_ratio;

        // Pushed in reverse so the left child is drawn first.
        if branch.depth + 1 < self.params.max_depth
            && self.rng.gen_bool(self.params.middle_chance)
        {
            self.push(child(branch.angle, length * self.params.middle_ratio));
        }
        self.push(child(branch.angle + self.angle_step, length));
        self.push(child(branch.angle - self.angle_step, length));

        Some(branch)
    }
}

pub async fn fractal_bloom_mandala(ctx: &mut DrawContext<'_>, frame: u64) -> Step {
    let params = BloomParams::default();
    let (trees, angle_step, base_hue) = {
        let rng = ctx.rng();
        let trees = rng.gen_range(6..=8);
        let angle_step = PI / rng.gen_range(3.0..5.0);
        (trees, angle_step, rng.gen_range(0.0..360.0))
    };
    let rotation = frame as f32 * FRAME_ROTATION;

    for i in 0..trees {
        ctx.begin_unit()?;
        let trunk = Branch {
            origin: CENTER,
            angle: i as f32 / trees as f32 * TAU + rotation,
            length: params.initial_length,
            depth: 1,
            hue: base_hue + i as f32 * (360.0 / trees as f32),
        };
        let walker = BranchWalker::new(trunk, params, angle_step, ctx.fork_rng());
        for branch in walker {
            ctx.send_paced(&branch.command(&params), SEGMENT_MS).await?;
        }
        ctx.pace(TREE_PAUSE_MS).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn trunk() -> Branch {
        Branch {
            origin: CENTER,
            angle: 0.0,
            length: 0.15,
            depth: 1,
            hue: 0.0,
        }
    }

    #[test]
    fn test_binary_tree_without_middle_branches() {
        let params = BloomParams {
            middle_chance: 0.0,
            ..BloomParams::default()
        };
        let branches: Vec<_> =
            BranchWalker::new(trunk(), params, PI / 4.0, StdRng::seed_from_u64(0)).collect();

        // 1 + 2 + 4 + 8 segments for depths 1..=4.
        assert_eq!(branches.len(), 15);
        for b in &branches {
            assert!(b.depth <= 4);
            let expected = 0.15 * 0.65f32.powi(b.depth as i32 - 1);
            assert!((b.length - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_depth_first_order() {
        let params = BloomParams {
            middle_chance: 0.0,
            ..BloomParams::default()
        };
        let step = PI / 4.0;
        let branches: Vec<_> =
            BranchWalker::new(trunk(), params, step, StdRng::seed_from_u64(0)).collect();

        assert_eq!(branches[0].depth, 1);
        assert_eq!(branches[1].depth, 2);
        assert!((branches[1].angle + step).abs() < 1e-6);
        assert_eq!(branches[2].depth, 3);
        assert_eq!(branches[1].origin, branches[0].end());
    }

    #[test]
    fn test_middle_branches_respect_depth_limit() {
        let params = BloomParams {
            middle_chance: 1.0,
            ..BloomParams::default()
        };
        let branches: Vec<_> =
            BranchWalker::new(trunk(), params, PI / 4.0, StdRng::seed_from_u64(0)).collect();

        // Middle children only below depth 3: 1 + 3 + 9 + 18.
        assert_eq!(branches.len(), 31);
        assert!(branches.iter().all(|b| b.depth <= 4));
    }

    #[test]
    fn test_thickness_floor() {
        let params = BloomParams::default();
        let deep = Branch {
            depth: 10,
            ..trunk()
        };
        assert_eq!(deep.command(&params).thickness, 1.0);
        assert_eq!(trunk().command(&params).thickness, 20.0);
    }
}
