//! # Palette Reduction
//!
//! K-means over the distinct colours of an image, weighted by how many pixels
//! carry each colour. The generator is seeded, so an image always maps to the
//! same palette.

use image::RgbImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

pub const MAX_COLORS: usize = 16;

const SEED: u64 = 42;
const MAX_ITERATIONS: usize = 32;

/// The reduced colours of an image and the entry each pixel maps to.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    pub colors: Vec<[u8; 3]>,
    /// Palette index of every pixel, row-major.
    pub labels: Vec<usize>,
}

impl Palette {
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

struct Sample {
    color: [u8; 3],
    point: [f32; 3],
    weight: f32,
}

fn distance_sq(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn nearest(point: &[f32; 3], centers: &[[f32; 3]]) -> usize {
    centers
        .iter()
        .enumerate()
        .map(|(i, c)| (i, distance_sq(point, c)))
        .fold((0, f32::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
        .0
}

/// k-means++ seeding; every pick is a distinct input colour.
fn seed_centers(samples: &[Sample], k: usize, rng: &mut StdRng) -> Vec<[f32; 3]> {
    let mut centers = vec![samples[rng.gen_range(0..samples.len())].point];
    while centers.len() < k {
        let weights: Vec<f32> = samples
            .iter()
            .map(|s| distance_sq(&s.point, &centers[nearest(&s.point, &centers)]))
            .collect();
        let total: f32 = weights.iter().sum();
        if total <= 0.0 {
            break;
        }
        let mut target = rng.gen_range(0.0..total);
        let pick = weights
            .iter()
            .position(|&w| {
                target -= w;
                target < 0.0 && w > 0.0
            })
            .or_else(|| weights.iter().rposition(|&w| w > 0.0));
        match pick {
            Some(index) => centers.push(samples[index].point),
            None => break,
        }
    }
    centers
}

/// Reduces `image` to at most `max_colors` colours (clamped to `1..=16`).
///
/// An image with fewer distinct colours than requested keeps exactly those.
pub fn quantize(image: &RgbImage, max_colors: usize) -> Palette {
    let mut counts: HashMap<[u8; 3], usize> = HashMap::new();
    for pixel in image.pixels() {
        *counts.entry(pixel.0).or_default() += 1;
    }
    if counts.is_empty() {
        return Palette {
            colors: Vec::new(),
            labels: Vec::new(),
        };
    }

    let mut samples: Vec<Sample> = counts
        .into_iter()
        .map(|(color, count)| Sample {
            color,
            point: color.map(f32::from),
            weight: count as f32,
        })
        .collect();
    samples.sort_by_key(|s| s.color);

    let k = max_colors.clamp(1, MAX_COLORS).min(samples.len());
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut centers = seed_centers(&samples, k, &mut rng);
    let mut assignment: Vec<usize> = samples.iter().map(|s| nearest(&s.point, &centers)).collect();

    for iteration in 0..MAX_ITERATIONS {
        let mut sums = vec![[0.0f32; 3]; centers.len()];
        let mut weights = vec![0.0f32; centers.len()];
        for (sample, &cluster) in samples.iter().zip(&assignment) {
            for (sum, value) in sums[cluster].iter_mut().zip(sample.point) {
                *sum += value * sample.weight;
            }
            weights[cluster] += sample.weight;
        }
        for ((center, sum), weight) in centers.iter_mut().zip(&sums).zip(&weights) {
            if *weight > 0.0 {
                *center = sum.map(|s| s / weight);
            }
        }

        let next: Vec<usize> = samples.iter().map(|s| nearest(&s.point, &centers)).collect();
        if next == assignment {
            tracing::trace!(iteration, clusters = centers.len(), "k-means converged");
            break;
        }
        assignment = next;
    }

    let by_color: HashMap<[u8; 3], usize> = samples
        .iter()
        .zip(&assignment)
        .map(|(s, &cluster)| (s.color, cluster))
        .collect();

    Palette {
        colors: centers
            .iter()
            .map(|c| c.map(|v| v.round().clamp(0.0, 255.0) as u8))
            .collect(),
        labels: image
            .pixels()
            .map(|p| by_color.get(&p.0).copied().unwrap_or(0))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn stripes(colors: &[[u8; 3]], width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, _| {
            Rgb(colors[x as usize * colors.len() / width as usize])
        })
    }

    #[test]
    fn test_few_colours_are_kept_exactly() {
        let colors = [[255, 0, 0], [0, 128, 0], [10, 20, 200]];
        let image = stripes(&colors, 9, 4);

        let palette = quantize(&image, 8);

        assert_eq!(palette.len(), 3);
        let mut found = palette.colors.clone();
        found.sort();
        let mut expected = colors.to_vec();
        expected.sort();
        assert_eq!(found, expected);
        for (pixel, &label) in image.pixels().zip(&palette.labels) {
            assert_eq!(palette.colors[label], pixel.0);
        }
    }

    #[test]
    fn test_palette_never_exceeds_limit() {
        let image = RgbImage::from_fn(32, 32, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 90]));

        for max_colors in [1, 4, 16, 40] {
            let palette = quantize(&image, max_colors);
            assert_eq!(palette.len(), max_colors.clamp(1, MAX_COLORS));
            assert_eq!(palette.labels.len(), 32 * 32);
            assert!(palette.labels.iter().all(|&l| l < palette.len()));
        }
    }

    #[test]
    fn test_close_shades_merge() {
        let colors = [[250, 10, 10], [245, 5, 12], [10, 10, 250], [5, 14, 245]];
        let image = stripes(&colors, 8, 2);

        let palette = quantize(&image, 2);

        assert_eq!(palette.len(), 2);
        assert_eq!(palette.labels[0], palette.labels[2]);
        assert_eq!(palette.labels[4], palette.labels[6]);
        assert_ne!(palette.labels[0], palette.labels[4]);
    }
}
