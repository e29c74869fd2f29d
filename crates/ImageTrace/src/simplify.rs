//! # Outline Simplification
//!
//! Douglas-Peucker reduction of traced outlines. Pixel contours have a point
//! for every boundary pixel; after simplification straight runs collapse to
//! their end points.

use glam::Vec2;

/// Length of the closed outline through `points`.
pub fn perimeter(points: &[Vec2]) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }
    let open: f32 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    open + points[points.len() - 1].distance(points[0])
}

/// Distance from `p` to the line through `a` and `b`.
fn line_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let dir = b - a;
    let len = dir.length();
    if len <= f32::EPSILON {
        return p.distance(a);
    }
    dir.perp_dot(p - a).abs() / len
}

/// Simplifies an open polyline, keeping both end points.
pub fn douglas_peucker(points: &[Vec2], epsilon: f32) -> Vec<Vec2> {
    let n = points.len();
    if n <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;
    let mut ranges = vec![(0, n - 1)];

    while let Some((lo, hi)) = ranges.pop() {
        if hi <= lo + 1 {
            continue;
        }
        let (index, distance) = (lo + 1..hi)
            .map(|i| (i, line_distance(points[i], points[lo], points[hi])))
            .fold((lo, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        if distance > epsilon {
            keep[index] = true;
            ranges.push((lo, index));
            ranges.push((index, hi));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, kept)| kept.then_some(*p))
        .collect()
}

/// Simplifies a closed outline.
///
/// The outline is split at the point farthest from its first point and both
/// halves are reduced separately. The result does not repeat its first point.
pub fn simplify_closed(points: &[Vec2], epsilon: f32) -> Vec<Vec2> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let origin = points[0];
    let (far, distance) = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.distance(origin)))
        .fold((0, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
    if distance <= f32::EPSILON {
        return vec![origin];
    }

    let mut outline = douglas_peucker(&points[..=far], epsilon);
    let back: Vec<Vec2> = points[far..].iter().copied().chain([origin]).collect();
    let back = douglas_peucker(&back, epsilon);
    outline.extend_from_slice(&back[1..back.len() - 1]);
    outline
}

/// Segments that draw a simplified closed outline.
pub fn outline_segments(outline: &[Vec2]) -> Vec<(Vec2, Vec2)> {
    match outline {
        [] | [_] => Vec::new(),
        [a, b] => vec![(*a, *b)],
        _ => outline
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain([(outline[outline.len() - 1], outline[0])])
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_outline() -> Vec<Vec2> {
        // The 12 boundary pixels of a 4x4 block, clockwise from the top-left.
        [
            (1, 1), (2, 1), (3, 1), (4, 1), (4, 2), (4, 3),
            (4, 4), (3, 4), (2, 4), (1, 4), (1, 3), (1, 2),
        ]
        .iter()
        .map(|&(x, y)| Vec2::new(x as f32, y as f32))
        .collect()
    }

    #[test]
    fn test_square_collapses_to_corners() {
        let points = square_outline();
        assert!((perimeter(&points) - 12.0).abs() < 1e-5);

        let simplified = simplify_closed(&points, 0.002 * perimeter(&points));

        assert_eq!(
            simplified,
            vec![
                Vec2::new(1.0, 1.0),
                Vec2::new(4.0, 1.0),
                Vec2::new(4.0, 4.0),
                Vec2::new(1.0, 4.0),
            ]
        );
        assert_eq!(outline_segments(&simplified).len(), 4);
    }

    #[test]
    fn test_small_wobble_is_flattened_and_spike_kept() {
        let wobble = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.1),
            Vec2::new(2.0, -0.1),
            Vec2::new(3.0, 0.0),
        ];
        assert_eq!(douglas_peucker(&wobble, 0.5), vec![wobble[0], wobble[3]]);

        let spike = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 2.4),
            Vec2::new(2.0, 5.0),
            Vec2::new(3.0, 0.0),
        ];
        assert_eq!(douglas_peucker(&spike, 0.5), vec![spike[0], spike[2], spike[3]]);
    }

    #[test]
    fn test_degenerate_outlines() {
        assert!(outline_segments(&simplify_closed(&[Vec2::ONE], 1.0)).is_empty());
        let pair = [Vec2::ZERO, Vec2::X];
        assert_eq!(outline_segments(&simplify_closed(&pair, 1.0)), vec![(Vec2::ZERO, Vec2::X)]);
        let same = [Vec2::ONE; 4];
        assert_eq!(simplify_closed(&same, 1.0), vec![Vec2::ONE]);
    }
}
