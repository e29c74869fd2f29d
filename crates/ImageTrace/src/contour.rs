//! # Contour Tracing
//!
//! Outer boundaries of the 8-connected regions of a binary mask, followed
//! with Moore-neighbourhood tracing. Regions sitting inside another region's
//! hole are not reported.

use glam::IVec2;

/// Neighbour offsets, clockwise on screen (y grows downward), starting east.
const NEIGHBOURS: [IVec2; 8] = [
    IVec2::new(1, 0),
    IVec2::new(1, 1),
    IVec2::new(0, 1),
    IVec2::new(-1, 1),
    IVec2::new(-1, 0),
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
];
const WEST: usize = 4;

/// A row-major grid of set and unset pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Mask {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl Mask {
    /// Builds a mask from row-major cells; missing cells read as unset.
    pub fn new(width: u32, height: u32, mut cells: Vec<bool>) -> Self {
        cells.resize((width * height) as usize, false);
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> bool) -> Self {
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self::new(width, height, cells)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, p: IVec2) -> Option<usize> {
        if p.x < 0 || p.y < 0 || p.x as u32 >= self.width || p.y as u32 >= self.height {
            return None;
        }
        Some(p.y as usize * self.width as usize + p.x as usize)
    }

    /// Out-of-bounds points are unset.
    pub fn get(&self, p: IVec2) -> bool {
        self.index(p).is_some_and(|i| self.cells[i])
    }
}

/// Background reachable from outside the mask through 4-connected steps,
/// on a grid padded by one cell on every side.
struct Outside {
    width: i32,
    cells: Vec<bool>,
}

impl Outside {
    fn new(mask: &Mask) -> Self {
        let width = mask.width as i32 + 2;
        let height = mask.height as i32 + 2;
        let mut cells = vec![false; (width * height) as usize];
        let mut stack = vec![IVec2::ZERO];
        cells[0] = true;

        while let Some(p) = stack.pop() {
            for dir in [0, 2, 4, 6] {
                let n = p + NEIGHBOURS[dir];
                if n.x < 0 || n.y < 0 || n.x >= width || n.y >= height {
                    continue;
                }
                let idx = (n.y * width + n.x) as usize;
                if !cells[idx] && !mask.get(n - IVec2::ONE) {
                    cells[idx] = true;
                    stack.push(n);
                }
            }
        }
        Self { width, cells }
    }

    /// `p` is in mask coordinates and may lie one cell past any edge.
    fn contains(&self, p: IVec2) -> bool {
        let q = p + IVec2::ONE;
        self.cells[(q.y * self.width + q.x) as usize]
    }
}

fn direction_of(offset: IVec2) -> Option<usize> {
    NEIGHBOURS.iter().position(|&n| n == offset)
}

/// First set neighbour of `current` clockwise after `back`, with the
/// backtrack direction as seen from that neighbour.
fn next_boundary(mask: &Mask, current: IVec2, back: usize) -> Option<(IVec2, usize)> {
    (1..=8).find_map(|i| {
        let dir = (back + i) % 8;
        let candidate = current + NEIGHBOURS[dir];
        if !mask.get(candidate) {
            return None;
        }
        let previous = current + NEIGHBOURS[(dir + 7) % 8];
        Some((candidate, direction_of(previous - candidate)?))
    })
}

/// Follows the boundary of the region whose top-left pixel is `start`.
fn trace(mask: &Mask, start: IVec2) -> Vec<IVec2> {
    let mut contour = vec![start];
    let Some(mut step) = next_boundary(mask, start, WEST) else {
        return contour;
    };
    let first = step.0;
    let limit = 4 * mask.cells.len() + 8;

    for _ in 0..limit {
        let (current, back) = step;
        let Some(next) = next_boundary(mask, current, back) else {
            break;
        };
        if current == start && next.0 == first {
            break;
        }
        contour.push(current);
        step = next;
    }
    contour
}

fn flood_region(mask: &Mask, start: IVec2, seen: &mut [bool]) {
    let mut stack = vec![start];
    while let Some(p) = stack.pop() {
        for offset in NEIGHBOURS {
            let n = p + offset;
            let Some(idx) = mask.index(n) else {
                continue;
            };
            if mask.cells[idx] && !seen[idx] {
                seen[idx] = true;
                stack.push(n);
            }
        }
    }
}

/// Outer contours of every region not enclosed by another region, in raster
/// order of their top-left pixel. Points are pixel coordinates.
pub fn external_contours(mask: &Mask) -> Vec<Vec<IVec2>> {
    let outside = Outside::new(mask);
    let mut seen = vec![false; mask.cells.len()];
    let mut contours = Vec::new();

    for y in 0..mask.height as i32 {
        for x in 0..mask.width as i32 {
            let start = IVec2::new(x, y);
            let Some(idx) = mask.index(start) else {
                continue;
            };
            if !mask.cells[idx] || seen[idx] {
                continue;
            }
            seen[idx] = true;
            flood_region(mask, start, &mut seen);

            // Nothing of the region lies above its top-left pixel, so the
            // cell above is either open background or inside an enclosing hole.
            if outside.contains(start - IVec2::Y) {
                contours.push(trace(mask, start));
            }
        }
    }
    contours
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: i32, max: i32) -> impl Fn(u32, u32) -> bool {
        move |x, y| {
            let (x, y) = (x as i32, y as i32);
            (min..=max).contains(&x) && (min..=max).contains(&y)
        }
    }

    #[test]
    fn test_square_boundary_is_walked_clockwise() {
        let mask = Mask::from_fn(6, 6, square(1, 4));

        let contours = external_contours(&mask);

        assert_eq!(contours.len(), 1);
        let contour = &contours[0];
        assert_eq!(contour.len(), 12);
        assert_eq!(contour[0], IVec2::new(1, 1));
        assert_eq!(contour[1], IVec2::new(2, 1));
        assert!(contour.iter().all(|p| p.x == 1 || p.x == 4 || p.y == 1 || p.y == 4));
        for pair in contour.windows(2) {
            let step = pair[1] - pair[0];
            assert!(step.x.abs() <= 1 && step.y.abs() <= 1);
        }
    }

    #[test]
    fn test_nested_region_is_skipped() {
        // A ring with a dot in its hole, and a separate blob on the right.
        let mask = Mask::from_fn(14, 9, |x, y| {
            let ring = square(0, 6)(x, y) && !square(1, 5)(x, y);
            let dot = x == 3 && y == 3;
            let blob = (10..=12).contains(&x) && (2..=3).contains(&y);
            ring || dot || blob
        });

        let contours = external_contours(&mask);

        assert_eq!(contours.len(), 2);
        assert_eq!(contours[0][0], IVec2::new(0, 0));
        assert_eq!(contours[1][0], IVec2::new(10, 2));
        assert!(contours.iter().flatten().all(|p| *p != IVec2::new(3, 3)));
    }

    #[test]
    fn test_single_pixel_and_diagonal_regions() {
        let dot = Mask::from_fn(3, 3, |x, y| x == 1 && y == 1);
        assert_eq!(external_contours(&dot), vec![vec![IVec2::new(1, 1)]]);

        let diagonal = Mask::from_fn(3, 3, |x, y| x == y);
        let contours = external_contours(&diagonal);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].first(), Some(&IVec2::new(0, 0)));
        assert!(contours[0].contains(&IVec2::new(2, 2)));
    }

    #[test]
    fn test_region_touching_the_edge() {
        let mask = Mask::from_fn(4, 4, |_, _| true);
        let contours = external_contours(&mask);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].len(), 12);
    }
}
