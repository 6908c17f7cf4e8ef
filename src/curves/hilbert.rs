//! The Hilbert traversal.
//!
//! Each region is split into four quadrants and visited in an order chosen by
//! its orientation mode. The mode names describe the shape the four quadrant
//! centres trace on screen (rows grow downwards):
//!
//! | mode | visiting order (child mode)          |
//! |------|--------------------------------------|
//! | `U`  | TL (`]`), BL (`U`), BR (`U`), TR (`C`) |
//! | `C`  | BR (`n`), BL (`C`), TL (`C`), TR (`U`) |
//! | `n`  | BR (`C`), TR (`n`), TL (`n`), BL (`]`) |
//! | `]`  | TL (`U`), TR (`]`), BR (`]`), BL (`n`) |
//!
//! The root region starts in mode `U`. On square power-of-two grids every
//! step of the traversal moves exactly one cell along exactly one axis.

use super::{Coord, LinearMapping, Quadrant, Region};

use Quadrant::{BottomLeft, BottomRight, TopLeft, TopRight};

/// Orientation of a Hilbert sub-curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// `U`
    Up,
    /// `C`
    Left,
    /// `n`
    Down,
    /// `]`
    Right,
}

impl Mode {
    /// The quadrant visiting order for this mode, with the mode of each child.
    const fn visit_order(self) -> [(Quadrant, Mode); 4] {
        match self {
            Mode::Up => [
                (TopLeft, Mode::Right),
                (BottomLeft, Mode::Up),
                (BottomRight, Mode::Up),
                (TopRight, Mode::Left),
            ],
            Mode::Left => [
                (BottomRight, Mode::Down),
                (BottomLeft, Mode::Left),
                (TopLeft, Mode::Left),
                (TopRight, Mode::Up),
            ],
            Mode::Down => [
                (BottomRight, Mode::Left),
                (TopRight, Mode::Down),
                (TopLeft, Mode::Down),
                (BottomLeft, Mode::Right),
            ],
            Mode::Right => [
                (TopLeft, Mode::Up),
                (TopRight, Mode::Right),
                (BottomRight, Mode::Right),
                (BottomLeft, Mode::Down),
            ],
        }
    }
}

/// Lazily generated Hilbert traversal.
///
/// The stack only ever holds non-empty regions, so the traversal is exhausted
/// exactly when the stack is empty.
#[derive(Debug, Clone, Default)]
pub struct HilbertCurve {
    stack: Vec<(Region, Mode)>,
}

impl HilbertCurve {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LinearMapping for HilbertCurve {
    fn reset(&mut self, height: usize, width: usize) {
        self.stack.clear();
        let root = Region::new(height, width);
        if !root.is_empty() {
            self.stack.push((root, Mode::Up));
        }
    }

    fn next_coord(&mut self) -> Option<Coord> {
        while let Some((region, mode)) = self.stack.pop() {
            if region.area() == 1 {
                return Some(region.origin());
            }
            let quads = region.quadrants();
            // Pushed in reverse so the first quadrant is popped first.
            for &(quadrant, child_mode) in mode.visit_order().iter().rev() {
                let sub = quads[quadrant as usize];
                if !sub.is_empty() {
                    self.stack.push((sub, child_mode));
                }
            }
        }
        None
    }

    fn is_exhausted(&self) -> bool {
        self.stack.is_empty()
    }
}

impl Iterator for HilbertCurve {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        self.next_coord()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traverse(height: usize, width: usize) -> Vec<Coord> {
        let mut curve = HilbertCurve::new();
        curve.reset(height, width);
        curve.by_ref().collect()
    }

    fn as_pairs(coords: &[Coord]) -> Vec<(usize, usize)> {
        coords.iter().map(|c| (c.row, c.col)).collect()
    }

    #[test]
    fn test_hilbert_4x4_exact_order() {
        #[rustfmt::skip]
        let expected = vec![
            (0, 0), (0, 1), (1, 1), (1, 0),
            (2, 0), (3, 0), (3, 1), (2, 1),
            (2, 2), (3, 2), (3, 3), (2, 3),
            (1, 3), (1, 2), (0, 2), (0, 3),
        ];
        assert_eq!(as_pairs(&traverse(4, 4)), expected);
    }

    #[test]
    fn test_hilbert_2x2_is_a_u() {
        assert_eq!(as_pairs(&traverse(2, 2)), vec![(0, 0), (1, 0), (1, 1), (0, 1)]);
    }

    #[test]
    fn test_hilbert_locality_on_power_of_two_squares() {
        for side in [1usize, 2, 4, 8, 16, 32, 64] {
            let coords = traverse(side, side);
            assert_eq!(coords.len(), side * side);
            for pair in coords.windows(2) {
                let dr = pair[0].row.abs_diff(pair[1].row);
                let dc = pair[0].col.abs_diff(pair[1].col);
                assert_eq!(
                    dr + dc,
                    1,
                    "non-adjacent step {:?} -> {:?} at side {}",
                    pair[0],
                    pair[1],
                    side
                );
            }
        }
    }

    #[test]
    fn test_hilbert_non_square_grid() {
        assert_eq!(
            as_pairs(&traverse(2, 3)),
            vec![(0, 0), (1, 0), (1, 1), (1, 2), (0, 2), (0, 1)]
        );
    }

    #[test]
    fn test_hilbert_zero_area_and_single_cell() {
        assert!(traverse(0, 4).is_empty());
        assert!(traverse(4, 0).is_empty());
        assert_eq!(as_pairs(&traverse(1, 1)), vec![(0, 0)]);
    }

    #[test]
    fn test_hilbert_exhaustion_is_idempotent() {
        let mut curve = HilbertCurve::new();
        curve.reset(2, 2);
        assert!(!curve.is_exhausted());
        for _ in 0..4 {
            assert!(curve.next_coord().is_some());
        }
        assert!(curve.is_exhausted());
        assert_eq!(curve.next_coord(), None);
        assert_eq!(curve.next_coord(), None);
    }

    #[test]
    fn test_hilbert_reset_mid_traversal() {
        let mut curve = HilbertCurve::new();
        curve.reset(8, 8);
        curve.next_coord();
        curve.next_coord();
        curve.reset(4, 4);
        let coords: Vec<Coord> = curve.by_ref().collect();
        assert_eq!(coords, traverse(4, 4));
    }
}
