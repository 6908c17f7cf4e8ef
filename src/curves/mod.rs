//! Space-filling curve traversals over a 2D grid.
//!
//! A traversal visits every cell of a `height x width` grid exactly once, in
//! a deterministic order. The run-length codec consumes this order to turn a
//! 2D channel into a 1D stream whose neighbours are (mostly) spatial
//! neighbours too.
//!
//! Both variants subdivide the grid into quadrants at its midpoints and are
//! expanded lazily from an explicit stack of pending regions, so a traversal
//! never recurses and never holds more than a few frames per subdivision
//! level.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CurveRleError;

pub mod hilbert;
pub mod morton;

pub use hilbert::HilbertCurve;
pub use morton::MortonCurve;

//==================================================================================
// 1. Coordinates & Regions
//==================================================================================

/// A grid cell, addressed as `(row, col)` with the origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The `[row, col]` index used by `ndarray`.
    pub const fn index(self) -> [usize; 2] {
        [self.row, self.col]
    }
}

/// A half-open rectangle `[top, bottom) x [left, right)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Region {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

/// The four quadrants of a split region, in `Region::quadrants` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Quadrant {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Region {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            top: 0,
            bottom: height,
            left: 0,
            right: width,
        }
    }

    pub fn area(&self) -> usize {
        (self.bottom - self.top) * (self.right - self.left)
    }

    pub fn is_empty(&self) -> bool {
        self.area() == 0
    }

    pub fn origin(&self) -> Coord {
        Coord::new(self.top, self.left)
    }

    /// Bisects at the vertical and horizontal midpoints. When a side has odd
    /// length the bottom/right half gets the extra cell; a side of length 1
    /// leaves the top/left half empty.
    pub fn quadrants(&self) -> [Region; 4] {
        let mid_row = self.top + (self.bottom - self.top) / 2;
        let mid_col = self.left + (self.right - self.left) / 2;
        let quad = |top, bottom, left, right| Region {
            top,
            bottom,
            left,
            right,
        };
        [
            quad(self.top, mid_row, self.left, mid_col),
            quad(self.top, mid_row, mid_col, self.right),
            quad(mid_row, self.bottom, self.left, mid_col),
            quad(mid_row, self.bottom, mid_col, self.right),
        ]
    }
}

//==================================================================================
// 2. The Linear Mapping Contract
//==================================================================================

/// The contract shared by every traversal generator.
pub trait LinearMapping {
    /// Starts a fresh traversal of a `height x width` grid, discarding any
    /// traversal in progress.
    fn reset(&mut self, height: usize, width: usize);

    /// Returns the next unvisited cell, or `None` once every cell has been
    /// produced. Keeps returning `None` after exhaustion.
    fn next_coord(&mut self) -> Option<Coord>;

    /// True once `next_coord` has nothing left to produce.
    fn is_exhausted(&self) -> bool;
}

//==================================================================================
// 3. Curve Selection
//==================================================================================

/// Selects a traversal variant.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// **Default:** consecutive cells are grid-adjacent on square power-of-two grids.
    #[default]
    Hilbert,
    /// Z-order. Cheaper bookkeeping, but no adjacency guarantee.
    Morton,
}

impl CurveKind {
    /// Builds an idle generator of this kind. Call `reset` before use.
    pub fn build(self) -> Curve {
        match self {
            CurveKind::Hilbert => Curve::Hilbert(HilbertCurve::new()),
            CurveKind::Morton => Curve::Morton(MortonCurve::new()),
        }
    }
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveKind::Hilbert => write!(f, "hilbert"),
            CurveKind::Morton => write!(f, "morton"),
        }
    }
}

impl FromStr for CurveKind {
    type Err = CurveRleError;

    /// Accepts the curve name (any case) or a numeric selector (`0` Hilbert,
    /// `1` Morton).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hilbert" | "0" => Ok(CurveKind::Hilbert),
            "morton" | "z-order" | "zorder" | "1" => Ok(CurveKind::Morton),
            _ => Err(CurveRleError::UnknownCurve(s.to_string())),
        }
    }
}

/// A traversal generator of either kind.
#[derive(Debug, Clone)]
pub enum Curve {
    Hilbert(HilbertCurve),
    Morton(MortonCurve),
}

impl Curve {
    pub fn kind(&self) -> CurveKind {
        match self {
            Curve::Hilbert(_) => CurveKind::Hilbert,
            Curve::Morton(_) => CurveKind::Morton,
        }
    }
}

impl LinearMapping for Curve {
    fn reset(&mut self, height: usize, width: usize) {
        match self {
            Curve::Hilbert(c) => c.reset(height, width),
            Curve::Morton(c) => c.reset(height, width),
        }
    }

    fn next_coord(&mut self) -> Option<Coord> {
        match self {
            Curve::Hilbert(c) => c.next_coord(),
            Curve::Morton(c) => c.next_coord(),
        }
    }

    fn is_exhausted(&self) -> bool {
        match self {
            Curve::Hilbert(c) => c.is_exhausted(),
            Curve::Morton(c) => c.is_exhausted(),
        }
    }
}

impl Iterator for Curve {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        self.next_coord()
    }
}

//==================================================================================
// 4. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn traversal(kind: CurveKind, height: usize, width: usize) -> Vec<Coord> {
        let mut curve = kind.build();
        curve.reset(height, width);
        curve.by_ref().collect()
    }

    #[test]
    fn test_curve_kind_from_str() {
        assert_eq!("hilbert".parse::<CurveKind>().unwrap(), CurveKind::Hilbert);
        assert_eq!(" Morton ".parse::<CurveKind>().unwrap(), CurveKind::Morton);
        assert_eq!("0".parse::<CurveKind>().unwrap(), CurveKind::Hilbert);
        assert_eq!("1".parse::<CurveKind>().unwrap(), CurveKind::Morton);
        assert!(matches!(
            "peano".parse::<CurveKind>(),
            Err(CurveRleError::UnknownCurve(s)) if s == "peano"
        ));
    }

    #[test]
    fn test_curve_kind_display_roundtrips_through_from_str() {
        for kind in [CurveKind::Hilbert, CurveKind::Morton] {
            assert_eq!(kind.to_string().parse::<CurveKind>().unwrap(), kind);
            assert_eq!(kind.build().kind(), kind);
        }
    }

    #[test]
    fn test_region_quadrants_partition_odd_sizes() {
        let region = Region::new(3, 5);
        let quads = region.quadrants();
        assert_eq!(quads.iter().map(Region::area).sum::<usize>(), 15);
        assert_eq!(
            quads[Quadrant::TopLeft as usize],
            Region { top: 0, bottom: 1, left: 0, right: 2 }
        );
        assert_eq!(
            quads[Quadrant::BottomRight as usize],
            Region { top: 1, bottom: 3, left: 2, right: 5 }
        );
    }

    #[test]
    fn test_unreset_curve_is_exhausted() {
        let mut curve = CurveKind::Morton.build();
        assert!(curve.is_exhausted());
        assert_eq!(curve.next_coord(), None);
    }

    proptest! {
        #[test]
        fn prop_traversal_is_bijection(
            height in 0usize..40,
            width in 0usize..40,
            morton in any::<bool>(),
        ) {
            let kind = if morton { CurveKind::Morton } else { CurveKind::Hilbert };
            let coords = traversal(kind, height, width);
            prop_assert_eq!(coords.len(), height * width);

            let unique: HashSet<Coord> = coords.iter().copied().collect();
            prop_assert_eq!(unique.len(), height * width);
            prop_assert!(coords.iter().all(|c| c.row < height && c.col < width));
        }

        #[test]
        fn prop_traversal_is_deterministic(height in 0usize..24, width in 0usize..24) {
            for kind in [CurveKind::Hilbert, CurveKind::Morton] {
                prop_assert_eq!(traversal(kind, height, width), traversal(kind, height, width));
            }
        }
    }
}
