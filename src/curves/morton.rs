//! The Morton (Z-order) traversal: quadrants are always visited top-left,
//! top-right, bottom-left, bottom-right, with no orientation state.

use super::{Coord, LinearMapping, Region};

/// Lazily generated Morton traversal.
#[derive(Debug, Clone, Default)]
pub struct MortonCurve {
    stack: Vec<Region>,
}

impl MortonCurve {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LinearMapping for MortonCurve {
    fn reset(&mut self, height: usize, width: usize) {
        self.stack.clear();
        let root = Region::new(height, width);
        if !root.is_empty() {
            self.stack.push(root);
        }
    }

    fn next_coord(&mut self) -> Option<Coord> {
        while let Some(region) = self.stack.pop() {
            if region.area() == 1 {
                return Some(region.origin());
            }
            self.stack
                .extend(region.quadrants().into_iter().rev().filter(|q| !q.is_empty()));
        }
        None
    }

    fn is_exhausted(&self) -> bool {
        self.stack.is_empty()
    }
}

impl Iterator for MortonCurve {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        self.next_coord()
    }
}
