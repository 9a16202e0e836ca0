use serde::{Deserialize, Serialize};

use crate::core::coord::Coord;

/// An optional finite playable rectangle, inclusive on every side.
///
/// Without one the board is unbounded. With one, jumps may not leave it and rays stop at its
/// edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldBorder {
    pub left: i64,
    pub right: i64,
    pub bottom: i64,
    pub top: i64,
}

impl WorldBorder {
    pub fn new(left: i64, right: i64, bottom: i64, top: i64) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    #[inline]
    pub fn contains(&self, c: Coord) -> bool {
        c.x >= self.left && c.x <= self.right && c.y >= self.bottom && c.y <= self.top
    }

    /// Largest `k >= 0` such that `from + dir * k` is still inside.
    pub fn steps_inside(&self, from: Coord, dir: Coord) -> i64 {
        if !self.contains(from) {
            return 0;
        }
        let axis = |pos: i64, step: i64, lo: i64, hi: i64| -> Option<i64> {
            match step.signum() {
                1 => Some((hi - pos) / step),
                -1 => Some((pos - lo) / -step),
                _ => None,
            }
        };
        let kx = axis(from.x, dir.x, self.left, self.right);
        let ky = axis(from.y, dir.y, self.bottom, self.top);
        match (kx, ky) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_inside_respects_every_edge() {
        let b = WorldBorder::new(-10, 10, -5, 5);
        assert_eq!(b.steps_inside(Coord::ORIGIN, Coord::new(1, 0)), 10);
        assert_eq!(b.steps_inside(Coord::ORIGIN, Coord::new(-1, -1)), 5);
        assert_eq!(b.steps_inside(Coord::ORIGIN, Coord::new(2, 1)), 5);
        assert_eq!(b.steps_inside(Coord::new(3, 0), Coord::new(0, 2)), 2);
        assert_eq!(b.steps_inside(Coord::new(30, 0), Coord::new(-1, 0)), 0);
    }
}
