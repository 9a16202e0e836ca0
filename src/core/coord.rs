use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A square on the unbounded board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    /// Largest absolute value either component may take. Line keys and ray offsets between
    /// in-range squares then stay well inside `i64`.
    pub const LIMIT: i64 = 1 << 53;

    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn in_range(self) -> bool {
        self.x.unsigned_abs() <= Self::LIMIT as u64 && self.y.unsigned_abs() <= Self::LIMIT as u64
    }

    #[inline]
    pub fn chebyshev_norm(self) -> i64 {
        self.x.abs().max(self.y.abs())
    }

    #[inline]
    pub fn chebyshev_distance(self, other: Coord) -> i64 {
        (other - self).chebyshev_norm()
    }

    /// Splits a non-zero vector into its lowest-terms step and the step count.
    ///
    /// `(4, -6)` becomes `((2, -3), 2)`.
    pub fn reduced(self) -> Option<(Coord, i64)> {
        let g = gcd(self.x, self.y);
        if g == 0 {
            return None;
        }
        Some((Coord::new(self.x / g, self.y / g), g))
    }

    /// Signed multiple `k` such that `self == dir * k`, if one exists.
    pub fn steps_along(self, dir: Coord) -> Option<i64> {
        if dir == Coord::ORIGIN {
            return None;
        }
        let k = if dir.x != 0 {
            if self.x % dir.x != 0 {
                return None;
            }
            self.x / dir.x
        } else {
            if self.x != 0 || self.y % dir.y != 0 {
                return None;
            }
            self.y / dir.y
        };
        (dir * k == self).then_some(k)
    }
}

/// Greatest common divisor of the absolute values; `gcd(0, 0) == 0`.
pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

impl Add for Coord {
    type Output = Coord;

    #[inline]
    fn add(self, rhs: Coord) -> Self::Output {
        Coord::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Coord {
    #[inline]
    fn add_assign(&mut self, rhs: Coord) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Coord {
    type Output = Coord;

    #[inline]
    fn sub(self, rhs: Coord) -> Self::Output {
        Coord::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Coord {
    type Output = Coord;

    #[inline]
    fn neg(self) -> Self::Output {
        Coord::new(-self.x, -self.y)
    }
}

impl Mul<i64> for Coord {
    type Output = Coord;

    #[inline]
    fn mul(self, rhs: i64) -> Coord {
        Coord {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a coordinate: {0:?}")]
pub struct ParseCoordError(pub String);

impl FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCoordError(s.to_string());
        let (x, y) = s.split_once(',').ok_or_else(err)?;
        let x = parse_int(x).ok_or_else(err)?;
        let y = parse_int(y).ok_or_else(err)?;
        let c = Coord::new(x, y);
        if !c.in_range() {
            return Err(err());
        }
        Ok(c)
    }
}

// Accepts an optional leading '-' and ASCII digits only ("+5" and " 5" are rejected).
fn parse_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// How a line `point + t * dir` meets the line `from + k * ray`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    /// The lines share no square.
    Apart,
    /// They cross on the square `from + ray * k`.
    At(i64),
    /// They are the same line.
    Along,
}

#[inline]
fn cross(a: (i128, i128), b: (i128, i128)) -> i128 {
    a.0 * b.1 - a.1 * b.0
}

/// Where the line through `point` along `dir` meets the line through `from` along `ray`.
///
/// Only lattice crossings count: both lines must pass through the square at whole steps.
pub fn crossing(from: Coord, ray: Coord, point: Coord, dir: Coord) -> Crossing {
    let w = (
        i128::from(point.x) - i128::from(from.x),
        i128::from(point.y) - i128::from(from.y),
    );
    let r = (i128::from(ray.x), i128::from(ray.y));
    let d = (i128::from(dir.x), i128::from(dir.y));
    let den = cross(r, d);
    if den == 0 {
        return if cross(w, r) == 0 {
            Crossing::Along
        } else {
            Crossing::Apart
        };
    }
    let (k, t) = (cross(w, d), cross(w, r));
    if k % den != 0 || t % den != 0 {
        return Crossing::Apart;
    }
    i64::try_from(k / den).map_or(Crossing::Apart, Crossing::At)
}

/// The 8 king steps around the origin.
pub const KING_STEPS: [Coord; 8] = [
    Coord { x: -1, y: -1 },
    Coord { x: -1, y: 0 },
    Coord { x: -1, y: 1 },
    Coord { x: 0, y: -1 },
    Coord { x: 0, y: 1 },
    Coord { x: 1, y: -1 },
    Coord { x: 1, y: 0 },
    Coord { x: 1, y: 1 },
];

/// The four line families used by the organized-line indices.
///
/// Every coordinate lies on exactly one line of each family. Two coordinates share a line iff
/// their keys are equal, so collinearity is a key comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LineKind {
    /// Key `y`.
    Row,
    /// Key `x`.
    Column,
    /// Key `y - x`, runs along `(1, 1)`.
    UpDiagonal,
    /// Key `y + x`, runs along `(1, -1)`.
    DownDiagonal,
}

impl LineKind {
    pub const ALL: [LineKind; 4] = [
        LineKind::Row,
        LineKind::Column,
        LineKind::UpDiagonal,
        LineKind::DownDiagonal,
    ];

    #[inline]
    pub fn key(self, c: Coord) -> i64 {
        match self {
            LineKind::Row => c.y,
            LineKind::Column => c.x,
            LineKind::UpDiagonal => c.y - c.x,
            LineKind::DownDiagonal => c.y + c.x,
        }
    }

    /// Position of `c` along its line, increasing by one per [`LineKind::step`].
    #[inline]
    pub fn offset(self, c: Coord) -> i64 {
        match self {
            LineKind::Column => c.y,
            LineKind::Row | LineKind::UpDiagonal | LineKind::DownDiagonal => c.x,
        }
    }

    #[inline]
    pub fn step(self) -> Coord {
        match self {
            LineKind::Row => Coord::new(1, 0),
            LineKind::Column => Coord::new(0, 1),
            LineKind::UpDiagonal => Coord::new(1, 1),
            LineKind::DownDiagonal => Coord::new(1, -1),
        }
    }

    /// Inverse of (`key`, `offset`).
    #[inline]
    pub fn coord_at(self, key: i64, offset: i64) -> Coord {
        match self {
            LineKind::Row => Coord::new(offset, key),
            LineKind::Column => Coord::new(key, offset),
            LineKind::UpDiagonal => Coord::new(offset, key + offset),
            LineKind::DownDiagonal => Coord::new(offset, key - offset),
        }
    }

    /// The family a unit direction travels along, with the sign relative to [`LineKind::step`].
    pub fn for_direction(dir: Coord) -> Option<(LineKind, i64)> {
        match (dir.x, dir.y) {
            (1, 0) => Some((LineKind::Row, 1)),
            (-1, 0) => Some((LineKind::Row, -1)),
            (0, 1) => Some((LineKind::Column, 1)),
            (0, -1) => Some((LineKind::Column, -1)),
            (1, 1) => Some((LineKind::UpDiagonal, 1)),
            (-1, -1) => Some((LineKind::UpDiagonal, -1)),
            (1, -1) => Some((LineKind::DownDiagonal, 1)),
            (-1, 1) => Some((LineKind::DownDiagonal, -1)),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LineKind::Row => "row",
            LineKind::Column => "column",
            LineKind::UpDiagonal => "up-diagonal",
            LineKind::DownDiagonal => "down-diagonal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_invert_through_offsets() {
        let c = Coord::new(-7, 12);
        for kind in LineKind::ALL {
            assert_eq!(kind.coord_at(kind.key(c), kind.offset(c)), c);
            let next = c + kind.step();
            assert_eq!(kind.key(next), kind.key(c));
            assert_eq!(kind.offset(next), kind.offset(c) + 1);
        }
    }

    #[test]
    fn reduce_and_parse() {
        assert_eq!(Coord::new(4, -6).reduced(), Some((Coord::new(2, -3), 2)));
        assert_eq!(Coord::ORIGIN.reduced(), None);
        assert_eq!(Coord::new(6, 3).steps_along(Coord::new(2, 1)), Some(3));
        assert_eq!(Coord::new(6, 4).steps_along(Coord::new(2, 1)), None);
        assert_eq!("-3,17".parse::<Coord>(), Ok(Coord::new(-3, 17)));
        assert!("3, 17".parse::<Coord>().is_err());
        assert!("3".parse::<Coord>().is_err());
    }

    #[test]
    fn crossings_land_on_whole_steps() {
        let o = Coord::ORIGIN;
        let c = Coord::new;
        // The column x = 3 meets the main diagonal on (3, 3).
        assert_eq!(crossing(o, c(1, 1), c(3, -8), c(0, 1)), Crossing::At(3));
        assert_eq!(crossing(o, c(1, 0), c(-4, 2), c(1, -1)), Crossing::At(-2));
        // A knightrider line through (1, 0) passes between the squares of the anti-diagonal.
        assert_eq!(crossing(o, c(1, -1), c(1, 0), c(1, 2)), Crossing::Apart);
        assert_eq!(crossing(o, c(1, 1), c(-5, -5), c(1, 1)), Crossing::Along);
        assert_eq!(crossing(o, c(1, 1), c(-5, -4), c(1, 1)), Crossing::Apart);
    }

    #[test]
    fn parsing_stops_at_the_coordinate_limit() {
        let edge = format!("{},-{}", Coord::LIMIT, Coord::LIMIT);
        assert_eq!(edge.parse::<Coord>(), Ok(Coord::new(Coord::LIMIT, -Coord::LIMIT)));
        assert!(format!("{},0", Coord::LIMIT + 1).parse::<Coord>().is_err());
        assert!("0,9223372036854775807".parse::<Coord>().is_err());
        assert!(!Coord::new(i64::MIN, 0).in_range());
    }
}
