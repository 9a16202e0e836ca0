//! Moveset registry: the shape of every piece kind.
//!
//! Sliding directions are stored once per line in lowest terms (`(1,0)` covers both `+x` and
//! `-x`); the extent's negative side covers the opposite half of the line.

use std::sync::OnceLock;

use crate::chess::piece::{PieceType, Player, RawKind};
use crate::core::coord::{Coord, LineKind, KING_STEPS};

/// Reachable step counts along one sliding direction: `min..=max` excluding `0`.
///
/// `None` on either side means the ray is unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideExtent {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl SlideExtent {
    pub const UNBOUNDED: SlideExtent = SlideExtent {
        min: None,
        max: None,
    };

    /// `(-limit, +limit)`; `None` is unbounded. Negative limits behave as `0`.
    pub fn symmetric(limit: Option<i64>) -> Self {
        match limit {
            None => Self::UNBOUNDED,
            Some(l) => {
                let l = l.max(0);
                SlideExtent {
                    min: Some(-l),
                    max: Some(l),
                }
            }
        }
    }

    #[inline]
    pub fn contains(self, steps: i64) -> bool {
        steps != 0
            && self.min.map_or(true, |m| steps >= m)
            && self.max.map_or(true, |m| steps <= m)
    }

    /// No reachable square on either side.
    #[inline]
    pub fn is_immobile(self) -> bool {
        self.min.is_some_and(|m| m > -1) && self.max.is_some_and(|m| m < 1)
    }

    pub fn is_bounded(self) -> bool {
        self.min.is_some() && self.max.is_some()
    }

    /// Caps the positive side at `steps`.
    pub fn cap_max(&mut self, steps: i64) {
        let steps = steps.max(0);
        self.max = Some(self.max.map_or(steps, |m| m.min(steps)));
    }

    /// Caps the negative side at `-steps`.
    pub fn cap_min(&mut self, steps: i64) {
        let steps = steps.max(0);
        self.min = Some(self.min.map_or(-steps, |m| m.max(-steps)));
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Moveset {
    /// Jump offsets, unique per kind.
    pub individual: Vec<Coord>,
    pub sliding: Vec<(Coord, SlideExtent)>,
}

impl Moveset {
    pub fn is_empty(&self) -> bool {
        self.individual.is_empty() && self.sliding.iter().all(|(_, e)| e.is_immobile())
    }

    pub fn slide_extent(&self, dir: Coord) -> Option<SlideExtent> {
        self.sliding.iter().find(|(d, _)| *d == dir).map(|&(_, e)| e)
    }
}

pub const ORTHOGONAL: [Coord; 2] = [Coord { x: 1, y: 0 }, Coord { x: 0, y: 1 }];

pub const DIAGONAL: [Coord; 2] = [Coord { x: 1, y: 1 }, Coord { x: 1, y: -1 }];

pub const KNIGHTRIDER: [Coord; 4] = [
    Coord { x: 1, y: 2 },
    Coord { x: 2, y: 1 },
    Coord { x: 1, y: -2 },
    Coord { x: 2, y: -1 },
];

/// All `(±a, ±b)` and `(±b, ±a)` jumps, deduplicated.
pub fn leaper(a: i64, b: i64) -> Vec<Coord> {
    let mut out = Vec::with_capacity(8);
    for (p, q) in [(a, b), (b, a)] {
        for sp in [1, -1] {
            for sq in [1, -1] {
                out.push(Coord::new(p * sp, q * sq));
            }
        }
    }
    out.sort_unstable();
    out.dedup();
    out
}

fn jumps_of(raw: RawKind) -> Vec<Coord> {
    use RawKind::*;
    match raw {
        Void | Obstacle | Pawn | Knightrider | Rook | Bishop | Queen | RoyalQueen => Vec::new(),
        King | Guard => KING_STEPS.to_vec(),
        Knight | Chancellor | Archbishop | Amazon => leaper(1, 2),
        Camel => leaper(1, 3),
        Giraffe => leaper(1, 4),
        Zebra => leaper(2, 3),
        Hawk => {
            let mut v = leaper(2, 0);
            v.extend(leaper(3, 0));
            v.extend(leaper(2, 2));
            v.extend(leaper(3, 3));
            v
        }
        Centaur | RoyalCentaur => {
            let mut v = KING_STEPS.to_vec();
            v.extend(leaper(1, 2));
            v
        }
    }
}

fn slide_dirs_of(raw: RawKind) -> &'static [Coord] {
    use RawKind::*;
    const QUEEN: [Coord; 4] = [ORTHOGONAL[0], ORTHOGONAL[1], DIAGONAL[0], DIAGONAL[1]];
    match raw {
        Rook | Chancellor => &ORTHOGONAL,
        Bishop | Archbishop => &DIAGONAL,
        Queen | RoyalQueen | Amazon => &QUEEN,
        Knightrider => &KNIGHTRIDER,
        Void | Obstacle | Pawn | King | Guard | Knight | Camel | Giraffe | Zebra | Hawk
        | Centaur | RoyalCentaur => &[],
    }
}

fn jump_table() -> &'static [Vec<Coord>] {
    static TABLE: OnceLock<Vec<Vec<Coord>>> = OnceLock::new();
    TABLE.get_or_init(|| RawKind::ALL.iter().map(|&raw| jumps_of(raw)).collect())
}

/// Jump offsets of a raw kind, independent of owner and slide limit.
pub fn jump_offsets(raw: RawKind) -> &'static [Coord] {
    &jump_table()[raw as usize]
}

/// Every jump offset used by any kind.
pub fn all_jump_offsets() -> &'static [Coord] {
    static UNION: OnceLock<Vec<Coord>> = OnceLock::new();
    UNION.get_or_init(|| {
        let mut v: Vec<Coord> = jump_table().iter().flatten().copied().collect();
        v.sort_unstable();
        v.dedup();
        v
    })
}

/// Whether the kind slides along a direction that is not a row, column or diagonal.
pub fn has_off_line_slides(raw: RawKind) -> bool {
    slide_dirs_of(raw)
        .iter()
        .any(|&d| LineKind::for_direction(d).is_none())
}

/// Moveset of `piece` under a global slide limit (`None` = unlimited).
///
/// Neutral pieces and pawns have no registry moves; pawns are generated by their own path.
pub fn moveset_for(piece: PieceType, slide_limit: Option<i64>) -> Moveset {
    if piece.player == Player::Neutral {
        return Moveset::default();
    }
    let extent = SlideExtent::symmetric(slide_limit);
    Moveset {
        individual: jump_offsets(piece.raw).to_vec(),
        sliding: slide_dirs_of(piece.raw)
            .iter()
            .map(|&d| (d, extent))
            .collect(),
    }
}
