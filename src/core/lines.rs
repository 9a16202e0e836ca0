//! Organized lines: one sparse index per line family.
//!
//! Each index maps a line key (see [`LineKind::key`]) to the unordered list of pieces on that
//! line. A ray query only ever scans the single list its direction maps to.

use rustc_hash::FxHashMap;

use crate::chess::piece::PieceType;
use crate::core::coord::{Coord, LineKind};

type Line = Vec<(PieceType, Coord)>;

/// The nearest occupied square on one side of a query point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blocker {
    /// Number of steps from the query point, always positive.
    pub distance: i64,
    pub piece: PieceType,
    pub coord: Coord,
}

#[derive(Debug, Clone, Default)]
pub struct OrganizedLines {
    rows: FxHashMap<i64, Line>,
    columns: FxHashMap<i64, Line>,
    up_diagonals: FxHashMap<i64, Line>,
    down_diagonals: FxHashMap<i64, Line>,
}

impl OrganizedLines {
    #[inline]
    fn map(&self, kind: LineKind) -> &FxHashMap<i64, Line> {
        match kind {
            LineKind::Row => &self.rows,
            LineKind::Column => &self.columns,
            LineKind::UpDiagonal => &self.up_diagonals,
            LineKind::DownDiagonal => &self.down_diagonals,
        }
    }

    #[inline]
    fn map_mut(&mut self, kind: LineKind) -> &mut FxHashMap<i64, Line> {
        match kind {
            LineKind::Row => &mut self.rows,
            LineKind::Column => &mut self.columns,
            LineKind::UpDiagonal => &mut self.up_diagonals,
            LineKind::DownDiagonal => &mut self.down_diagonals,
        }
    }

    pub fn insert(&mut self, piece: PieceType, c: Coord) {
        for kind in LineKind::ALL {
            self.map_mut(kind)
                .entry(kind.key(c))
                .or_default()
                .push((piece, c));
        }
    }

    /// Removes `c` from every family. Returns the families that did not contain it.
    pub fn remove(&mut self, c: Coord) -> Vec<LineKind> {
        let mut missing = Vec::new();
        for kind in LineKind::ALL {
            let key = kind.key(c);
            let map = self.map_mut(kind);
            let Some(line) = map.get_mut(&key) else {
                missing.push(kind);
                continue;
            };
            match line.iter().position(|&(_, at)| at == c) {
                Some(i) => {
                    line.swap_remove(i);
                    if line.is_empty() {
                        map.remove(&key);
                    }
                }
                None => missing.push(kind),
            }
        }
        missing
    }

    /// Pieces on one line; empty for unpopulated keys.
    pub fn line(&self, kind: LineKind, key: i64) -> &[(PieceType, Coord)] {
        self.map(kind).get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of populated lines of one family.
    pub fn line_count(&self, kind: LineKind) -> usize {
        self.map(kind).len()
    }

    pub(crate) fn entries(&self, kind: LineKind) -> impl Iterator<Item = (i64, &Line)> + '_ {
        self.map(kind).iter().map(|(&k, v)| (k, v))
    }

    /// Nearest pieces before and after `from` on its line of family `kind`, measured along
    /// [`LineKind::step`]. `from` itself is ignored.
    pub fn nearest(&self, kind: LineKind, from: Coord) -> (Option<Blocker>, Option<Blocker>) {
        let origin = kind.offset(from);
        let mut behind: Option<Blocker> = None;
        let mut ahead: Option<Blocker> = None;
        for &(piece, coord) in self.line(kind, kind.key(from)) {
            let d = kind.offset(coord) - origin;
            if d > 0 {
                if ahead.map_or(true, |b| d < b.distance) {
                    ahead = Some(Blocker {
                        distance: d,
                        piece,
                        coord,
                    });
                }
            } else if d < 0 && behind.map_or(true, |b| -d < b.distance) {
                behind = Some(Blocker {
                    distance: -d,
                    piece,
                    coord,
                });
            }
        }
        (behind, ahead)
    }

    /// Nearest piece from `from` along a unit direction of one of the four families.
    pub fn nearest_along(&self, from: Coord, dir: Coord) -> Option<Blocker> {
        let (kind, sign) = LineKind::for_direction(dir)?;
        let (behind, ahead) = self.nearest(kind, from);
        if sign > 0 {
            ahead
        } else {
            behind
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::piece::{Player, RawKind};

    #[test]
    fn nearest_ignores_far_pieces_and_self() {
        let rook = PieceType::new(RawKind::Rook, Player::White);
        let pawn = PieceType::new(RawKind::Pawn, Player::Black);
        let mut lines = OrganizedLines::default();
        lines.insert(rook, Coord::new(0, 0));
        lines.insert(pawn, Coord::new(0, 3));
        lines.insert(pawn, Coord::new(0, 9));
        lines.insert(pawn, Coord::new(0, -2));

        let up = lines.nearest_along(Coord::ORIGIN, Coord::new(0, 1)).unwrap();
        assert_eq!((up.distance, up.coord), (3, Coord::new(0, 3)));
        let down = lines.nearest_along(Coord::ORIGIN, Coord::new(0, -1)).unwrap();
        assert_eq!(down.distance, 2);
        assert!(lines.nearest_along(Coord::ORIGIN, Coord::new(1, 0)).is_none());
        assert!(lines.nearest_along(Coord::ORIGIN, Coord::new(1, 2)).is_none());
    }

    #[test]
    fn remove_reports_missing_families() {
        let mut lines = OrganizedLines::default();
        assert_eq!(lines.remove(Coord::new(1, 1)).len(), 4);
        lines.insert(PieceType::new(RawKind::Knight, Player::White), Coord::new(1, 1));
        assert!(lines.remove(Coord::new(1, 1)).is_empty());
        assert_eq!(lines.line_count(LineKind::Row), 0);
    }
}
