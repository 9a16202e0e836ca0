use rustc_hash::FxHashMap;

use crate::chess::piece::{PieceType, Player};
use crate::core::coord::{Coord, LineKind};
use crate::core::lines::{Blocker, OrganizedLines};
use crate::core::type_lists::{TypeList, TypeLists};
use crate::error::PositionError;

/// The piece organizer: the authoritative placement plus its derived indices.
///
/// A piece is recorded in five places:
/// - `by_coord`, the source of truth,
/// - the row, column, up-diagonal and down-diagonal indices in [`OrganizedLines`],
/// - its type's slot list in [`TypeLists`].
///
/// `insert` validates before touching anything, so a failed insert leaves no trace. `remove`
/// only fails with [`PositionError::IndexDesync`] when the indices were already inconsistent.
#[derive(Debug, Clone, Default)]
pub struct Position {
    by_coord: FxHashMap<Coord, PieceType>,
    lines: OrganizedLines,
    by_type: TypeLists,
}

impl Position {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pieces(
        pieces: impl IntoIterator<Item = (PieceType, Coord)>,
    ) -> Result<Self, PositionError> {
        let mut pos = Self::new();
        for (piece, c) in pieces {
            pos.insert(piece, c)?;
        }
        Ok(pos)
    }

    pub fn insert(&mut self, piece: PieceType, c: Coord) -> Result<(), PositionError> {
        if !c.in_range() {
            return Err(PositionError::OutOfRange(c));
        }
        if let Some(&occupant) = self.by_coord.get(&c) {
            return Err(PositionError::OccupancyConflict { coord: c, occupant });
        }
        self.by_coord.insert(c, piece);
        self.lines.insert(piece, c);
        self.by_type.insert(piece, c);
        Ok(())
    }

    pub fn remove(&mut self, c: Coord) -> Result<PieceType, PositionError> {
        let piece = self.by_coord.remove(&c).ok_or(PositionError::NotFound(c))?;
        let missing = self.lines.remove(c);
        let slot = self.by_type.remove(piece, c);
        if let Some(kind) = missing.first() {
            return Err(PositionError::IndexDesync {
                coord: c,
                index: kind.name().to_string(),
            });
        }
        if slot.is_none() {
            return Err(PositionError::IndexDesync {
                coord: c,
                index: format!("type list of {piece}"),
            });
        }
        Ok(piece)
    }

    #[inline]
    pub fn piece_at(&self, c: Coord) -> Option<PieceType> {
        self.by_coord.get(&c).copied()
    }

    #[inline]
    pub fn is_occupied(&self, c: Coord) -> bool {
        self.by_coord.contains_key(&c)
    }

    pub fn line_at(&self, kind: LineKind, key: i64) -> &[(PieceType, Coord)] {
        self.lines.line(kind, key)
    }

    pub fn lines(&self) -> &OrganizedLines {
        &self.lines
    }

    /// Nearest piece from `from` along one of the eight line directions.
    pub fn nearest_along(&self, from: Coord, dir: Coord) -> Option<Blocker> {
        self.lines.nearest_along(from, dir)
    }

    pub fn type_list(&self, piece: PieceType) -> Option<&TypeList> {
        self.by_type.get(piece)
    }

    pub fn type_lists(&self) -> &TypeLists {
        &self.by_type
    }

    pub fn len(&self) -> usize {
        self.by_coord.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_coord.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Coord, PieceType)> + '_ {
        self.by_coord.iter().map(|(&c, &p)| (c, p))
    }

    pub fn pieces_of(&self, player: Player) -> Vec<(Coord, PieceType)> {
        let mut out: Vec<_> = self.iter().filter(|(_, p)| p.player == player).collect();
        out.sort_unstable();
        out
    }

    pub fn royals_of(&self, player: Player) -> Vec<Coord> {
        let mut out: Vec<_> = self
            .iter()
            .filter(|(_, p)| p.player == player && p.is_royal())
            .map(|(c, _)| c)
            .collect();
        out.sort_unstable();
        out
    }

    /// Verifies that every index agrees with `by_coord`.
    pub fn check_consistency(&self) -> Result<(), PositionError> {
        let desync = |coord: Coord, index: String| PositionError::IndexDesync { coord, index };

        for kind in LineKind::ALL {
            let mut seen = 0usize;
            for (key, line) in self.lines.entries(kind) {
                for &(piece, c) in line {
                    if kind.key(c) != key || self.piece_at(c) != Some(piece) {
                        return Err(desync(c, kind.name().to_string()));
                    }
                    seen += 1;
                }
            }
            if seen != self.len() {
                let c = self
                    .by_coord
                    .keys()
                    .copied()
                    .find(|&c| !self.lines.line(kind, kind.key(c)).iter().any(|&(_, at)| at == c))
                    .unwrap_or(Coord::ORIGIN);
                return Err(desync(c, kind.name().to_string()));
            }
        }

        let mut listed = 0usize;
        for (piece, list) in self.by_type.iter() {
            for (slot, entry) in list.slots().iter().enumerate() {
                match entry {
                    Some(c) => {
                        if self.piece_at(*c) != Some(piece) || list.slot_of(*c) != Some(slot) {
                            return Err(desync(*c, format!("type list of {piece}")));
                        }
                        listed += 1;
                    }
                    None if !list.tombstones().contains(&slot) => {
                        return Err(desync(Coord::ORIGIN, format!("untracked hole in {piece}")));
                    }
                    None => {}
                }
            }
        }
        if listed != self.len() {
            return Err(desync(Coord::ORIGIN, "type lists".to_string()));
        }
        Ok(())
    }
}
