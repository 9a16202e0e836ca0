//! Per-type coordinate lists with tombstone slots.
//!
//! Renderers batch draws by piece type and address pieces by slot index, so removing a piece
//! leaves a tombstone instead of shifting later slots. Freed slots are reused by the next
//! insert of the same type. Nothing in the move engine depends on slot numbers.

use rustc_hash::FxHashMap;

use crate::chess::piece::PieceType;
use crate::core::coord::Coord;

#[derive(Debug, Clone, Default)]
pub struct TypeList {
    slots: Vec<Option<Coord>>,
    tombstones: Vec<usize>,
    slot_of: FxHashMap<Coord, usize>,
}

impl TypeList {
    /// Stores `c` and returns its slot.
    pub fn insert(&mut self, c: Coord) -> usize {
        let slot = match self.tombstones.pop() {
            Some(slot) => {
                self.slots[slot] = Some(c);
                slot
            }
            None => {
                self.slots.push(Some(c));
                self.slots.len() - 1
            }
        };
        self.slot_of.insert(c, slot);
        slot
    }

    /// Clears the slot holding `c`. Returns the freed slot, or `None` if `c` was not listed.
    pub fn remove(&mut self, c: Coord) -> Option<usize> {
        let slot = self.slot_of.remove(&c)?;
        self.slots[slot] = None;
        self.tombstones.push(slot);
        self.compact_tail();
        Some(slot)
    }

    // A trailing run of tombstones can be dropped without disturbing live slot numbers.
    fn compact_tail(&mut self) {
        let mut trimmed = false;
        while let Some(None) = self.slots.last() {
            self.slots.pop();
            trimmed = true;
        }
        if trimmed {
            let len = self.slots.len();
            self.tombstones.retain(|&s| s < len);
        }
    }

    pub fn slot_of(&self, c: Coord) -> Option<usize> {
        self.slot_of.get(&c).copied()
    }

    pub fn slots(&self) -> &[Option<Coord>] {
        &self.slots
    }

    pub fn tombstones(&self) -> &[usize] {
        &self.tombstones
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.slots.iter().filter_map(|s| *s)
    }

    /// Live pieces.
    pub fn len(&self) -> usize {
        self.slot_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_of.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeLists {
    by_type: FxHashMap<PieceType, TypeList>,
}

impl TypeLists {
    pub fn insert(&mut self, piece: PieceType, c: Coord) -> usize {
        self.by_type.entry(piece).or_default().insert(c)
    }

    pub fn remove(&mut self, piece: PieceType, c: Coord) -> Option<usize> {
        let list = self.by_type.get_mut(&piece)?;
        let slot = list.remove(c)?;
        if list.slots().is_empty() {
            self.by_type.remove(&piece);
        }
        Some(slot)
    }

    pub fn get(&self, piece: PieceType) -> Option<&TypeList> {
        self.by_type.get(&piece)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PieceType, &TypeList)> + '_ {
        self.by_type.iter().map(|(&p, l)| (p, l))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tombstones_are_reused_and_tail_compacts() {
        let mut list = TypeList::default();
        let a = list.insert(Coord::new(0, 0));
        let b = list.insert(Coord::new(1, 0));
        let c = list.insert(Coord::new(2, 0));
        assert_eq!((a, b, c), (0, 1, 2));

        assert_eq!(list.remove(Coord::new(1, 0)), Some(1));
        assert_eq!(list.tombstones(), &[1]);
        assert_eq!(list.slot_of(Coord::new(2, 0)), Some(2));

        assert_eq!(list.insert(Coord::new(5, 5)), 1);
        assert!(list.tombstones().is_empty());

        list.remove(Coord::new(2, 0));
        list.remove(Coord::new(5, 5));
        assert_eq!(list.slots().len(), 1);
        assert!(list.tombstones().is_empty());
        assert_eq!(list.len(), 1);
        assert_eq!(list.remove(Coord::new(9, 9)), None);
    }
}
