use serde::{Deserialize, Serialize};

use crate::chess::piece::{PieceType, Player};
use crate::core::coord::Coord;

/// Extra effect attached to a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialFlag {
    /// The royal travels two squares towards `rook`, which lands on the square it crossed.
    Castle { rook: Coord, direction: i64 },
    /// The captured pawn stands on `capture`, not on the destination.
    EnPassant { capture: Coord },
    /// `en_passant` is set when the promoting pawn captured en passant.
    Promotion {
        new_type: PieceType,
        en_passant: Option<Coord>,
    },
    DoublePush,
}

impl SpecialFlag {
    /// Square of a pawn taken en passant, whether or not the capturer also promotes.
    #[inline]
    pub fn en_passant_capture(self) -> Option<Coord> {
        match self {
            SpecialFlag::EnPassant { capture } => Some(capture),
            SpecialFlag::Promotion { en_passant, .. } => en_passant,
            _ => None,
        }
    }
}

/// Square a pawn skipped with a double push, capturable by `player` on the next half-move only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnPassantTarget {
    pub square: Coord,
    pub pawn: Coord,
    pub player: Player,
}

/// A move as requested by a caller, before it is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDraft {
    pub start: Coord,
    pub end: Coord,
    pub promotion: Option<PieceType>,
}

impl MoveDraft {
    pub fn new(start: Coord, end: Coord) -> Self {
        Self {
            start,
            end,
            promotion: None,
        }
    }

    pub fn promoting(start: Coord, end: Coord, new_type: PieceType) -> Self {
        Self {
            start,
            end,
            promotion: Some(new_type),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConclusionReason {
    Checkmate,
    Stalemate,
    RoyalCapture,
    AllRoyalsCaptured,
    AllPiecesCaptured,
    MoveRule,
}

/// How a game ended. `victor == None` is a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conclusion {
    pub victor: Option<Player>,
    pub reason: ConclusionReason,
}

/// An applied move, carrying everything needed to rewind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub start: Coord,
    pub end: Coord,
    pub piece: PieceType,
    pub captured: Option<PieceType>,
    pub special: Option<SpecialFlag>,
    /// Pieces removed by an atomic explosion, in removal order.
    pub nuked: Vec<(PieceType, Coord)>,
    /// Squares whose special right this move consumed.
    pub rights_cleared: Vec<Coord>,
    pub prior_en_passant: Option<EnPassantTarget>,
    pub prior_move_rule_counter: u32,
    /// Set when the move itself ended the game (royal destroyed).
    pub conclusion: Option<Conclusion>,
    pub check: bool,
}

impl Move {
    pub fn draft(&self) -> MoveDraft {
        MoveDraft {
            start: self.start,
            end: self.end,
            promotion: match self.special {
                Some(SpecialFlag::Promotion { new_type, .. }) => Some(new_type),
                _ => None,
            },
        }
    }

    /// Square the captured piece stood on, if any.
    pub fn capture_square(&self) -> Option<Coord> {
        self.captured?;
        Some(
            self.special
                .and_then(SpecialFlag::en_passant_capture)
                .unwrap_or(self.end),
        )
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub fn is_check(&self) -> bool {
        self.check
    }

    #[inline]
    pub fn is_special(&self) -> bool {
        self.special.is_some()
    }
}
