use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::coord::Coord;

/// Owner of a piece. `Neutral` owns board furniture (voids, obstacles) and never moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    Neutral,
    White,
    Black,
    Red,
    Blue,
}

impl Player {
    pub const ALL: [Player; 5] = [
        Player::Neutral,
        Player::White,
        Player::Black,
        Player::Red,
        Player::Blue,
    ];

    #[inline]
    pub const fn number(self) -> u8 {
        match self {
            Player::Neutral => 0,
            Player::White => 1,
            Player::Black => 2,
            Player::Red => 3,
            Player::Blue => 4,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.number() == n)
    }

    /// Short code used in turn orders.
    pub fn code(self) -> &'static str {
        match self {
            Player::Neutral => "n",
            Player::White => "w",
            Player::Black => "b",
            Player::Red => "r",
            Player::Blue => "bl",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == s)
    }

    /// Direction a pawn of this player advances in.
    pub fn forward(self) -> Option<Coord> {
        match self {
            Player::Neutral => None,
            Player::White => Some(Coord::new(0, 1)),
            Player::Black => Some(Coord::new(0, -1)),
            Player::Red => Some(Coord::new(1, 0)),
            Player::Blue => Some(Coord::new(-1, 0)),
        }
    }

    /// Rank of `c` as seen by this player: the coordinate along its forward axis.
    pub fn rank_of(self, c: Coord) -> i64 {
        match self {
            Player::Red | Player::Blue => c.x,
            _ => c.y,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Every piece shape the engine knows. Adding a variant forces the moveset table to cover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RawKind {
    Void,
    Obstacle,
    King,
    Giraffe,
    Camel,
    Zebra,
    Knightrider,
    Amazon,
    Queen,
    RoyalQueen,
    Hawk,
    Chancellor,
    Archbishop,
    Centaur,
    RoyalCentaur,
    Knight,
    Guard,
    Rook,
    Bishop,
    Pawn,
}

impl RawKind {
    pub const ALL: [RawKind; 20] = [
        RawKind::Void,
        RawKind::Obstacle,
        RawKind::King,
        RawKind::Giraffe,
        RawKind::Camel,
        RawKind::Zebra,
        RawKind::Knightrider,
        RawKind::Amazon,
        RawKind::Queen,
        RawKind::RoyalQueen,
        RawKind::Hawk,
        RawKind::Chancellor,
        RawKind::Archbishop,
        RawKind::Centaur,
        RawKind::RoyalCentaur,
        RawKind::Knight,
        RawKind::Guard,
        RawKind::Rook,
        RawKind::Bishop,
        RawKind::Pawn,
    ];

    /// Uppercase notation abbreviation.
    pub fn abbreviation(self) -> &'static str {
        use RawKind::*;
        match self {
            Void => "VO",
            Obstacle => "OB",
            King => "K",
            Giraffe => "GI",
            Camel => "CA",
            Zebra => "ZE",
            Knightrider => "NR",
            Amazon => "AM",
            Queen => "Q",
            RoyalQueen => "RQ",
            Hawk => "HA",
            Chancellor => "CH",
            Archbishop => "AR",
            Centaur => "CE",
            RoyalCentaur => "RC",
            Knight => "N",
            Guard => "GU",
            Rook => "R",
            Bishop => "B",
            Pawn => "P",
        }
    }

    pub fn from_abbreviation(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.abbreviation() == s)
    }

    /// Subject to check and checkmate.
    #[inline]
    pub fn is_royal(self) -> bool {
        matches!(self, RawKind::King | RawKind::RoyalQueen | RawKind::RoyalCentaur)
    }

    /// Royal that only moves by jumps, so castling and square-by-square check tests apply.
    #[inline]
    pub fn is_jumping_royal(self) -> bool {
        matches!(self, RawKind::King | RawKind::RoyalCentaur)
    }

    #[inline]
    pub fn is_capturable(self) -> bool {
        self != RawKind::Void
    }

    /// Board furniture that belongs to nobody.
    #[inline]
    pub fn is_neutral_only(self) -> bool {
        matches!(self, RawKind::Void | RawKind::Obstacle)
    }
}

/// A raw kind together with its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceType {
    pub raw: RawKind,
    pub player: Player,
}

impl PieceType {
    #[inline]
    pub const fn new(raw: RawKind, player: Player) -> Self {
        Self { raw, player }
    }

    #[inline]
    pub fn is_royal(self) -> bool {
        self.raw.is_royal()
    }

    #[inline]
    pub fn is_jumping_royal(self) -> bool {
        self.raw.is_jumping_royal()
    }

    /// Whether a piece of this type may land on a square holding `target`.
    #[inline]
    pub fn can_capture(self, target: PieceType) -> bool {
        self.player != Player::Neutral && target.player != self.player && target.raw.is_capturable()
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.player.number(), self.raw.abbreviation())
    }
}
