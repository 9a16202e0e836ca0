//! Built-in variant layouts (compile-time templates).
//!
//! Records that name a variant instead of listing a position are materialised through a
//! [`VariantTemplates`] implementation. Callers with their own catalogue implement the trait;
//! [`BuiltInVariants`] covers the variants shipped here.

use std::collections::BTreeMap;

use crate::chess::piece::{PieceType, Player, RawKind};
use crate::chess::rules::{GameRules, PromotionRule};
use crate::core::coord::Coord;
use crate::game::PlacedPiece;

/// Starting layout and default rules of a variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantLayout {
    pub rules: GameRules,
    pub pieces: Vec<PlacedPiece>,
}

/// Source of starting layouts, looked up by the `Variant` and `Date` metadata of a record.
pub trait VariantTemplates {
    /// `date` lets a catalogue serve the layout that was current when the game was played.
    fn layout(&self, variant: &str, date: Option<&str>) -> Option<VariantLayout>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltInVariants;

impl VariantTemplates for BuiltInVariants {
    fn layout(&self, variant: &str, _date: Option<&str>) -> Option<VariantLayout> {
        by_name(variant)
    }
}

const BACK_RANK: [RawKind; 8] = [
    RawKind::Rook,
    RawKind::Knight,
    RawKind::Bishop,
    RawKind::Queen,
    RawKind::King,
    RawKind::Bishop,
    RawKind::Knight,
    RawKind::Rook,
];

fn classical_rules() -> GameRules {
    let mut promotions = BTreeMap::new();
    promotions.insert(
        Player::White,
        PromotionRule {
            ranks: vec![8],
            allowed: PromotionRule::CLASSICAL.to_vec(),
        },
    );
    promotions.insert(
        Player::Black,
        PromotionRule {
            ranks: vec![1],
            allowed: PromotionRule::CLASSICAL.to_vec(),
        },
    );
    GameRules {
        move_rule: Some(100),
        promotions,
        ..GameRules::default()
    }
}

fn classical_pieces() -> Vec<PlacedPiece> {
    let mut out = Vec::with_capacity(32);
    for (player, back, pawns) in [(Player::White, 1, 2), (Player::Black, 8, 7)] {
        for (i, raw) in BACK_RANK.into_iter().enumerate() {
            let coord = Coord::new(i as i64 + 1, back);
            let piece = PieceType::new(raw, player);
            let castles = matches!(raw, RawKind::King | RawKind::Rook);
            out.push(PlacedPiece {
                piece,
                coord,
                special_right: castles,
            });
        }
        for x in 1..=8 {
            out.push(PlacedPiece::with_right(
                PieceType::new(RawKind::Pawn, player),
                Coord::new(x, pawns),
            ));
        }
    }
    out
}

/// The standard army on files 1..=8 of an open board; promotion on ranks 8 and 1.
pub fn classical() -> VariantLayout {
    VariantLayout {
        rules: classical_rules(),
        pieces: classical_pieces(),
    }
}

/// Classical, with obstacle walls closing the back ranks so the royals cannot run sideways.
pub fn confined_classical() -> VariantLayout {
    let mut pieces = classical_pieces();
    let obstacle = PieceType::new(RawKind::Obstacle, Player::Neutral);
    for x in 0..=9 {
        pieces.push(PlacedPiece::new(obstacle, Coord::new(x, 0)));
        pieces.push(PlacedPiece::new(obstacle, Coord::new(x, 9)));
    }
    for y in [1, 8] {
        pieces.push(PlacedPiece::new(obstacle, Coord::new(0, y)));
        pieces.push(PlacedPiece::new(obstacle, Coord::new(9, y)));
    }
    VariantLayout {
        rules: classical_rules(),
        pieces,
    }
}

/// Return a layout by name.
pub fn by_name(name: &str) -> Option<VariantLayout> {
    match name {
        "Classical" => Some(classical()),
        "Confined_Classical" => Some(confined_classical()),
        _ => None,
    }
}

/// Names of all built-in variants.
pub fn names() -> &'static [&'static str] {
    &["Classical", "Confined_Classical"]
}
