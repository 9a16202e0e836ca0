//! Pieces, movesets and game rules.

pub mod bounds;
pub mod moves;
pub mod moveset;
pub mod piece;
pub mod rules;
