//! Move generation, special moves, move application and game-end classification.

pub mod attacks;
pub mod checkmate;
pub mod execute;
pub mod movegen;
pub mod special;
