//! Rules core for chess on an unbounded board.
//!
//! - `core`: coordinates, the five-way piece organizer and the cancellation token
//! - `chess`: players, piece kinds, movesets, game rules and move records
//! - `rules`: attack detection, legal move generation, special moves and game conclusion
//! - `game`: the [`game::Game`] state machine (make / undo / simulate)
//! - `premove`: moves queued ahead of the owner's turn
//! - `notation`: the ICN text format, with clock commands in move comments
//! - `variants`: built-in starting layouts
//! - `batch`: parallel validation of many records

pub mod batch;
pub mod chess;
pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod logging;
pub mod notation;
pub mod premove;
pub mod rules;
pub mod variants;

pub use crate::core::coord::Coord;
pub use crate::error::{GameError, GameResult};
pub use crate::game::Game;
