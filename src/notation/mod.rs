//! Infinite Chess Notation (ICN).
//!
//! - `commands`: `[%clk H:MM:SS.D]` style commands inside move comments
//! - `tokens`: piece abbreviations, case-coded for White/Black and number-prefixed otherwise
//! - `record`: [`GameRecord`], the decoded form, and its conversion to and from a [`Game`]
//! - `sections`: the encoder and decoder proper
//!
//! A record is a run of whitespace separated sections, each optional, in this order:
//! metadata `[Key "Value"]`, turn order `w:b`, en passant square, `counter/limit`,
//! full-move number, promotions `(ranks;types|...)`, win conditions, extra rules as JSON,
//! the position `TOKENx,y[+]|...` and the moves `x,y>x,y[=TOKEN][{comment}]|...`.
//!
//! [`Game`]: crate::game::Game

pub mod commands;
mod cursor;
pub mod record;
mod sections;
pub mod tokens;

pub use commands::{
    clk_millis, create_clk_command, extract_commands, format_clock, Command, MoveComment,
};
pub use record::{GameRecord, RecordedMove};

use crate::error::NotationError;

/// Renders a record as a single line of notation.
pub fn encode(record: &GameRecord) -> Result<String, NotationError> {
    sections::encode(record)
}

/// Parses a line of notation. Structure only; move legality is checked by
/// [`GameRecord::to_game`].
pub fn decode(text: &str) -> Result<GameRecord, NotationError> {
    sections::decode(text)
}

/// A single move in compact form, e.g. `1,7>1,8=Q{[%clk 0:01:57.4] last chance}`.
pub fn encode_move(m: &RecordedMove) -> Result<String, NotationError> {
    sections::encode_move(m)
}

pub fn decode_move(text: &str) -> Result<RecordedMove, NotationError> {
    sections::decode_move(text.trim())
}
