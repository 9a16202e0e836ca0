//! Error taxonomy, one enum per layer.

use thiserror::Error;

use crate::chess::piece::{PieceType, Player};
use crate::core::coord::Coord;

/// Organizer failures. `IndexDesync` means the five indices disagree; the game owning the
/// position must be abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("square {coord} is already occupied by {occupant}")]
    OccupancyConflict { coord: Coord, occupant: PieceType },
    #[error("no piece on {0}")]
    NotFound(Coord),
    #[error("{0} lies beyond the coordinate limit")]
    OutOfRange(Coord),
    #[error("index desync at {coord}: {index}")]
    IndexDesync { coord: Coord, index: String },
}

/// User-recoverable move rejections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move {start}>{end}")]
    IllegalMove { start: Coord, end: Coord },
    #[error("promotion to {requested} is not allowed")]
    IllegalPromotionType { requested: PieceType },
    #[error("piece on {0} has no special right")]
    NoSpecialRight(Coord),
    #[error("it is {expected}'s turn, piece on {start} belongs to {found}")]
    WrongTurn {
        start: Coord,
        expected: Player,
        found: Player,
    },
    #[error("the game is over")]
    GameOver,
    #[error("nothing to undo")]
    NothingToUndo,
}

/// Codec failures. Every variant carries the offending text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("invalid command: {0:?}")]
    InvalidCommand(String),
    #[error("invalid clock value: {0:?}")]
    InvalidClockFormat(String),
    #[error("malformed notation ({reason}) near {near:?}")]
    MalformedNotation { reason: String, near: String },
    #[error("{section} has {found} clauses for {expected} players")]
    RuleCountMismatch {
        section: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("no position section and no Variant metadata")]
    MissingPosition,
    #[error("unknown variant {0:?}")]
    UnknownVariant(String),
}

impl NotationError {
    pub(crate) fn malformed(reason: impl Into<String>, near: impl Into<String>) -> Self {
        NotationError::MalformedNotation {
            reason: reason.into(),
            near: near.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Position(#[from] PositionError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error("invalid game setup: {0}")]
    InvalidSetup(String),
    #[error("ply {ply}: {source}")]
    Replay {
        ply: usize,
        #[source]
        source: MoveError,
    },
    #[error("computation cancelled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type GameResult<T> = Result<T, GameError>;
