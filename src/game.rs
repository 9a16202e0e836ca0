//! A running game: the organizer plus the per-game transient state.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chess::moves::{Conclusion, EnPassantTarget, Move, MoveDraft, SpecialFlag};
use crate::chess::piece::{PieceType, Player, RawKind};
use crate::chess::rules::GameRules;
use crate::core::cancel::CancelToken;
use crate::core::coord::Coord;
use crate::core::position::Position;
use crate::error::{GameError, GameResult, MoveError, PositionError};
use crate::rules::movegen::LegalMoves;
use crate::rules::{attacks, checkmate, execute, movegen, special};

/// One piece of a starting layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub piece: PieceType,
    pub coord: Coord,
    /// Castling / double-push eligibility.
    pub special_right: bool,
}

impl PlacedPiece {
    pub fn new(piece: PieceType, coord: Coord) -> Self {
        Self {
            piece,
            coord,
            special_right: false,
        }
    }

    pub fn with_right(piece: PieceType, coord: Coord) -> Self {
        Self {
            piece,
            coord,
            special_right: true,
        }
    }
}

/// State a game started from; together with the history it reproduces the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartState {
    pub pieces: Vec<PlacedPiece>,
    pub en_passant: Option<EnPassantTarget>,
    pub move_rule_counter: u32,
    pub fullmove: u32,
}

impl StartState {
    pub fn new(pieces: Vec<PlacedPiece>) -> Self {
        Self {
            pieces,
            en_passant: None,
            move_rule_counter: 0,
            fullmove: 1,
        }
    }
}

/// Owns one [`Position`] for its whole life and mutates it in place.
///
/// Hypothetical moves go through [`Game::simulate`], which applies and rewinds on the same
/// position. The probe only receives `&Game`, so a second simulation cannot start before the
/// first has been rewound.
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) position: Position,
    pub(crate) rules: GameRules,
    pub(crate) special_rights: FxHashSet<Coord>,
    pub(crate) en_passant: Option<EnPassantTarget>,
    pub(crate) move_rule_counter: u32,
    pub(crate) fullmove: u32,
    pub(crate) turn_index: usize,
    pub(crate) history: Vec<Move>,
    pub(crate) conclusion: Option<Conclusion>,
    start: StartState,
}

impl Game {
    pub fn new(rules: GameRules, pieces: Vec<PlacedPiece>) -> GameResult<Self> {
        Self::from_start(rules, StartState::new(pieces))
    }

    pub fn from_start(rules: GameRules, start: StartState) -> GameResult<Self> {
        if rules.turn_order.is_empty() {
            return Err(GameError::InvalidSetup("empty turn order".to_string()));
        }
        if rules.turn_order.contains(&Player::Neutral) {
            return Err(GameError::InvalidSetup(
                "neutral cannot take turns".to_string(),
            ));
        }
        if let Some(border) = rules.world_border {
            let corners = [
                Coord::new(border.left, border.bottom),
                Coord::new(border.right, border.top),
            ];
            if !corners.iter().all(|c| c.in_range()) {
                return Err(GameError::InvalidSetup(
                    "world border lies beyond the coordinate limit".to_string(),
                ));
            }
        }
        let mut position = Position::new();
        let mut special_rights = FxHashSet::default();
        for placed in &start.pieces {
            if !placed.coord.in_range() {
                return Err(GameError::InvalidSetup(format!(
                    "{} on {} lies beyond the coordinate limit",
                    placed.piece, placed.coord
                )));
            }
            if let Some(border) = rules.world_border {
                if !border.contains(placed.coord) {
                    return Err(GameError::InvalidSetup(format!(
                        "{} on {} lies outside the world border",
                        placed.piece, placed.coord
                    )));
                }
            }
            position.insert(placed.piece, placed.coord)?;
            if placed.special_right {
                special_rights.insert(placed.coord);
            }
        }
        if let Some(ep) = start.en_passant {
            if !ep.square.in_range() {
                return Err(GameError::InvalidSetup(format!(
                    "en passant target {} lies beyond the coordinate limit",
                    ep.square
                )));
            }
            let pawn = position.piece_at(ep.pawn);
            if pawn.map(|p| p.raw) != Some(RawKind::Pawn) {
                return Err(GameError::InvalidSetup(format!(
                    "en passant target {} has no pawn on {}",
                    ep.square, ep.pawn
                )));
            }
        }
        Ok(Self {
            position,
            rules,
            special_rights,
            en_passant: start.en_passant,
            move_rule_counter: start.move_rule_counter,
            fullmove: start.fullmove.max(1),
            turn_index: 0,
            history: Vec::new(),
            conclusion: None,
            start,
        })
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn start(&self) -> &StartState {
        &self.start
    }

    pub fn current_player(&self) -> Player {
        self.rules.player_at(self.turn_index)
    }

    /// The player who made the last half-move.
    pub fn previous_player(&self) -> Player {
        let n = self.rules.turn_order.len().max(1);
        self.rules.player_at(self.turn_index + n - 1)
    }

    /// Player moving after the current one.
    pub fn next_player(&self) -> Player {
        self.rules.player_at(self.turn_index + 1)
    }

    pub fn en_passant(&self) -> Option<EnPassantTarget> {
        self.en_passant
    }

    pub fn has_special_right(&self, c: Coord) -> bool {
        self.special_rights.contains(&c)
    }

    pub fn special_rights(&self) -> impl Iterator<Item = Coord> + '_ {
        self.special_rights.iter().copied()
    }

    pub fn move_rule_counter(&self) -> u32 {
        self.move_rule_counter
    }

    pub fn fullmove(&self) -> u32 {
        self.fullmove
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    pub fn conclusion(&self) -> Option<Conclusion> {
        self.conclusion
    }

    pub fn is_over(&self) -> bool {
        self.conclusion.is_some()
    }

    /// Current placement in the same shape as a starting layout.
    pub fn placed_pieces(&self) -> Vec<PlacedPiece> {
        let mut out: Vec<PlacedPiece> = self
            .position
            .iter()
            .map(|(coord, piece)| PlacedPiece {
                piece,
                coord,
                special_right: self.has_special_right(coord),
            })
            .collect();
        out.sort_unstable_by_key(|p| (p.coord.y, p.coord.x));
        out
    }

    /// Is `target` attacked by any opponent of `victim`?
    pub fn is_square_attacked(&self, target: Coord, victim: Player) -> bool {
        attacks::is_square_attacked(&self.position, &self.rules, target, victim)
    }

    pub fn in_check(&self, player: Player) -> bool {
        self.position
            .royals_of(player)
            .into_iter()
            .any(|r| self.is_square_attacked(r, player))
    }

    /// Legal destinations of the piece on `from`, with check legality applied.
    pub fn legal_moves(&mut self, from: Coord) -> GameResult<LegalMoves> {
        movegen::legal_moves(self, from)
    }

    /// Validates and commits a move, then classifies the resulting position.
    pub fn make_move(&mut self, draft: MoveDraft) -> GameResult<&Move> {
        if self.conclusion.is_some() {
            return Err(MoveError::GameOver.into());
        }
        let illegal = MoveError::IllegalMove {
            start: draft.start,
            end: draft.end,
        };
        if !draft.end.in_range() {
            return Err(illegal.into());
        }
        let piece = self.position.piece_at(draft.start).ok_or(illegal.clone())?;
        let expected = self.current_player();
        if piece.player != expected {
            return Err(MoveError::WrongTurn {
                start: draft.start,
                expected,
                found: piece.player,
            }
            .into());
        }

        let legal = self.legal_moves(draft.start)?;
        let Some(dest) = legal.destination(draft.start, draft.end) else {
            if special::looks_like_castle(piece, draft) && !self.has_special_right(draft.start) {
                return Err(MoveError::NoSpecialRight(draft.start).into());
            }
            return Err(illegal.into());
        };
        let flag = special::resolve(self, piece, &dest, draft.promotion)?;

        let mut mv = execute::apply(self, draft.start, draft.end, flag)?;
        mv.check = self.in_check(self.current_player());
        debug!(
            start = %mv.start,
            end = %mv.end,
            piece = %mv.piece,
            capture = mv.is_capture(),
            special = ?mv.special,
            "move committed"
        );
        self.history.push(mv);

        if self.conclusion.is_none() {
            self.conclusion = checkmate::classify(self, &CancelToken::new())?;
        }
        let conclusion = self.conclusion;
        let last = self.history.len() - 1;
        if let Some(c) = conclusion {
            self.history[last].conclusion = Some(c);
            info!(victor = ?c.victor, reason = ?c.reason, "game concluded");
        }
        Ok(&self.history[last])
    }

    /// Takes back the last committed move.
    pub fn undo(&mut self) -> GameResult<Move> {
        let mv = self.history.pop().ok_or(MoveError::NothingToUndo)?;
        execute::rewind(self, &mv)?;
        self.conclusion = None;
        debug!(start = %mv.start, end = %mv.end, "move undone");
        Ok(mv)
    }

    /// Plays `draft` hypothetically, hands the resulting game to `probe`, then rewinds.
    ///
    /// The move must be pseudo-legal (its shape and occupancy are checked, check legality is
    /// not), which is what "would this expose our royal" questions need.
    pub fn simulate<R>(
        &mut self,
        draft: MoveDraft,
        probe: impl FnOnce(&Game, &Move) -> R,
    ) -> GameResult<R> {
        let piece = self
            .position
            .piece_at(draft.start)
            .ok_or(PositionError::NotFound(draft.start))?;
        let pseudo = movegen::pseudo_legal_moves(self, draft.start)?;
        let dest = pseudo
            .destination(draft.start, draft.end)
            .filter(|_| draft.end.in_range())
            .ok_or(MoveError::IllegalMove {
                start: draft.start,
                end: draft.end,
            })?;
        let flag = special::resolve(self, piece, &dest, draft.promotion)?;
        self.probe(draft.start, draft.end, flag, probe)
    }

    /// Apply, inspect, rewind. The game's conclusion is restored afterwards.
    pub(crate) fn probe<R>(
        &mut self,
        start: Coord,
        end: Coord,
        flag: Option<SpecialFlag>,
        probe: impl FnOnce(&Game, &Move) -> R,
    ) -> GameResult<R> {
        let saved = self.conclusion;
        let mv = execute::apply(self, start, end, flag)?;
        let out = probe(self, &mv);
        execute::rewind(self, &mv)?;
        self.conclusion = saved;
        Ok(out)
    }

    /// Runs `f` with the piece on `at` temporarily taken off the board.
    pub(crate) fn with_lifted<R>(&mut self, at: Coord, f: impl FnOnce(&Game) -> R) -> GameResult<R> {
        let piece = self.position.remove(at)?;
        let out = f(self);
        self.position.insert(piece, at)?;
        Ok(out)
    }

    /// Classifies the current position, polling `cancel` between candidate pieces.
    pub fn evaluate_conclusion(&mut self, cancel: &CancelToken) -> GameResult<Option<Conclusion>> {
        checkmate::classify(self, cancel)
    }
}
