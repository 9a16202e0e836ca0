use std::collections::BTreeMap;

use crate::chess::moves::{EnPassantTarget, Move, MoveDraft, SpecialFlag};
use crate::chess::piece::PieceType;
use crate::chess::rules::GameRules;
use crate::config::EngineConfig;
use crate::core::coord::Coord;
use crate::error::{GameError, GameResult, NotationError};
use crate::game::{Game, PlacedPiece, StartState};
use crate::notation::commands::MoveComment;
use crate::variants::VariantTemplates;

pub const VARIANT_KEY: &str = "Variant";
pub const DATE_KEY: &str = "Date";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedMove {
    pub start: Coord,
    pub end: Coord,
    pub promotion: Option<PieceType>,
    pub comment: Option<MoveComment>,
}

impl RecordedMove {
    pub fn new(start: Coord, end: Coord) -> Self {
        Self {
            start,
            end,
            promotion: None,
            comment: None,
        }
    }

    pub fn from_move(mv: &Move) -> Self {
        Self {
            start: mv.start,
            end: mv.end,
            promotion: match mv.special {
                Some(SpecialFlag::Promotion { new_type, .. }) => Some(new_type),
                _ => None,
            },
            comment: None,
        }
    }

    pub fn draft(&self) -> MoveDraft {
        MoveDraft {
            start: self.start,
            end: self.end,
            promotion: self.promotion,
        }
    }
}

/// Everything a notation string carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub metadata: BTreeMap<String, String>,
    pub rules: GameRules,
    /// Square skipped by a double push just before the recorded start.
    pub en_passant: Option<Coord>,
    pub move_rule_counter: u32,
    pub fullmove: u32,
    /// `None` when the start is implied by the `Variant` / `Date` metadata.
    pub position: Option<Vec<PlacedPiece>>,
    pub moves: Vec<RecordedMove>,
}

impl Default for GameRecord {
    fn default() -> Self {
        Self {
            metadata: BTreeMap::new(),
            rules: GameRules::default(),
            en_passant: None,
            move_rule_counter: 0,
            fullmove: 1,
            position: None,
            moves: Vec::new(),
        }
    }
}

impl GameRecord {
    /// Snapshot of a game: its start state plus every committed move.
    pub fn from_game(game: &Game, metadata: BTreeMap<String, String>) -> Self {
        let start = game.start();
        Self {
            metadata,
            rules: game.rules().clone(),
            en_passant: start.en_passant.map(|ep| ep.square),
            move_rule_counter: start.move_rule_counter,
            fullmove: start.fullmove,
            position: Some(start.pieces.clone()),
            moves: game.history().iter().map(RecordedMove::from_move).collect(),
        }
    }

    pub fn variant(&self) -> Option<&str> {
        self.metadata.get(VARIANT_KEY).map(String::as_str)
    }

    /// Rules and starting pieces, from the record or from the variant catalogue.
    ///
    /// A record naming a variant without any rule sections plays under the variant's rules.
    pub fn resolve_start(
        &self,
        templates: &dyn VariantTemplates,
    ) -> Result<(GameRules, Vec<PlacedPiece>), NotationError> {
        if let Some(pieces) = &self.position {
            return Ok((self.rules.clone(), pieces.clone()));
        }
        let variant = self.variant().ok_or(NotationError::MissingPosition)?;
        let date = self.metadata.get(DATE_KEY).map(String::as_str);
        let layout = templates
            .layout(variant, date)
            .ok_or_else(|| NotationError::UnknownVariant(variant.to_string()))?;
        let rules = if self.rules == GameRules::default() {
            layout.rules
        } else {
            self.rules.clone()
        };
        Ok((rules, layout.pieces))
    }

    /// The en passant target implied by the recorded square: the pawn stands one step beyond
    /// it, seen from the player moving last in the turn order.
    fn en_passant_target(
        &self,
        rules: &GameRules,
    ) -> Result<Option<EnPassantTarget>, NotationError> {
        let Some(square) = self.en_passant else {
            return Ok(None);
        };
        let order = &rules.turn_order;
        let (Some(&first), Some(&last)) = (order.first(), order.last()) else {
            return Err(NotationError::malformed(
                "en passant without turn order",
                square.to_string(),
            ));
        };
        let forward = last.forward().ok_or_else(|| {
            NotationError::malformed("en passant for a player without pawns", square.to_string())
        })?;
        Ok(Some(EnPassantTarget {
            square,
            pawn: square + forward,
            player: first,
        }))
    }

    /// Game at the recorded start, before any move is replayed.
    pub fn start_game(&self, templates: &dyn VariantTemplates) -> GameResult<Game> {
        self.start_game_with(templates, &EngineConfig::default())
    }

    /// Like [`GameRecord::start_game`], with `config` filling the rules the resolved start
    /// leaves open.
    pub fn start_game_with(
        &self,
        templates: &dyn VariantTemplates,
        config: &EngineConfig,
    ) -> GameResult<Game> {
        let (mut rules, pieces) = self.resolve_start(templates)?;
        config.apply_to(&mut rules);
        let start = StartState {
            pieces,
            en_passant: self.en_passant_target(&rules)?,
            move_rule_counter: self.move_rule_counter,
            fullmove: self.fullmove,
        };
        Game::from_start(rules, start)
    }

    /// Builds the game and replays every recorded move through the legality checks.
    pub fn to_game(&self, templates: &dyn VariantTemplates) -> GameResult<Game> {
        self.to_game_with(templates, &EngineConfig::default())
    }

    pub fn to_game_with(
        &self,
        templates: &dyn VariantTemplates,
        config: &EngineConfig,
    ) -> GameResult<Game> {
        let mut game = self.start_game_with(templates, config)?;
        for (ply, m) in self.moves.iter().enumerate() {
            game.make_move(m.draft()).map_err(|e| match e {
                GameError::Move(source) => GameError::Replay {
                    ply: ply + 1,
                    source,
                },
                other => other,
            })?;
        }
        Ok(game)
    }
}
