use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::chess::bounds::WorldBorder;
use crate::chess::piece::{Player, RawKind};

/// How a player wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinCondition {
    Checkmate,
    /// Capturing any royal wins.
    RoyalCapture,
    /// Capturing the opponent's last royal wins.
    AllRoyalsCaptured,
    /// Leaving the opponent with no pieces wins.
    AllPiecesCaptured,
}

impl WinCondition {
    pub const ALL: [WinCondition; 4] = [
        WinCondition::Checkmate,
        WinCondition::RoyalCapture,
        WinCondition::AllRoyalsCaptured,
        WinCondition::AllPiecesCaptured,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WinCondition::Checkmate => "checkmate",
            WinCondition::RoyalCapture => "royalcapture",
            WinCondition::AllRoyalsCaptured => "allroyalscaptured",
            WinCondition::AllPiecesCaptured => "allpiecescaptured",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.name() == s)
    }
}

/// Promotion zone and choices for one player.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PromotionRule {
    /// Ranks (see [`Player::rank_of`]) on which a pawn must promote.
    pub ranks: Vec<i64>,
    /// Kinds a pawn may become. Empty means the classical four.
    pub allowed: Vec<RawKind>,
}

impl PromotionRule {
    pub const CLASSICAL: [RawKind; 4] = [RawKind::Queen, RawKind::Rook, RawKind::Bishop, RawKind::Knight];

    pub fn allowed_kinds(&self) -> &[RawKind] {
        if self.allowed.is_empty() {
            &Self::CLASSICAL
        } else {
            &self.allowed
        }
    }

    pub fn allows(&self, raw: RawKind) -> bool {
        self.allowed_kinds().contains(&raw)
    }
}

/// Rules of one game. Everything here is data so records can carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    /// Cyclic order of turns; a player may appear more than once.
    pub turn_order: Vec<Player>,
    pub win_conditions: BTreeMap<Player, Vec<WinCondition>>,
    /// Half-moves without capture or pawn move before the game is drawn.
    pub move_rule: Option<u32>,
    pub promotions: BTreeMap<Player, PromotionRule>,
    /// Maximum ray length; `None` is unlimited.
    pub slide_limit: Option<i64>,
    /// Captures explode the 3x3 neighbourhood of the destination.
    pub atomic: bool,
    pub world_border: Option<WorldBorder>,
}

impl Default for GameRules {
    fn default() -> Self {
        let turn_order = vec![Player::White, Player::Black];
        Self {
            win_conditions: Self::default_win_conditions(&turn_order),
            turn_order,
            move_rule: None,
            promotions: BTreeMap::new(),
            slide_limit: None,
            atomic: false,
            world_border: None,
        }
    }
}

impl GameRules {
    pub fn default_win_conditions(turn_order: &[Player]) -> BTreeMap<Player, Vec<WinCondition>> {
        distinct_players(turn_order)
            .into_iter()
            .map(|p| (p, vec![WinCondition::Checkmate]))
            .collect()
    }

    /// Distinct players in order of first appearance in the turn order.
    pub fn players(&self) -> Vec<Player> {
        distinct_players(&self.turn_order)
    }

    pub fn player_at(&self, turn_index: usize) -> Player {
        if self.turn_order.is_empty() {
            return Player::Neutral;
        }
        self.turn_order[turn_index % self.turn_order.len()]
    }

    pub fn win_conditions_for(&self, player: Player) -> &[WinCondition] {
        self.win_conditions
            .get(&player)
            .map(Vec::as_slice)
            .unwrap_or(&[WinCondition::Checkmate])
    }

    pub fn wins_by(&self, player: Player, condition: WinCondition) -> bool {
        self.win_conditions_for(player).contains(&condition)
    }

    /// Whether `player` must keep its royals out of check: some opponent wins by checkmate.
    pub fn check_matters_for(&self, player: Player) -> bool {
        self.players()
            .into_iter()
            .any(|p| p != player && self.wins_by(p, WinCondition::Checkmate))
    }

    pub fn promotion_for(&self, player: Player) -> Option<&PromotionRule> {
        self.promotions.get(&player)
    }

    pub fn promotes_on(&self, player: Player, rank: i64) -> bool {
        self.promotion_for(player)
            .is_some_and(|r| r.ranks.contains(&rank))
    }
}

fn distinct_players(turn_order: &[Player]) -> Vec<Player> {
    let mut out: Vec<Player> = Vec::with_capacity(turn_order.len());
    for &p in turn_order {
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}
