use tracing::debug;

use crate::chess::moves::{Conclusion, ConclusionReason};
use crate::chess::piece::Player;
use crate::chess::rules::WinCondition;
use crate::core::cancel::CancelToken;
use crate::error::GameResult;
use crate::game::Game;

/// Does `player` have any legal move? Stops at the first piece that has one.
///
/// `cancel` is polled before each piece, so a caller can abandon the search on huge boards.
pub fn has_legal_move(game: &mut Game, player: Player, cancel: &CancelToken) -> GameResult<bool> {
    let coords: Vec<_> = game
        .position
        .pieces_of(player)
        .into_iter()
        .map(|(c, _)| c)
        .collect();
    for from in coords {
        cancel.check()?;
        if !game.legal_moves(from)?.is_empty() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Classifies the position for the side to move.
///
/// Order: an already recorded conclusion, elimination (`allpiecescaptured`), checkmate or
/// stalemate, then the move rule.
pub fn classify(game: &mut Game, cancel: &CancelToken) -> GameResult<Option<Conclusion>> {
    if let Some(c) = game.conclusion {
        return Ok(Some(c));
    }
    let to_move = game.current_player();
    let previous = game.previous_player();

    if game.position.pieces_of(to_move).is_empty()
        && game.rules.wins_by(previous, WinCondition::AllPiecesCaptured)
    {
        return Ok(Some(Conclusion {
            victor: Some(previous),
            reason: ConclusionReason::AllPiecesCaptured,
        }));
    }

    if !has_legal_move(game, to_move, cancel)? {
        let mated = game.in_check(to_move) && game.rules.check_matters_for(to_move);
        debug!(player = %to_move, mated, "no legal moves");
        return Ok(Some(if mated {
            Conclusion {
                victor: Some(previous),
                reason: ConclusionReason::Checkmate,
            }
        } else {
            Conclusion {
                victor: None,
                reason: ConclusionReason::Stalemate,
            }
        }));
    }

    if let Some(limit) = game.rules.move_rule {
        if game.move_rule_counter >= limit {
            return Ok(Some(Conclusion {
                victor: None,
                reason: ConclusionReason::MoveRule,
            }));
        }
    }
    Ok(None)
}
