//! Move application and its exact inverse.
//!
//! [`apply`] performs no legality checks; callers pass a destination they already validated.
//! Everything [`rewind`] needs is recorded on the returned [`Move`].

use rustc_hash::FxHashSet;

use crate::chess::moves::{Conclusion, ConclusionReason, EnPassantTarget, Move, SpecialFlag};
use crate::chess::piece::{PieceType, Player, RawKind};
use crate::chess::rules::WinCondition;
use crate::core::coord::{Coord, KING_STEPS};
use crate::error::{GameResult, PositionError};
use crate::game::Game;

fn clear_right(rights: &mut FxHashSet<Coord>, c: Coord, cleared: &mut Vec<Coord>) {
    if rights.remove(&c) {
        cleared.push(c);
    }
}

pub(crate) fn apply(
    game: &mut Game,
    start: Coord,
    end: Coord,
    special: Option<SpecialFlag>,
) -> GameResult<Move> {
    let piece = game
        .position
        .piece_at(start)
        .ok_or(PositionError::NotFound(start))?;
    let mover = piece.player;
    let prior_en_passant = game.en_passant.take();
    let prior_move_rule_counter = game.move_rule_counter;
    let mut rights_cleared = Vec::new();

    game.position.remove(start)?;
    clear_right(&mut game.special_rights, start, &mut rights_cleared);

    let capture_square = match special.and_then(SpecialFlag::en_passant_capture) {
        Some(capture) => Some(capture),
        None if game.position.is_occupied(end) => Some(end),
        None => None,
    };
    let mut captured = None;
    if let Some(at) = capture_square {
        captured = Some(game.position.remove(at)?);
        clear_right(&mut game.special_rights, at, &mut rights_cleared);
    }

    if let Some(SpecialFlag::Castle { rook, direction }) = special {
        let partner = game.position.remove(rook)?;
        clear_right(&mut game.special_rights, rook, &mut rights_cleared);
        game.position
            .insert(partner, start + Coord::new(direction, 0))?;
    }

    let landed = match special {
        Some(SpecialFlag::Promotion { new_type, .. }) => new_type,
        _ => piece,
    };
    game.position.insert(landed, end)?;

    let mut nuked = Vec::new();
    if game.rules.atomic && captured.is_some() {
        for step in KING_STEPS {
            let c = end + step;
            let Some(victim) = game.position.piece_at(c) else {
                continue;
            };
            if !victim.raw.is_capturable() {
                continue;
            }
            game.position.remove(c)?;
            clear_right(&mut game.special_rights, c, &mut rights_cleared);
            nuked.push((victim, c));
        }
    }

    let destroyed: Vec<PieceType> = captured
        .into_iter()
        .chain(nuked.iter().map(|&(p, _)| p))
        .collect();
    let conclusion = royal_loss(game, mover, &destroyed);
    if conclusion.is_some() {
        game.conclusion = conclusion;
    }

    if special == Some(SpecialFlag::DoublePush) {
        game.en_passant = Some(EnPassantTarget {
            square: Coord::new((start.x + end.x) / 2, (start.y + end.y) / 2),
            pawn: end,
            player: game.next_player(),
        });
    }

    game.move_rule_counter = if captured.is_some() || piece.raw == RawKind::Pawn {
        0
    } else {
        game.move_rule_counter + 1
    };

    game.turn_index = (game.turn_index + 1) % game.rules.turn_order.len();
    if game.turn_index == 0 {
        game.fullmove += 1;
    }

    Ok(Move {
        start,
        end,
        piece,
        captured,
        special,
        nuked,
        rights_cleared,
        prior_en_passant,
        prior_move_rule_counter,
        conclusion,
        check: false,
    })
}

/// A royal was destroyed. Atomic games and royal-capture winners end at once; all-royals-captured
/// winners end when the victim has none left. Losing one's own royal in a blast counts as a
/// capture by the next opponent in turn order.
fn royal_loss(game: &Game, mover: Player, destroyed: &[PieceType]) -> Option<Conclusion> {
    for victim in destroyed.iter().filter(|p| p.is_royal() && p.player != mover) {
        if game.rules.atomic || game.rules.wins_by(mover, WinCondition::RoyalCapture) {
            return Some(Conclusion {
                victor: Some(mover),
                reason: ConclusionReason::RoyalCapture,
            });
        }
        if game.rules.wins_by(mover, WinCondition::AllRoyalsCaptured)
            && game.position.royals_of(victim.player).is_empty()
        {
            return Some(Conclusion {
                victor: Some(mover),
                reason: ConclusionReason::AllRoyalsCaptured,
            });
        }
    }
    if !destroyed.iter().any(|p| p.is_royal() && p.player == mover) {
        return None;
    }

    // The blast took the mover's own royal: the next player who would have won by taking it
    // wins instead.
    let orphaned = game.position.royals_of(mover).is_empty();
    let n = game.rules.turn_order.len();
    (1..=n)
        .map(|i| game.rules.player_at(game.turn_index + i))
        .filter(|&p| p != mover && p != Player::Neutral)
        .find_map(|p| {
            let reason = if game.rules.atomic || game.rules.wins_by(p, WinCondition::RoyalCapture) {
                ConclusionReason::RoyalCapture
            } else if orphaned && game.rules.wins_by(p, WinCondition::AllRoyalsCaptured) {
                ConclusionReason::AllRoyalsCaptured
            } else {
                return None;
            };
            Some(Conclusion {
                victor: Some(p),
                reason,
            })
        })
}

pub(crate) fn rewind(game: &mut Game, mv: &Move) -> GameResult<()> {
    let n = game.rules.turn_order.len();
    if game.turn_index == 0 {
        game.fullmove = game.fullmove.saturating_sub(1).max(1);
    }
    game.turn_index = (game.turn_index + n - 1) % n;
    game.en_passant = mv.prior_en_passant;
    game.move_rule_counter = mv.prior_move_rule_counter;

    for &(piece, c) in mv.nuked.iter().rev() {
        game.position.insert(piece, c)?;
    }
    game.position.remove(mv.end)?;
    if let Some(SpecialFlag::Castle { rook, direction }) = mv.special {
        let partner = game.position.remove(mv.start + Coord::new(direction, 0))?;
        game.position.insert(partner, rook)?;
    }
    game.position.insert(mv.piece, mv.start)?;
    if let (Some(captured), Some(at)) = (mv.captured, mv.capture_square()) {
        game.position.insert(captured, at)?;
    }
    for &c in &mv.rights_cleared {
        game.special_rights.insert(c);
    }
    Ok(())
}
