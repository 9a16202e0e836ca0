//! Special-move recognition: pawn pushes and captures, castling, promotion choice.
//!
//! Nothing here fails for "no special move applies"; candidates that do not qualify are simply
//! not produced.

use crate::chess::moves::{MoveDraft, SpecialFlag};
use crate::chess::piece::{PieceType, RawKind};
use crate::core::coord::{Coord, LineKind};
use crate::error::{GameResult, MoveError};
use crate::game::Game;
use crate::rules::attacks::is_square_attacked;
use crate::rules::movegen::{pseudo_legal_moves, Destination};

/// Minimum distance between a castling royal and its partner.
pub const CASTLE_MIN_DISTANCE: i64 = 3;

fn inside(game: &Game, c: Coord) -> bool {
    c.in_range() && game.rules.world_border.map_or(true, |b| b.contains(c))
}

/// Pushes, the double push, diagonal captures and en passant for a pawn on `from`.
pub fn pawn_destinations(game: &Game, from: Coord, piece: PieceType) -> Vec<Destination> {
    let Some(forward) = piece.player.forward() else {
        return Vec::new();
    };
    let promotes = |c: Coord| game.rules.promotes_on(piece.player, piece.player.rank_of(c));
    let mut out = Vec::new();

    let one = from + forward;
    if inside(game, one) && !game.position.is_occupied(one) {
        out.push(Destination {
            coord: one,
            special: None,
            promotes: promotes(one),
        });
        let two = from + forward * 2;
        if game.has_special_right(from) && inside(game, two) && !game.position.is_occupied(two) {
            out.push(Destination {
                coord: two,
                special: Some(SpecialFlag::DoublePush),
                promotes: promotes(two),
            });
        }
    }

    let side = Coord::new(forward.y.abs(), forward.x.abs());
    for c in [from + forward + side, from + forward - side] {
        if !inside(game, c) {
            continue;
        }
        match game.position.piece_at(c) {
            Some(target) => {
                if piece.can_capture(target) {
                    out.push(Destination {
                        coord: c,
                        special: None,
                        promotes: promotes(c),
                    });
                }
            }
            None => {
                let Some(ep) = game.en_passant else {
                    continue;
                };
                let capturable = game
                    .position
                    .piece_at(ep.pawn)
                    .is_some_and(|t| piece.can_capture(t));
                if ep.square == c && ep.player == piece.player && capturable {
                    out.push(Destination {
                        coord: c,
                        special: Some(SpecialFlag::EnPassant { capture: ep.pawn }),
                        promotes: promotes(c),
                    });
                }
            }
        }
    }
    out
}

/// Castling candidates for a jumping royal holding its special right.
///
/// The partner is the nearest piece along the royal's row on each side. It must belong to the
/// same player, hold its own special right, be neither royal nor a pawn, and stand at least
/// [`CASTLE_MIN_DISTANCE`] away. The royal may not be in check or cross an attacked square.
pub fn castling_destinations(game: &Game, from: Coord, piece: PieceType) -> Vec<Destination> {
    if !piece.is_jumping_royal() || !game.has_special_right(from) {
        return Vec::new();
    }
    let mover = piece.player;
    let attacked = |c: Coord| is_square_attacked(&game.position, &game.rules, c, mover);
    if attacked(from) {
        return Vec::new();
    }

    let (left, right) = game.position.lines().nearest(LineKind::Row, from);
    let mut out = Vec::new();
    for (partner, direction) in [(left, -1), (right, 1)] {
        let Some(partner) = partner else {
            continue;
        };
        if partner.distance < CASTLE_MIN_DISTANCE
            || partner.piece.player != mover
            || partner.piece.is_royal()
            || partner.piece.raw == RawKind::Pawn
            || !game.has_special_right(partner.coord)
        {
            continue;
        }
        let step = Coord::new(direction, 0);
        let land = from + step * 2;
        if !inside(game, land) || attacked(from + step) || attacked(land) {
            continue;
        }
        out.push(Destination {
            coord: land,
            special: Some(SpecialFlag::Castle {
                rook: partner.coord,
                direction,
            }),
            promotes: false,
        });
    }
    out
}

/// A royal moving two squares along its row: only castling produces that shape.
pub fn looks_like_castle(piece: PieceType, draft: MoveDraft) -> bool {
    let d = draft.end - draft.start;
    piece.is_jumping_royal() && d.y == 0 && d.x.abs() == 2
}

/// Settles the flag of a chosen destination, validating any requested promotion.
pub fn resolve(
    game: &Game,
    piece: PieceType,
    dest: &Destination,
    requested: Option<PieceType>,
) -> Result<Option<SpecialFlag>, MoveError> {
    if !dest.promotes {
        return match requested {
            Some(t) => Err(MoveError::IllegalPromotionType { requested: t }),
            None => Ok(dest.special),
        };
    }
    let requested = requested.ok_or(MoveError::IllegalPromotionType { requested: piece })?;
    let allowed = requested.player == piece.player
        && game
            .rules
            .promotion_for(piece.player)
            .is_some_and(|r| r.allows(requested.raw));
    if !allowed {
        return Err(MoveError::IllegalPromotionType { requested });
    }
    Ok(Some(SpecialFlag::Promotion {
        new_type: requested,
        en_passant: dest.special.and_then(SpecialFlag::en_passant_capture),
    }))
}

/// The special flag `from -> to` would carry, if it is a pseudo-legal move at all.
pub fn detect(game: &Game, from: Coord, to: Coord) -> GameResult<Option<SpecialFlag>> {
    let moves = pseudo_legal_moves(game, from)?;
    Ok(moves.destination(from, to).and_then(|d| d.special))
}
