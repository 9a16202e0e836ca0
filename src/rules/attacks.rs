//! Square-attacked detection.
//!
//! Works backwards from the target: jump offsets are tried in reverse, pawns by their capture
//! diagonals, line sliders through the organized-line index of the target and off-line sliders
//! (knightriders) through their type lists.

use crate::chess::moveset::{all_jump_offsets, has_off_line_slides, jump_offsets, moveset_for};
use crate::chess::piece::{PieceType, Player, RawKind};
use crate::chess::rules::GameRules;
use crate::core::coord::{Coord, LineKind};
use crate::core::position::Position;
use crate::rules::movegen::nearest_on_ray;

/// One piece attacking a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attack {
    pub from: Coord,
    pub piece: PieceType,
    /// Unit step from the attacker towards the target for sliding attacks.
    pub step: Option<Coord>,
    /// Steps between attacker and target along `step`.
    pub distance: i64,
}

#[inline]
fn hostile(piece: PieceType, victim: Player) -> bool {
    piece.player != victim && piece.player != Player::Neutral
}

/// All pieces attacking `target` on behalf of any opponent of `victim`.
pub fn attackers_of(
    position: &Position,
    rules: &GameRules,
    target: Coord,
    victim: Player,
) -> Vec<Attack> {
    let mut out = Vec::new();
    collect(position, rules, target, victim, &mut out, false);
    out
}

pub fn is_square_attacked(
    position: &Position,
    rules: &GameRules,
    target: Coord,
    victim: Player,
) -> bool {
    let mut out = Vec::with_capacity(1);
    collect(position, rules, target, victim, &mut out, true);
    !out.is_empty()
}

fn collect(
    position: &Position,
    rules: &GameRules,
    target: Coord,
    victim: Player,
    out: &mut Vec<Attack>,
    first_only: bool,
) {
    macro_rules! found {
        ($attack:expr) => {{
            out.push($attack);
            if first_only {
                return;
            }
        }};
    }

    for &offset in all_jump_offsets() {
        let from = target - offset;
        let Some(piece) = position.piece_at(from) else {
            continue;
        };
        if hostile(piece, victim) && jump_offsets(piece.raw).contains(&offset) {
            found!(Attack {
                from,
                piece,
                step: None,
                distance: 1,
            });
        }
    }

    for player in rules.players() {
        if player == victim {
            continue;
        }
        let Some(forward) = player.forward() else {
            continue;
        };
        let side = Coord::new(forward.y.abs(), forward.x.abs());
        for from in [target - forward - side, target - forward + side] {
            if let Some(piece) = position.piece_at(from) {
                if piece.raw == RawKind::Pawn && piece.player == player {
                    found!(Attack {
                        from,
                        piece,
                        step: None,
                        distance: 1,
                    });
                }
            }
        }
    }

    for kind in LineKind::ALL {
        let step = kind.step();
        let (behind, ahead) = position.lines().nearest(kind, target);
        // `behind` travels +step to reach the target, `ahead` travels -step.
        for (blocker, sign) in [(behind, 1), (ahead, -1)] {
            let Some(b) = blocker else {
                continue;
            };
            if !hostile(b.piece, victim) {
                continue;
            }
            let reaches = moveset_for(b.piece, rules.slide_limit)
                .slide_extent(step)
                .is_some_and(|e| e.contains(b.distance * sign));
            if reaches {
                found!(Attack {
                    from: b.coord,
                    piece: b.piece,
                    step: Some(step * sign),
                    distance: b.distance,
                });
            }
        }
    }

    for (piece, list) in position.type_lists().iter() {
        if !hostile(piece, victim) || !has_off_line_slides(piece.raw) {
            continue;
        }
        let moveset = moveset_for(piece, rules.slide_limit);
        for from in list.coords() {
            for &(dir, extent) in &moveset.sliding {
                if LineKind::for_direction(dir).is_some() {
                    continue;
                }
                let Some(k) = (target - from).steps_along(dir) else {
                    continue;
                };
                if !extent.contains(k) {
                    continue;
                }
                let unit = dir * k.signum();
                let clear =
                    nearest_on_ray(position, from, unit).map_or(true, |b| b.distance >= k.abs());
                if clear {
                    found!(Attack {
                        from,
                        piece,
                        step: Some(unit),
                        distance: k.abs(),
                    });
                }
            }
        }
    }
}
