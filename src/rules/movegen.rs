//! Legal move calculator.
//!
//! Pseudo-legal generation uses only occupancy: jumps are filtered by the destination, rays are
//! clamped at the first blocker (found through the organized lines), the slide limit and the
//! world border. Rays stay symbolic, so an unbounded ray costs the same as a short one.
//!
//! Check legality is layered on top by simulating candidates. Rays are never walked square by
//! square: only the squares where an attack line crosses the ray are simulated.

use tracing::trace;

use crate::chess::moves::SpecialFlag;
use crate::chess::moveset::{moveset_for, SlideExtent};
use crate::chess::piece::{PieceType, Player, RawKind};
use crate::chess::rules::PromotionRule;
use crate::core::coord::{crossing, Coord, Crossing, LineKind};
use crate::core::lines::Blocker;
use crate::core::position::Position;
use crate::error::{GameResult, PositionError};
use crate::game::Game;
use crate::rules::attacks::{attackers_of, is_square_attacked, Attack};
use crate::rules::special;

/// A single reachable square with whatever special handling it needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub coord: Coord,
    pub special: Option<SpecialFlag>,
    /// The mover must promote on arrival.
    pub promotes: bool,
}

impl Destination {
    pub fn plain(coord: Coord) -> Self {
        Self {
            coord,
            special: None,
            promotes: false,
        }
    }
}

/// Reachable squares of one piece: explicit squares plus symbolic rays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegalMoves {
    pub individual: Vec<Destination>,
    /// Lowest-terms direction and a reachable step range along it. A direction appears more
    /// than once when its reachable steps have gaps.
    pub sliding: Vec<(Coord, SlideExtent)>,
}

impl LegalMoves {
    pub fn is_empty(&self) -> bool {
        self.individual.is_empty() && self.sliding.iter().all(|(_, e)| e.is_immobile())
    }

    pub fn contains(&self, from: Coord, to: Coord) -> bool {
        self.destination(from, to).is_some()
    }

    /// The destination record for `to`, preferring explicit squares (they carry flags).
    pub fn destination(&self, from: Coord, to: Coord) -> Option<Destination> {
        if let Some(d) = self.individual.iter().find(|d| d.coord == to) {
            return Some(*d);
        }
        let on_ray = self.sliding.iter().any(|&(dir, extent)| {
            (to - from)
                .steps_along(dir)
                .is_some_and(|k| extent.contains(k))
        });
        on_ray.then(|| Destination::plain(to))
    }

    /// Squares along one signed direction, nearest first. `None` if that side is unbounded.
    pub fn ray_squares(&self, from: Coord, dir: Coord) -> Option<Vec<Coord>> {
        let mut out = Vec::new();
        for &(canonical, extent) in &self.sliding {
            // Reachable step counts towards `dir` are `lo..=hi`.
            let (lo, hi) = if canonical == dir {
                (extent.min.map_or(1, |m| m.max(1)), extent.max)
            } else if canonical == -dir {
                (extent.max.map_or(1, |m| (-m).max(1)), extent.min.map(|m| -m))
            } else {
                continue;
            };
            out.extend((lo..=hi?).map(|k| from + dir * k));
        }
        out.sort_unstable_by_key(|&c| (c - from).chebyshev_norm());
        Some(out)
    }

    /// Every reachable square when all rays are bounded.
    pub fn finite_squares(&self, from: Coord) -> Option<Vec<Coord>> {
        let mut out: Vec<Coord> = self.individual.iter().map(|d| d.coord).collect();
        for &(dir, _) in &self.sliding {
            out.extend(self.ray_squares(from, dir)?);
            out.extend(self.ray_squares(from, -dir)?);
        }
        out.sort_unstable();
        out.dedup();
        Some(out)
    }
}

/// Nearest piece from `from` along a signed direction.
pub fn nearest_on_ray(position: &Position, from: Coord, dir: Coord) -> Option<Blocker> {
    if LineKind::for_direction(dir).is_some() {
        return position.nearest_along(from, dir);
    }
    let mut best: Option<Blocker> = None;
    for (coord, piece) in position.iter() {
        let Some(k) = (coord - from).steps_along(dir) else {
            continue;
        };
        if k > 0 && best.map_or(true, |b| k < b.distance) {
            best = Some(Blocker {
                distance: k,
                piece,
                coord,
            });
        }
    }
    best
}

fn clamp_ray(
    game: &Game,
    from: Coord,
    piece: PieceType,
    dir: Coord,
    extent: SlideExtent,
) -> SlideExtent {
    let mut ext = extent;
    for sign in [1, -1] {
        let signed = dir * sign;
        let mut reach: Option<i64> = None;
        if let Some(b) = nearest_on_ray(&game.position, from, signed) {
            reach = Some(if piece.can_capture(b.piece) {
                b.distance
            } else {
                b.distance - 1
            });
        }
        if let Some(border) = game.rules.world_border {
            let inside = border.steps_inside(from, signed);
            reach = Some(reach.map_or(inside, |r| r.min(inside)));
        }
        if let Some(r) = reach {
            if sign > 0 {
                ext.cap_max(r);
            } else {
                ext.cap_min(r);
            }
        }
    }
    ext
}

/// Destinations ignoring check.
pub fn pseudo_legal_moves(game: &Game, from: Coord) -> GameResult<LegalMoves> {
    let piece = game
        .position
        .piece_at(from)
        .ok_or(PositionError::NotFound(from))?;
    let mut out = LegalMoves::default();
    if piece.player == Player::Neutral {
        return Ok(out);
    }
    if piece.raw == RawKind::Pawn {
        out.individual = special::pawn_destinations(game, from, piece);
        return Ok(out);
    }

    let moveset = moveset_for(piece, game.rules.slide_limit);
    for &offset in &moveset.individual {
        let to = from + offset;
        if !to.in_range() || game.rules.world_border.is_some_and(|b| !b.contains(to)) {
            continue;
        }
        if let Some(target) = game.position.piece_at(to) {
            if !piece.can_capture(target) {
                continue;
            }
        }
        out.individual.push(Destination::plain(to));
    }
    out.individual
        .extend(special::castling_destinations(game, from, piece));

    for &(dir, extent) in &moveset.sliding {
        let ext = clamp_ray(game, from, piece, dir, extent);
        if !ext.is_immobile() {
            out.sliding.push((dir, ext));
        }
    }
    Ok(out)
}

/// Destinations that do not leave the mover's royals attacked.
pub fn legal_moves(game: &mut Game, from: Coord) -> GameResult<LegalMoves> {
    let pseudo = pseudo_legal_moves(game, from)?;
    let piece = game
        .position
        .piece_at(from)
        .ok_or(PositionError::NotFound(from))?;
    let mover = piece.player;
    if !game.rules.check_matters_for(mover) || game.position.royals_of(mover).is_empty() {
        return Ok(pseudo);
    }

    let mut out = LegalMoves::default();
    for dest in pseudo.individual {
        if is_safe(game, from, piece, dest)? {
            out.individual.push(dest);
        }
    }
    if pseudo.sliding.is_empty() {
        return Ok(out);
    }
    if piece.is_royal() {
        for (dir, extent) in pseudo.sliding {
            royal_ray(game, from, piece, dir, extent, &mut out)?;
        }
    } else {
        filter_rays(game, from, piece, pseudo.sliding, &mut out)?;
    }
    Ok(out)
}

/// Whether playing `dest` keeps every royal of the mover safe.
fn is_safe(game: &mut Game, from: Coord, piece: PieceType, dest: Destination) -> GameResult<bool> {
    // Legality is judged with the first allowed promotion type.
    let flag = if dest.promotes {
        let kind = game
            .rules
            .promotion_for(piece.player)
            .map_or(PromotionRule::CLASSICAL[0], |r| r.allowed_kinds()[0]);
        Some(SpecialFlag::Promotion {
            new_type: PieceType::new(kind, piece.player),
            en_passant: dest.special.and_then(SpecialFlag::en_passant_capture),
        })
    } else {
        dest.special
    };
    let mover = piece.player;
    let safe = game.probe(from, dest.coord, flag, |g, mv| {
        if mv
            .conclusion
            .is_some_and(|c| c.victor == Some(mover))
        {
            return true;
        }
        if mv.nuked.iter().any(|(p, _)| p.player == mover && p.is_royal()) {
            return false;
        }
        g.position
            .royals_of(mover)
            .into_iter()
            .all(|r| !is_square_attacked(&g.position, &g.rules, r, mover))
    })?;
    trace!(%from, to = %dest.coord, safe, "legality check");
    Ok(safe)
}

fn filter_rays(
    game: &mut Game,
    from: Coord,
    piece: PieceType,
    rays: Vec<(Coord, SlideExtent)>,
    out: &mut LegalMoves,
) -> GameResult<()> {
    let mover = piece.player;
    let threats = game.with_lifted(from, |g| {
        g.position
            .royals_of(mover)
            .into_iter()
            .flat_map(|r| attackers_of(&g.position, &g.rules, r, mover))
            .collect::<Vec<_>>()
    })?;

    if threats.is_empty() {
        // Quiet ray squares are safe; only a capture at a ray end can change anything
        // (atomic explosions).
        for (dir, mut extent) in rays {
            for sign in [1, -1] {
                let reach = if sign > 0 {
                    extent.max
                } else {
                    extent.min.map(|m| -m)
                };
                let Some(k) = reach.filter(|&k| k >= 1) else {
                    continue;
                };
                let end = from + dir * (sign * k);
                if !game.position.is_occupied(end) {
                    continue;
                }
                if !is_safe(game, from, piece, Destination::plain(end))? {
                    if sign > 0 {
                        extent.cap_max(k - 1);
                    } else {
                        extent.cap_min(k - 1);
                    }
                }
            }
            if !extent.is_immobile() {
                out.sliding.push((dir, extent));
            }
        }
        return Ok(());
    }

    // Something attacks a royal once the mover is lifted: the move has to capture or block
    // every one of those attacks.
    for (dir, extent) in rays {
        let answers: Vec<Answers> = threats.iter().map(|a| answers_to(a, from, dir)).collect();
        let answers_all =
            |k: i64| answers.iter().all(|a| a.steps.contains(&k) || a.span_contains(k));
        let span = answers
            .iter()
            .try_fold((i64::MIN, i64::MAX), |(lo, hi), a| {
                a.span.map(|(from, to)| (lo.max(from), hi.min(to)))
            });

        if let Some((lo, hi)) = span {
            let lo = extent.min.map_or(lo, |m| lo.max(m));
            let hi = extent.max.map_or(hi, |m| hi.min(m));
            let blocking = SlideExtent {
                min: Some(lo),
                max: Some(hi),
            };
            if lo <= hi && !blocking.is_immobile() {
                out.sliding.push((dir, blocking));
            }
        }

        // Captures at the ray ends stay candidates: an explosion may remove an attacker.
        let ends = [extent.max, extent.min]
            .into_iter()
            .flatten()
            .filter(|&k| k != 0 && game.position.is_occupied(from + dir * k));
        let mut steps: Vec<i64> = answers
            .iter()
            .flat_map(|a| a.steps.iter().copied())
            .filter(|&k| answers_all(k))
            .chain(ends)
            .collect();
        steps.sort_unstable();
        steps.dedup();
        for k in steps {
            let in_span = span.is_some_and(|(lo, hi)| lo <= k && k <= hi);
            if in_span || !extent.contains(k) {
                continue;
            }
            let sq = from + dir * k;
            if out.individual.iter().any(|d| d.coord == sq) {
                continue;
            }
            if is_safe(game, from, piece, Destination::plain(sq))? {
                out.individual.push(Destination::plain(sq));
            }
        }
    }
    Ok(())
}

/// Steps along one ray line that deal with a single attack.
struct Answers {
    /// Capturing the attacker or stepping onto the attack line.
    steps: Vec<i64>,
    /// Steps strictly between attacker and royal when the ray runs along the attack line.
    span: Option<(i64, i64)>,
}

impl Answers {
    fn span_contains(&self, k: i64) -> bool {
        self.span.is_some_and(|(lo, hi)| lo <= k && k <= hi)
    }
}

fn answers_to(attack: &Attack, from: Coord, dir: Coord) -> Answers {
    let step_to = |c: Coord| (c - from).steps_along(dir).filter(|&k| k != 0);
    let mut out = Answers {
        steps: step_to(attack.from).into_iter().collect(),
        span: None,
    };
    let Some(step) = attack.step else {
        return out;
    };
    let target = attack.from + step * attack.distance;
    match crossing(from, dir, attack.from, step) {
        // A crossing inside the attack path lies between two in-range squares.
        Crossing::At(k) if k != 0 && k.unsigned_abs() <= 4 * Coord::LIMIT.unsigned_abs() => {
            let on_path = (from + dir * k - attack.from)
                .steps_along(step)
                .is_some_and(|i| i >= 1 && i < attack.distance);
            if on_path {
                out.steps.push(k);
            }
        }
        Crossing::Along => {
            if let (Some(a), Some(b)) = (
                (attack.from - from).steps_along(dir),
                (target - from).steps_along(dir),
            ) {
                out.span = Some((a.min(b) + 1, a.max(b) - 1));
            }
        }
        Crossing::At(_) | Crossing::Apart => {}
    }
    out
}

/// Signed steps along `dir` where the safety of a royal landing on the ray can change.
///
/// These are the squares hostile pieces jump to, the crossings with every line through a
/// piece along a hostile sliding direction, and the reach limits of sliders sharing the ray's
/// line. Between two such steps every square is equally safe.
fn critical_steps(game: &Game, from: Coord, mover: Player, dir: Coord) -> Vec<i64> {
    let hostile = |p: PieceType| p.player != mover && p.player != Player::Neutral;
    let limit = game.rules.slide_limit;
    let mut slide_dirs: Vec<Coord> = Vec::new();
    for (piece, _) in game.position.type_lists().iter() {
        if !hostile(piece) {
            continue;
        }
        for (d, _) in moveset_for(piece, limit).sliding {
            if !slide_dirs.contains(&d) {
                slide_dirs.push(d);
            }
        }
    }

    let step_to = |c: Coord| (c - from).steps_along(dir).filter(|&k| k != 0);
    let mut out = Vec::new();
    for (at, piece) in game.position.iter() {
        if at == from {
            continue;
        }
        for &d in &slide_dirs {
            match crossing(from, dir, at, d) {
                Crossing::At(k) => out.push(k),
                Crossing::Along => {
                    if let Some(k) = step_to(at) {
                        out.push(k);
                        if let Some(l) = limit {
                            out.extend([k.saturating_sub(l), k.saturating_add(l)]);
                        }
                    }
                }
                Crossing::Apart => {}
            }
        }
        if !hostile(piece) {
            continue;
        }
        if piece.raw == RawKind::Pawn {
            if let Some(forward) = piece.player.forward() {
                let side = Coord::new(forward.y.abs(), forward.x.abs());
                let captures = [at + forward + side, at + forward - side];
                out.extend(captures.into_iter().filter_map(step_to));
            }
        } else {
            out.extend(
                moveset_for(piece, limit)
                    .individual
                    .iter()
                    .filter_map(|&o| step_to(at + o)),
            );
        }
    }
    out
}

/// Royal sliders are tested only on the critical steps of each ray and their neighbours. The
/// verdict of a tested square holds up to the next tested one, and the last verdict holds to
/// the end of the ray.
fn royal_ray(
    game: &mut Game,
    from: Coord,
    piece: PieceType,
    dir: Coord,
    extent: SlideExtent,
    out: &mut LegalMoves,
) -> GameResult<()> {
    let critical = critical_steps(game, from, piece.player, dir);
    let mut prefix = SlideExtent::symmetric(Some(0));

    for sign in [1i64, -1] {
        let limit = if sign > 0 {
            extent.max
        } else {
            extent.min.map(|m| -m)
        };
        let reachable = |k: i64| {
            k >= 1
                && limit.map_or(true, |l| k <= l)
                && k <= 2 * Coord::LIMIT
                && (from + dir * (sign * k)).in_range()
        };
        let mut points: Vec<i64> = critical
            .iter()
            .filter_map(|&k| k.checked_mul(sign))
            .flat_map(|k| [k.saturating_sub(1), k, k.saturating_add(1)])
            .chain([1])
            .chain(limit)
            .filter(|&k| reachable(k))
            .collect();
        points.sort_unstable();
        points.dedup();

        // Safe step ranges, `None` running to the end of the ray.
        let mut runs: Vec<(i64, Option<i64>)> = Vec::new();
        for (i, &k) in points.iter().enumerate() {
            if !is_safe(game, from, piece, Destination::plain(from + dir * (sign * k)))? {
                continue;
            }
            let end = match points.get(i + 1) {
                Some(&next) => Some(next - 1),
                None => limit,
            };
            match runs.last_mut() {
                Some((_, last)) if *last == Some(k - 1) => *last = end,
                _ => runs.push((k, end)),
            }
        }

        for (lo, hi) in runs {
            if lo == 1 {
                if sign > 0 {
                    prefix.max = hi;
                } else {
                    prefix.min = hi.map(|h| -h);
                }
            } else if hi == Some(lo) {
                out.individual
                    .push(Destination::plain(from + dir * (sign * lo)));
            } else {
                let segment = if sign > 0 {
                    SlideExtent { min: Some(lo), max: hi }
                } else {
                    SlideExtent {
                        min: hi.map(|h| -h),
                        max: Some(-lo),
                    }
                };
                out.sliding.push((dir, segment));
            }
        }
    }
    if !prefix.is_immobile() {
        out.sliding.push((dir, prefix));
    }
    Ok(())
}
