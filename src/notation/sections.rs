//! Section-by-section encoder and decoder.
//!
//! Sections appear in a fixed order and each is optional. The decoder reads one whitespace
//! delimited section at a time from a [`Cursor`], recognises its kind from its shape and
//! rejects sections that arrive out of order. No step looks at more than one section.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::chess::bounds::WorldBorder;
use crate::chess::piece::{PieceType, Player};
use crate::chess::rules::{GameRules, PromotionRule, WinCondition};
use crate::core::coord::Coord;
use crate::error::NotationError;
use crate::game::PlacedPiece;
use crate::notation::commands::extract_commands;
use crate::notation::cursor::{split_top_level, Cursor};
use crate::notation::record::{GameRecord, RecordedMove, DATE_KEY, VARIANT_KEY};
use crate::notation::tokens::{parse_piece_token, piece_token, token_len};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Section {
    TurnOrder,
    EnPassant,
    MoveRule,
    Fullmove,
    Promotions,
    WinConditions,
    ExtraRules,
    Position,
    Moves,
}

impl Section {
    fn name(self) -> &'static str {
        match self {
            Section::TurnOrder => "turn order",
            Section::EnPassant => "en passant",
            Section::MoveRule => "move rule",
            Section::Fullmove => "full-move number",
            Section::Promotions => "promotions",
            Section::WinConditions => "win conditions",
            Section::ExtraRules => "extra rules",
            Section::Position => "position",
            Section::Moves => "moves",
        }
    }

    fn recognise(s: &str) -> Section {
        if s.starts_with('(') {
            Section::Promotions
        } else if s.starts_with('{') {
            Section::ExtraRules
        } else if s.contains('>') {
            Section::Moves
        } else if s.bytes().all(|b| b.is_ascii_digit()) {
            Section::Fullmove
        } else if s.contains('/') {
            Section::MoveRule
        } else if s.parse::<Coord>().is_ok() {
            Section::EnPassant
        } else if s.split(':').all(|c| Player::from_code(c).is_some()) {
            Section::TurnOrder
        } else if s
            .split(['|', ','])
            .any(|w| WinCondition::from_name(w).is_some())
        {
            Section::WinConditions
        } else {
            Section::Position
        }
    }
}

/// Rules that have no section of their own, carried as a compact JSON object.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ExtraRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    slide_limit: Option<i64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    atomic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    world_border: Option<WorldBorder>,
}

const DEFAULT_TURN_ORDER: [Player; 2] = [Player::White, Player::Black];

fn valid_metadata_key(k: &str) -> bool {
    !k.is_empty() && k.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

pub(crate) fn encode(record: &GameRecord) -> Result<String, NotationError> {
    let rules = &record.rules;
    let players = rules.players();
    let mut out: Vec<String> = Vec::new();

    for (key, value) in &record.metadata {
        if !valid_metadata_key(key) || value.contains('"') {
            return Err(NotationError::malformed(
                "metadata cannot be encoded",
                format!("{key}: {value}"),
            ));
        }
        out.push(format!("[{key} \"{value}\"]"));
    }

    if rules.turn_order.is_empty() {
        return Err(NotationError::malformed("empty turn order", ""));
    }
    if rules.turn_order != DEFAULT_TURN_ORDER {
        let codes: Vec<&str> = rules.turn_order.iter().map(|p| p.code()).collect();
        out.push(codes.join(":"));
    }

    if let Some(ep) = record.en_passant {
        out.push(ep.to_string());
    }
    if let Some(limit) = rules.move_rule {
        out.push(format!("{}/{}", record.move_rule_counter, limit));
    }
    if record.fullmove != 1 {
        out.push(record.fullmove.to_string());
    }

    // A rule without ranks never fires, so it is written as no rule at all.
    let promoting = |p: &Player| rules.promotions.get(p).filter(|r| !r.ranks.is_empty());
    if players.iter().any(|p| promoting(p).is_some()) {
        let clauses: Vec<String> = players
            .iter()
            .map(|&p| promoting(&p).map_or_else(String::new, |rule| encode_promotion(p, rule)))
            .collect();
        out.push(format!("({})", clauses.join("|")));
    }

    if rules.win_conditions != GameRules::default_win_conditions(&rules.turn_order) {
        if players.iter().all(|&p| rules.win_conditions_for(p).is_empty()) {
            return Err(NotationError::malformed(
                "win conditions leave every player without a way to win",
                "",
            ));
        }
        let clauses: Vec<String> = players
            .iter()
            .map(|&p| {
                let names: Vec<&str> =
                    rules.win_conditions_for(p).iter().map(|w| w.name()).collect();
                names.join(",")
            })
            .collect();
        out.push(clauses.join("|"));
    }

    let extra = ExtraRules {
        slide_limit: rules.slide_limit,
        atomic: rules.atomic,
        world_border: rules.world_border,
    };
    if extra != ExtraRules::default() {
        let json = serde_json::to_string(&extra)
            .map_err(|e| NotationError::malformed("extra rules", e.to_string()))?;
        out.push(json);
    }

    if let Some(pieces) = &record.position {
        if !pieces.is_empty() {
            let entries: Vec<String> = pieces.iter().map(encode_placed).collect();
            out.push(entries.join("|"));
        }
    }

    if !record.moves.is_empty() {
        let moves = record
            .moves
            .iter()
            .map(encode_move)
            .collect::<Result<Vec<_>, _>>()?;
        out.push(moves.join("|"));
    }

    Ok(out.join(" "))
}

fn encode_promotion(player: Player, rule: &PromotionRule) -> String {
    let ranks: Vec<String> = rule.ranks.iter().map(i64::to_string).collect();
    let mut clause = ranks.join(",");
    if !rule.allowed.is_empty() {
        let kinds: Vec<String> = rule
            .allowed
            .iter()
            .map(|&raw| piece_token(PieceType::new(raw, player)))
            .collect();
        clause.push(';');
        clause.push_str(&kinds.join(","));
    }
    clause
}

fn encode_placed(p: &PlacedPiece) -> String {
    format!(
        "{}{}{}",
        piece_token(p.piece),
        p.coord,
        if p.special_right { "+" } else { "" }
    )
}

pub(crate) fn encode_move(m: &RecordedMove) -> Result<String, NotationError> {
    let mut s = format!("{}>{}", m.start, m.end);
    if let Some(p) = m.promotion {
        s.push('=');
        s.push_str(&piece_token(p));
    }
    if let Some(comment) = &m.comment {
        s.push('{');
        s.push_str(&comment.render()?);
        s.push('}');
    }
    Ok(s)
}

pub(crate) fn decode(text: &str) -> Result<GameRecord, NotationError> {
    let mut record = GameRecord::default();
    let mut cursor = Cursor::new(text);
    let mut next: Option<Section> = None;
    let mut saw_win_conditions = false;

    while let Some(section) = cursor.next_section()? {
        if section.starts_with('[') {
            if next.is_some() {
                return Err(NotationError::malformed("metadata after rules", section));
            }
            let (key, value) = decode_metadata(section)?;
            record.metadata.insert(key, value);
            continue;
        }

        let kind = Section::recognise(section);
        if next.is_some_and(|n| kind <= n) {
            return Err(NotationError::malformed(
                format!("{} out of order", kind.name()),
                section,
            ));
        }
        next = Some(kind);
        trace!(section = kind.name(), "decoding section");

        match kind {
            Section::TurnOrder => record.rules.turn_order = decode_turn_order(section)?,
            Section::EnPassant => record.en_passant = Some(decode_coord(section)?),
            Section::MoveRule => {
                let (counter, limit) = section
                    .split_once('/')
                    .ok_or_else(|| NotationError::malformed("move rule", section))?;
                record.move_rule_counter = decode_number(counter, section)?;
                record.rules.move_rule = Some(decode_number(limit, section)?);
            }
            Section::Fullmove => record.fullmove = decode_number(section, section)?,
            Section::Promotions => {
                record.rules.promotions = decode_promotions(section, &record.rules.players())?
            }
            Section::WinConditions => {
                record.rules.win_conditions =
                    decode_win_conditions(section, &record.rules.players())?;
                saw_win_conditions = true;
            }
            Section::ExtraRules => {
                let extra: ExtraRules = serde_json::from_str(section)
                    .map_err(|e| NotationError::malformed(format!("extra rules: {e}"), section))?;
                record.rules.slide_limit = extra.slide_limit;
                record.rules.atomic = extra.atomic;
                record.rules.world_border = extra.world_border;
            }
            Section::Position => record.position = Some(decode_position(section)?),
            Section::Moves => {
                record.moves = split_top_level(section, '|')
                    .into_iter()
                    .map(decode_move)
                    .collect::<Result<_, _>>()?;
            }
        }
    }

    if !saw_win_conditions {
        record.rules.win_conditions = GameRules::default_win_conditions(&record.rules.turn_order);
    }
    if record.position.is_none()
        && !record.metadata.contains_key(VARIANT_KEY)
        && !record.metadata.contains_key(DATE_KEY)
    {
        return Err(NotationError::MissingPosition);
    }
    Ok(record)
}

fn decode_metadata(s: &str) -> Result<(String, String), NotationError> {
    let err = || NotationError::malformed("metadata", s);
    let body = s
        .strip_prefix('[')
        .and_then(|b| b.strip_suffix(']'))
        .ok_or_else(err)?;
    let (key, quoted) = body.split_once(' ').ok_or_else(err)?;
    let value = quoted
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or_else(err)?;
    if !valid_metadata_key(key) || value.contains('"') {
        return Err(err());
    }
    Ok((key.to_string(), value.to_string()))
}

fn decode_turn_order(s: &str) -> Result<Vec<Player>, NotationError> {
    s.split(':')
        .map(|code| match Player::from_code(code) {
            Some(Player::Neutral) | None => Err(NotationError::malformed("turn order", s)),
            Some(p) => Ok(p),
        })
        .collect()
}

fn decode_coord(s: &str) -> Result<Coord, NotationError> {
    s.parse()
        .map_err(|_| NotationError::malformed("coordinate", s))
}

fn decode_number<T: std::str::FromStr>(s: &str, near: &str) -> Result<T, NotationError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(NotationError::malformed("number", near));
    }
    s.parse()
        .map_err(|_| NotationError::malformed("number out of range", near))
}

fn decode_promotions(
    s: &str,
    players: &[Player],
) -> Result<BTreeMap<Player, PromotionRule>, NotationError> {
    let body = s
        .strip_prefix('(')
        .and_then(|b| b.strip_suffix(')'))
        .ok_or_else(|| NotationError::malformed("promotions", s))?;
    let clauses: Vec<&str> = body.split('|').collect();
    if clauses.len() != players.len() {
        return Err(NotationError::RuleCountMismatch {
            section: "promotions",
            expected: players.len(),
            found: clauses.len(),
        });
    }

    let mut out = BTreeMap::new();
    for (&player, clause) in players.iter().zip(clauses) {
        if clause.is_empty() {
            continue;
        }
        let (ranks, kinds) = clause.split_once(';').unwrap_or((clause, ""));
        let ranks = if ranks.is_empty() {
            Vec::new()
        } else {
            ranks
                .split(',')
                .map(|r| {
                    r.parse::<i64>()
                        .map_err(|_| NotationError::malformed("promotion rank", clause))
                })
                .collect::<Result<Vec<_>, _>>()?
        };
        let allowed = if kinds.is_empty() {
            Vec::new()
        } else {
            kinds
                .split(',')
                .map(|t| match parse_piece_token(t) {
                    Some(p) if p.player == player => Ok(p.raw),
                    _ => Err(NotationError::malformed("promotion type", clause)),
                })
                .collect::<Result<Vec<_>, _>>()?
        };
        out.insert(player, PromotionRule { ranks, allowed });
    }
    Ok(out)
}

fn decode_win_conditions(
    s: &str,
    players: &[Player],
) -> Result<BTreeMap<Player, Vec<WinCondition>>, NotationError> {
    let clauses: Vec<&str> = s.split('|').collect();
    if clauses.len() != players.len() {
        return Err(NotationError::RuleCountMismatch {
            section: "win conditions",
            expected: players.len(),
            found: clauses.len(),
        });
    }
    let mut out = BTreeMap::new();
    for (&player, clause) in players.iter().zip(clauses) {
        let conditions = if clause.is_empty() {
            Vec::new()
        } else {
            clause
                .split(',')
                .map(|w| {
                    WinCondition::from_name(w)
                        .ok_or_else(|| NotationError::malformed("win condition", w))
                })
                .collect::<Result<Vec<_>, _>>()?
        };
        out.insert(player, conditions);
    }
    Ok(out)
}

fn decode_placed(entry: &str) -> Result<PlacedPiece, NotationError> {
    let err = || NotationError::malformed("position entry", entry);
    let len = token_len(entry);
    if len == 0 {
        return Err(err());
    }
    let piece = parse_piece_token(&entry[..len]).ok_or_else(err)?;
    let rest = &entry[len..];
    let (coord, special_right) = match rest.strip_suffix('+') {
        Some(c) => (c, true),
        None => (rest, false),
    };
    Ok(PlacedPiece {
        piece,
        coord: coord.parse().map_err(|_| err())?,
        special_right,
    })
}

fn decode_position(s: &str) -> Result<Vec<PlacedPiece>, NotationError> {
    s.split('|').map(decode_placed).collect()
}

pub(crate) fn decode_move(s: &str) -> Result<RecordedMove, NotationError> {
    let err = || NotationError::malformed("move", s);
    let (main, comment) = match s.find('{') {
        Some(i) => {
            let body = s[i + 1..].strip_suffix('}').ok_or_else(err)?;
            (&s[..i], Some(extract_commands(body)?))
        }
        None => (s, None),
    };
    let (squares, promotion) = match main.split_once('=') {
        Some((sq, token)) => (sq, Some(parse_piece_token(token).ok_or_else(err)?)),
        None => (main, None),
    };
    let (start, end) = squares.split_once('>').ok_or_else(err)?;
    Ok(RecordedMove {
        start: start.parse().map_err(|_| err())?,
        end: end.parse().map_err(|_| err())?,
        promotion,
        comment,
    })
}
