//! Piece tokens: uppercase for white, lowercase for black, a numeric player prefix otherwise.
//!
//! `Q` white queen, `q` black queen, `3Q` red queen, `0VO` neutral void.

use crate::chess::piece::{PieceType, Player, RawKind};

pub fn piece_token(piece: PieceType) -> String {
    let abbr = piece.raw.abbreviation();
    match piece.player {
        Player::White => abbr.to_string(),
        Player::Black => abbr.to_ascii_lowercase(),
        other => format!("{}{}", other.number(), abbr),
    }
}

pub fn parse_piece_token(s: &str) -> Option<PieceType> {
    let prefix = s.bytes().take_while(u8::is_ascii_digit).count();
    if prefix > 0 {
        let player = Player::from_number(s[..prefix].parse().ok()?)?;
        let raw = RawKind::from_abbreviation(&s[prefix..])?;
        return Some(PieceType::new(raw, player));
    }
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    if s.bytes().all(|b| b.is_ascii_uppercase()) {
        return RawKind::from_abbreviation(s).map(|raw| PieceType::new(raw, Player::White));
    }
    if s.bytes().all(|b| b.is_ascii_lowercase()) {
        let raw = RawKind::from_abbreviation(&s.to_ascii_uppercase())?;
        return Some(PieceType::new(raw, Player::Black));
    }
    None
}

/// Length of the token at the start of `s` (digits then letters).
pub(crate) fn token_len(s: &str) -> usize {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    let letters = s[digits..]
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .count();
    if letters == 0 {
        0
    } else {
        digits + letters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_by_owner() {
        for raw in RawKind::ALL {
            for player in Player::ALL {
                let piece = PieceType::new(raw, player);
                assert_eq!(parse_piece_token(&piece_token(piece)), Some(piece));
            }
        }
        assert_eq!(parse_piece_token("Kq"), None);
        assert_eq!(parse_piece_token("9Q"), None);
        assert_eq!(token_len("0VO3,4"), 3);
        assert_eq!(token_len("-3,4"), 0);
    }
}
