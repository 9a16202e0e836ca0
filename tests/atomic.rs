use infinite_chess_core::chess::moves::{ConclusionReason, MoveDraft};
use infinite_chess_core::chess::piece::{PieceType, Player, RawKind};
use infinite_chess_core::chess::rules::{GameRules, WinCondition};
use infinite_chess_core::core::coord::{Coord, KING_STEPS};
use infinite_chess_core::error::{GameError, MoveError};
use infinite_chess_core::game::{Game, PlacedPiece};

fn w(raw: RawKind) -> PieceType {
    PieceType::new(raw, Player::White)
}

fn b(raw: RawKind) -> PieceType {
    PieceType::new(raw, Player::Black)
}

fn c(x: i64, y: i64) -> Coord {
    Coord::new(x, y)
}

fn atomic_rules() -> GameRules {
    GameRules {
        atomic: true,
        ..GameRules::default()
    }
}

const TARGET: Coord = Coord { x: 5, y: 5 };

#[test]
fn capture_explodes_the_neighbourhood() {
    let mut pieces = vec![
        PlacedPiece::new(w(RawKind::King), c(-20, -20)),
        PlacedPiece::new(b(RawKind::King), c(20, 20)),
        PlacedPiece::new(w(RawKind::Knight), c(3, 4)),
        PlacedPiece::new(b(RawKind::Rook), TARGET),
    ];
    for step in KING_STEPS {
        pieces.push(PlacedPiece::new(b(RawKind::Pawn), TARGET + step));
    }
    let mut game = Game::new(atomic_rules(), pieces).unwrap();
    assert_eq!(game.position().len(), 12);

    let played = game
        .make_move(MoveDraft::new(c(3, 4), TARGET))
        .unwrap()
        .clone();
    assert_eq!(played.captured, Some(b(RawKind::Rook)));
    assert_eq!(played.nuked.len(), 8);
    for step in KING_STEPS {
        assert!(game.position().piece_at(TARGET + step).is_none());
    }
    assert_eq!(game.position().piece_at(TARGET), Some(w(RawKind::Knight)));
    assert_eq!(game.position().len(), 3);
    assert_eq!(game.conclusion(), None);
    game.position().check_consistency().unwrap();

    game.undo().unwrap();
    assert_eq!(game.position().len(), 12);
    assert_eq!(game.position().piece_at(TARGET), Some(b(RawKind::Rook)));
    assert_eq!(game.position().piece_at(c(3, 4)), Some(w(RawKind::Knight)));
    game.position().check_consistency().unwrap();
}

#[test]
fn voids_survive_the_blast() {
    let void = PieceType::new(RawKind::Void, Player::Neutral);
    let pieces = vec![
        PlacedPiece::new(w(RawKind::King), c(-20, -20)),
        PlacedPiece::new(b(RawKind::King), c(20, 20)),
        PlacedPiece::new(w(RawKind::Knight), c(3, 4)),
        PlacedPiece::new(b(RawKind::Rook), TARGET),
        PlacedPiece::new(void, c(6, 6)),
        PlacedPiece::new(b(RawKind::Bishop), c(4, 6)),
    ];
    let mut game = Game::new(atomic_rules(), pieces).unwrap();
    game.make_move(MoveDraft::new(c(3, 4), TARGET)).unwrap();
    assert_eq!(game.position().piece_at(c(6, 6)), Some(void));
    assert!(game.position().piece_at(c(4, 6)).is_none());
}

#[test]
fn blowing_up_the_enemy_royal_wins() {
    let pieces = vec![
        PlacedPiece::new(w(RawKind::King), c(-20, -20)),
        PlacedPiece::new(b(RawKind::King), c(6, 6)),
        PlacedPiece::new(w(RawKind::Knight), c(3, 4)),
        PlacedPiece::new(b(RawKind::Pawn), TARGET),
    ];
    let mut game = Game::new(atomic_rules(), pieces).unwrap();
    let played = game
        .make_move(MoveDraft::new(c(3, 4), TARGET))
        .unwrap()
        .clone();
    let conclusion = played.conclusion.unwrap();
    assert_eq!(conclusion.victor, Some(Player::White));
    assert_eq!(conclusion.reason, ConclusionReason::RoyalCapture);
    assert!(game.is_over());

    let err = game.make_move(MoveDraft::new(c(-20, -20), c(-20, -19)));
    assert_eq!(err.unwrap_err(), GameError::Move(MoveError::GameOver));

    game.undo().unwrap();
    assert!(!game.is_over());
    assert_eq!(game.position().piece_at(c(6, 6)), Some(b(RawKind::King)));
}

#[test]
fn blowing_up_your_own_royal_is_illegal() {
    let pieces = vec![
        PlacedPiece::new(w(RawKind::King), c(6, 4)),
        PlacedPiece::new(b(RawKind::King), c(20, 20)),
        PlacedPiece::new(w(RawKind::Knight), c(3, 4)),
        PlacedPiece::new(b(RawKind::Rook), TARGET),
    ];
    let mut game = Game::new(atomic_rules(), pieces).unwrap();
    assert!(!game.legal_moves(c(3, 4)).unwrap().contains(c(3, 4), TARGET));
    let err = game.make_move(MoveDraft::new(c(3, 4), TARGET)).unwrap_err();
    assert_eq!(
        err,
        GameError::Move(MoveError::IllegalMove {
            start: c(3, 4),
            end: TARGET
        })
    );
}

#[test]
fn losing_your_own_royal_to_a_blast_hands_the_game_over() {
    let mut rules = atomic_rules();
    for conditions in rules.win_conditions.values_mut() {
        *conditions = vec![WinCondition::RoyalCapture];
    }
    let pieces = vec![
        PlacedPiece::new(w(RawKind::King), c(6, 4)),
        PlacedPiece::new(b(RawKind::King), c(20, 20)),
        PlacedPiece::new(w(RawKind::Knight), c(3, 4)),
        PlacedPiece::new(b(RawKind::Rook), TARGET),
    ];
    let mut game = Game::new(rules, pieces).unwrap();
    assert!(game.legal_moves(c(3, 4)).unwrap().contains(c(3, 4), TARGET));

    let played = game
        .make_move(MoveDraft::new(c(3, 4), TARGET))
        .unwrap()
        .clone();
    assert!(played.nuked.contains(&(w(RawKind::King), c(6, 4))));
    let conclusion = played.conclusion.unwrap();
    assert_eq!(conclusion.victor, Some(Player::Black));
    assert_eq!(conclusion.reason, ConclusionReason::RoyalCapture);
    assert!(game.is_over());

    let err = game.make_move(MoveDraft::new(c(20, 20), c(20, 21)));
    assert_eq!(err.unwrap_err(), GameError::Move(MoveError::GameOver));

    game.undo().unwrap();
    assert!(!game.is_over());
    assert_eq!(game.position().piece_at(c(6, 4)), Some(w(RawKind::King)));
}
