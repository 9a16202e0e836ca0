use infinite_chess_core::chess::piece::{PieceType, Player, RawKind};
use infinite_chess_core::chess::rules::{GameRules, WinCondition};
use infinite_chess_core::core::coord::Coord;
use infinite_chess_core::chess::moves::MoveDraft;
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

fn game(rules: GameRules, pieces: &[(PieceType, Coord)]) -> Game {
    let pieces = pieces
        .iter()
        .map(|&(p, at)| PlacedPiece::new(p, at))
        .collect();
    Game::new(rules, pieces).unwrap()
}

#[test]
fn rook_ray_stops_on_a_capture() {
    let mut g = game(
        GameRules::default(),
        &[(w(RawKind::Rook), c(0, 0)), (b(RawKind::Pawn), c(0, 3))],
    );
    let moves = g.legal_moves(c(0, 0)).unwrap();
    assert!(moves.individual.is_empty());
    assert_eq!(
        moves.ray_squares(c(0, 0), c(0, 1)),
        Some(vec![c(0, 1), c(0, 2), c(0, 3)])
    );
    assert_eq!(moves.ray_squares(c(0, 0), c(0, -1)), None);
    assert!(moves.contains(c(0, 0), c(1_000_000, 0)));
    assert!(!moves.contains(c(0, 0), c(0, 4)));
    assert!(!moves.contains(c(0, 0), c(1, 1)));
}

#[test]
fn rook_ray_stops_before_a_friend() {
    let mut g = game(
        GameRules::default(),
        &[(w(RawKind::Rook), c(0, 0)), (w(RawKind::Pawn), c(0, 3))],
    );
    let moves = g.legal_moves(c(0, 0)).unwrap();
    assert_eq!(
        moves.ray_squares(c(0, 0), c(0, 1)),
        Some(vec![c(0, 1), c(0, 2)])
    );
}

#[test]
fn zero_slide_limit_freezes_sliders() {
    let rules = GameRules {
        slide_limit: Some(0),
        ..GameRules::default()
    };
    let mut g = game(rules, &[(w(RawKind::Queen), c(0, 0))]);
    assert!(g.legal_moves(c(0, 0)).unwrap().is_empty());
}

#[test]
fn slide_limit_caps_the_ray() {
    let rules = GameRules {
        slide_limit: Some(2),
        ..GameRules::default()
    };
    let mut g = game(rules, &[(w(RawKind::Bishop), c(0, 0))]);
    let moves = g.legal_moves(c(0, 0)).unwrap();
    assert_eq!(moves.finite_squares(c(0, 0)).unwrap().len(), 8);
    assert!(moves.contains(c(0, 0), c(-2, 2)));
    assert!(!moves.contains(c(0, 0), c(3, 3)));
}

#[test]
fn knightrider_rays_are_blocked_off_the_lines() {
    let mut g = game(
        GameRules::default(),
        &[
            (w(RawKind::Knightrider), c(0, 0)),
            (b(RawKind::Pawn), c(2, 4)),
        ],
    );
    let moves = g.legal_moves(c(0, 0)).unwrap();
    assert!(moves.contains(c(0, 0), c(1, 2)));
    assert!(moves.contains(c(0, 0), c(2, 4)));
    assert!(!moves.contains(c(0, 0), c(3, 6)));
    assert!(moves.contains(c(0, 0), c(-300, -600)));
}

#[test]
fn neutral_pieces_never_move() {
    let mut g = game(
        GameRules::default(),
        &[(PieceType::new(RawKind::Obstacle, Player::Neutral), c(0, 0))],
    );
    assert!(g.legal_moves(c(0, 0)).unwrap().is_empty());
}

#[test]
fn pinned_rook_keeps_only_the_pin_line() {
    let mut g = game(
        GameRules::default(),
        &[
            (w(RawKind::King), c(0, 0)),
            (w(RawKind::Rook), c(0, 1)),
            (b(RawKind::Rook), c(0, 5)),
            (b(RawKind::King), c(10, 10)),
        ],
    );
    let moves = g.legal_moves(c(0, 1)).unwrap();
    assert_eq!(
        moves.finite_squares(c(0, 1)),
        Some(vec![c(0, 2), c(0, 3), c(0, 4), c(0, 5)])
    );
    g.position().check_consistency().unwrap();
}

#[test]
fn king_avoids_attacked_squares() {
    let mut g = game(
        GameRules::default(),
        &[
            (w(RawKind::King), c(0, 0)),
            (b(RawKind::Rook), c(5, 1)),
            (b(RawKind::King), c(10, 10)),
        ],
    );
    let moves = g.legal_moves(c(0, 0)).unwrap();
    for blocked in [c(-1, 1), c(0, 1), c(1, 1)] {
        assert!(!moves.contains(c(0, 0), blocked), "{blocked}");
    }
    for open in [c(-1, 0), c(1, 0), c(-1, -1), c(0, -1), c(1, -1)] {
        assert!(moves.contains(c(0, 0), open), "{open}");
    }
}

#[test]
fn royal_queen_rays_are_cut_around_attacked_squares() {
    let mut g = game(
        GameRules::default(),
        &[
            (w(RawKind::RoyalQueen), c(0, 0)),
            (b(RawKind::Rook), c(5, 3)),
            (b(RawKind::King), c(-40, 40)),
        ],
    );
    let moves = g.legal_moves(c(0, 0)).unwrap();
    assert!(moves.contains(c(0, 0), c(0, 2)));
    assert!(!moves.contains(c(0, 0), c(0, 3)));
    assert!(moves.contains(c(0, 0), c(0, 4)));
    assert!(moves.contains(c(0, 0), c(0, -1_000)));
    assert!(!moves.contains(c(0, 0), c(5, 0)));
}

#[test]
fn distant_royal_queen_keeps_unbounded_rays() {
    let mut g = game(
        GameRules::default(),
        &[
            (w(RawKind::RoyalQueen), c(0, 0)),
            (b(RawKind::King), c(1_000_000_000_000, 3)),
        ],
    );
    let moves = g.legal_moves(c(0, 0)).unwrap();
    for dir in [c(1, 0), c(-1, 0), c(0, 1), c(0, -1), c(1, 1), c(-1, -1)] {
        assert_eq!(moves.ray_squares(c(0, 0), dir), None, "{dir}");
    }
    assert!(moves.contains(c(0, 0), c(999_999_999_998, 0)));
    assert!(moves.contains(c(0, 0), c(2_000_000_000_000, 0)));
    assert!(moves.contains(c(0, 0), c(-5_000_000_000_000, 0)));
}

#[test]
fn distant_rook_cuts_a_royal_ray_at_one_square() {
    let far = 1_000_000_000_000;
    let mut g = game(
        GameRules::default(),
        &[
            (w(RawKind::RoyalQueen), c(0, 0)),
            (b(RawKind::Rook), c(far, 5)),
            (b(RawKind::King), c(-40, 40)),
        ],
    );
    let moves = g.legal_moves(c(0, 0)).unwrap();
    assert!(moves.contains(c(0, 0), c(far - 1, 0)));
    assert!(!moves.contains(c(0, 0), c(far, 0)));
    assert!(moves.contains(c(0, 0), c(far + 1, 0)));
    assert!(moves.contains(c(0, 0), c(4 * far, 0)));
    assert!(!moves.contains(c(0, 0), c(0, 5)));
    assert!(moves.contains(c(0, 0), c(0, 4)));
    assert!(moves.contains(c(0, 0), c(0, 6)));
}

#[test]
fn moves_past_the_coordinate_limit_are_illegal() {
    let mut g = game(
        GameRules::default(),
        &[
            (w(RawKind::Rook), c(0, 0)),
            (w(RawKind::King), c(5, 5)),
            (b(RawKind::King), c(-5, -5)),
        ],
    );
    let beyond = c(0, Coord::LIMIT + 1);
    assert!(g.legal_moves(c(0, 0)).unwrap().contains(c(0, 0), beyond));
    let err = g.make_move(MoveDraft::new(c(0, 0), beyond)).unwrap_err();
    assert!(matches!(err, GameError::Move(MoveError::IllegalMove { .. })), "{err:?}");
    assert!(g.make_move(MoveDraft::new(c(0, 0), c(0, Coord::LIMIT))).is_ok());
}

#[test]
fn check_is_ignored_when_no_opponent_wins_by_checkmate() {
    let mut rules = GameRules::default();
    for conditions in rules.win_conditions.values_mut() {
        *conditions = vec![WinCondition::RoyalCapture];
    }
    let mut g = game(
        rules,
        &[
            (w(RawKind::King), c(0, 0)),
            (b(RawKind::Rook), c(5, 1)),
            (b(RawKind::King), c(10, 10)),
        ],
    );
    assert!(g.legal_moves(c(0, 0)).unwrap().contains(c(0, 0), c(0, 1)));
}
