use infinite_chess_core::chess::moves::MoveDraft;
use infinite_chess_core::chess::piece::{PieceType, Player, RawKind};
use infinite_chess_core::core::coord::Coord;
use infinite_chess_core::game::Game;
use infinite_chess_core::variants::{self, BuiltInVariants, VariantTemplates};

#[test]
fn every_named_variant_builds_a_consistent_game() {
    for &name in variants::names() {
        let layout = BuiltInVariants.layout(name, None).unwrap();
        let game = Game::new(layout.rules, layout.pieces).unwrap();
        game.position().check_consistency().unwrap();
        assert_eq!(game.position().royals_of(Player::White), vec![Coord::new(5, 1)]);
        assert_eq!(game.position().royals_of(Player::Black), vec![Coord::new(5, 8)]);
        assert!(!game.in_check(Player::White));
    }
    assert!(variants::by_name("Chess960").is_none());
}

#[test]
fn confined_classical_walls_in_both_armies() {
    let layout = variants::confined_classical();
    assert_eq!(layout.pieces.len(), 32 + 24);
    let obstacle = PieceType::new(RawKind::Obstacle, Player::Neutral);
    let game = Game::new(layout.rules, layout.pieces).unwrap();
    assert_eq!(game.position().piece_at(Coord::new(0, 0)), Some(obstacle));
    assert_eq!(game.position().piece_at(Coord::new(9, 8)), Some(obstacle));
    assert!(game.position().piece_at(Coord::new(0, 4)).is_none());
}

#[test]
fn simulate_leaves_the_game_untouched() {
    let layout = variants::classical();
    let mut game = Game::new(layout.rules, layout.pieces).unwrap();
    let before = game.placed_pieces();

    let landed = game
        .simulate(MoveDraft::new(Coord::new(5, 2), Coord::new(5, 4)), |g, mv| {
            assert!(g.en_passant().is_some());
            (g.position().piece_at(mv.end), g.current_player())
        })
        .unwrap();
    assert_eq!(
        landed,
        (Some(PieceType::new(RawKind::Pawn, Player::White)), Player::Black)
    );

    assert_eq!(game.placed_pieces(), before);
    assert_eq!(game.current_player(), Player::White);
    assert!(game.en_passant().is_none());
    assert!(game.history().is_empty());
    game.position().check_consistency().unwrap();
}

#[test]
fn knights_leave_the_back_rank_in_every_direction() {
    let layout = variants::classical();
    let mut game = Game::new(layout.rules, layout.pieces).unwrap();
    let moves = game.legal_moves(Coord::new(2, 1)).unwrap();
    assert!(moves.sliding.is_empty());
    assert_eq!(moves.individual.len(), 7);
    for to in [Coord::new(1, 3), Coord::new(3, 3), Coord::new(0, 2), Coord::new(1, -1)] {
        assert!(moves.contains(Coord::new(2, 1), to), "{to}");
    }
    assert!(!moves.contains(Coord::new(2, 1), Coord::new(4, 2)));
}
