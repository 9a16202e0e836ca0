use std::collections::BTreeMap;

use infinite_chess_core::chess::moves::{MoveDraft, SpecialFlag};
use infinite_chess_core::chess::piece::{PieceType, Player, RawKind};
use infinite_chess_core::core::coord::Coord;
use infinite_chess_core::error::{GameError, MoveError, NotationError};
use infinite_chess_core::chess::rules::{GameRules, PromotionRule};
use infinite_chess_core::game::{Game, PlacedPiece};
use infinite_chess_core::notation::{
    self, create_clk_command, decode_move, encode_move, GameRecord, MoveComment, RecordedMove,
};
use infinite_chess_core::variants::{self, BuiltInVariants};

fn c(x: i64, y: i64) -> Coord {
    Coord::new(x, y)
}

fn classical_after(moves: &[(i64, i64, i64, i64)]) -> Game {
    let layout = variants::classical();
    let mut game = Game::new(layout.rules, layout.pieces).unwrap();
    for &(x0, y0, x1, y1) in moves {
        game.make_move(MoveDraft::new(c(x0, y0), c(x1, y1))).unwrap();
    }
    game
}

#[test]
fn game_record_survives_encode_and_decode() {
    let game = classical_after(&[(5, 2, 5, 4), (5, 7, 5, 5), (7, 1, 6, 3)]);
    let mut metadata = BTreeMap::new();
    metadata.insert("Event".to_string(), "Casual game".to_string());
    let mut record = GameRecord::from_game(&game, metadata);
    record.moves[1].comment = Some(MoveComment {
        text: "symmetry".to_string(),
        commands: vec![create_clk_command(117_300)],
    });

    let text = notation::encode(&record).unwrap();
    assert!(text.starts_with("[Event \"Casual game\"] 0/100 (8;Q,R,B,N|1;q,r,b,n) "));
    assert!(text.ends_with("5,2>5,4|5,7>5,5{[%clk 0:01:57.4] symmetry}|7,1>6,3"));

    let decoded = notation::decode(&text).unwrap();
    assert_eq!(decoded, record);
    assert_eq!(decoded.moves[1].comment.as_ref().unwrap().clock_millis(), Some(117_400));

    let replayed = decoded.to_game(&BuiltInVariants).unwrap();
    assert_eq!(replayed.placed_pieces(), game.placed_pieces());
    assert_eq!(replayed.current_player(), Player::Black);
    assert_eq!(replayed.fullmove(), 2);
}

#[test]
fn every_section_round_trips_textually() {
    let text = concat!(
        "[Event \"Four\"] w:r:b:bl 3/50 7 (8;Q||1;q|) ",
        "checkmate|checkmate|allpiecescaptured|checkmate ",
        "{\"slide_limit\":12,\"atomic\":true} ",
        "K0,0+|k0,10|3K10,0|4K-10,0|0VO5,5"
    );
    let record = notation::decode(text).unwrap();
    assert_eq!(
        record.rules.turn_order,
        vec![Player::White, Player::Red, Player::Black, Player::Blue]
    );
    assert_eq!(record.rules.move_rule, Some(50));
    assert_eq!(record.move_rule_counter, 3);
    assert_eq!(record.fullmove, 7);
    assert_eq!(record.rules.promotions.len(), 2);
    assert_eq!(record.rules.slide_limit, Some(12));
    assert!(record.rules.atomic);
    let position = record.position.as_ref().unwrap();
    assert_eq!(position.len(), 5);
    assert!(position[0].special_right);
    assert_eq!(position[2].piece, PieceType::new(RawKind::King, Player::Red));
    assert_eq!(position[4].piece, PieceType::new(RawKind::Void, Player::Neutral));

    assert_eq!(notation::encode(&record).unwrap(), text);
}

#[test]
fn variant_metadata_supplies_the_start() {
    let record = notation::decode("[Variant \"Classical\"] 5,2>5,4|5,7>5,5|1,2>1,3").unwrap();
    assert!(record.position.is_none());
    let game = record.to_game(&BuiltInVariants).unwrap();
    assert_eq!(
        game.position().piece_at(c(5, 4)),
        Some(PieceType::new(RawKind::Pawn, Player::White))
    );
    assert_eq!(game.rules().move_rule, Some(100));
    assert_eq!(game.history().len(), 3);
}

#[test]
fn unknown_variant_is_reported() {
    let record = notation::decode("[Variant \"Omega_Squared\"] 1,2>1,3").unwrap();
    assert_eq!(
        record.to_game(&BuiltInVariants).unwrap_err(),
        GameError::Notation(NotationError::UnknownVariant("Omega_Squared".to_string()))
    );
}

#[test]
fn illegal_recorded_move_names_its_ply() {
    let record = notation::decode("[Variant \"Classical\"] 5,2>5,4|5,7>5,5|5,4>5,5").unwrap();
    assert_eq!(
        record.to_game(&BuiltInVariants).unwrap_err(),
        GameError::Replay {
            ply: 3,
            source: MoveError::IllegalMove {
                start: c(5, 4),
                end: c(5, 5)
            }
        }
    );
}

#[test]
fn recorded_en_passant_square_belongs_to_the_first_mover() {
    let record = notation::decode("4,6 K5,1|k5,8|P5,5|p4,5").unwrap();
    assert_eq!(record.en_passant, Some(c(4, 6)));
    let mut game = record.to_game(&BuiltInVariants).unwrap();
    let ep = game.en_passant().unwrap();
    assert_eq!(ep.pawn, c(4, 5));
    assert_eq!(ep.player, Player::White);
    let moves = game.legal_moves(c(5, 5)).unwrap();
    assert_eq!(
        moves.destination(c(5, 5), c(4, 6)).unwrap().special,
        Some(SpecialFlag::EnPassant { capture: c(4, 5) })
    );
}

#[test]
fn double_push_record_replays_with_a_target_for_black() {
    let pieces = vec![
        PlacedPiece::with_right(PieceType::new(RawKind::King, Player::White), c(5, 1)),
        PlacedPiece::with_right(PieceType::new(RawKind::King, Player::Black), c(5, 8)),
        PlacedPiece::with_right(PieceType::new(RawKind::Pawn, Player::White), c(4, 2)),
        PlacedPiece::new(PieceType::new(RawKind::Pawn, Player::Black), c(3, 4)),
    ];
    let mut game = Game::new(GameRules::default(), pieces).unwrap();
    game.make_move(MoveDraft::new(c(4, 2), c(4, 4))).unwrap();

    let text = notation::encode(&GameRecord::from_game(&game, BTreeMap::new())).unwrap();
    assert!(text.ends_with(" 4,2>4,4"), "{text}");
    let record = notation::decode(&text).unwrap();
    assert_eq!(record.rules.turn_order, vec![Player::White, Player::Black]);

    let mut replayed = record.to_game(&BuiltInVariants).unwrap();
    assert_eq!(
        replayed.position().piece_at(c(4, 4)),
        Some(PieceType::new(RawKind::Pawn, Player::White))
    );
    assert!(!replayed.position().is_occupied(c(4, 2)));
    let ep = replayed.en_passant().unwrap();
    assert_eq!((ep.square, ep.pawn, ep.player), (c(4, 3), c(4, 4), Player::Black));
    assert_eq!(replayed.current_player(), Player::Black);
    assert_eq!(
        replayed
            .legal_moves(c(3, 4))
            .unwrap()
            .destination(c(3, 4), c(4, 3))
            .unwrap()
            .special,
        Some(SpecialFlag::EnPassant { capture: c(4, 4) })
    );

    replayed.make_move(MoveDraft::new(c(5, 8), c(5, 7))).unwrap();
    assert_eq!(replayed.en_passant(), None);
}

#[test]
fn single_moves_with_comments() {
    let m = decode_move("1,7>1,8=Q{[%clk 0:00:09.9] desperate}").unwrap();
    assert_eq!(m.start, c(1, 7));
    assert_eq!(m.promotion, Some(PieceType::new(RawKind::Queen, Player::White)));
    let comment = m.comment.as_ref().unwrap();
    assert_eq!(comment.text, "desperate");
    assert_eq!(comment.clock_millis(), Some(9_900));
    assert_eq!(encode_move(&m).unwrap(), "1,7>1,8=Q{[%clk 0:00:09.9] desperate}");

    let plain = RecordedMove::new(c(-3, 1_000_000_000_000), c(-3, 2));
    assert_eq!(encode_move(&plain).unwrap(), "-3,1000000000000>-3,2");
}

#[test]
fn bad_comments_are_rejected() {
    assert_eq!(
        decode_move("1,2>1,3{[%clk 1:2:03.4]}").unwrap_err(),
        NotationError::InvalidClockFormat("1:2:03.4".to_string())
    );
    assert_eq!(
        decode_move("1,2>1,3{[%eval 0.3]}").unwrap_err(),
        NotationError::InvalidCommand("eval".to_string())
    );

    let mut m = RecordedMove::new(c(1, 2), c(1, 3));
    m.comment = Some(MoveComment::text("a {nested} remark"));
    assert!(matches!(
        encode_move(&m),
        Err(NotationError::MalformedNotation { .. })
    ));
}

#[test]
fn malformed_sections_are_rejected() {
    for bad in [
        "K1,1|k5,5 0/100",
        "[Event \"open K1,1",
        "K1,1|Zz5,5",
        "w:n K1,1",
        "(8;Q) K1,1|k5,5",
    ] {
        assert!(notation::decode(bad).is_err(), "{bad}");
    }
}

#[test]
fn promotion_rules_without_ranks_are_left_out() {
    let mut record = notation::decode("(8;Q|1;q) K1,1|k5,5").unwrap();
    record.rules.promotions.insert(Player::White, PromotionRule::default());
    let text = notation::encode(&record).unwrap();
    assert!(text.starts_with("(|1;q) "), "{text}");
    let decoded = notation::decode(&text).unwrap();
    assert!(decoded.rules.promotion_for(Player::White).is_none());
    assert_eq!(decoded.rules.promotion_for(Player::Black).unwrap().ranks, vec![1]);

    record.rules.promotions.insert(Player::Black, PromotionRule::default());
    assert_eq!(notation::encode(&record).unwrap(), "K1,1|k5,5");
}

#[test]
fn win_conditions_with_no_way_to_win_are_not_encoded() {
    let mut record = notation::decode("K1,1|k5,5").unwrap();
    for conditions in record.rules.win_conditions.values_mut() {
        conditions.clear();
    }
    assert!(matches!(
        notation::encode(&record),
        Err(NotationError::MalformedNotation { .. })
    ));
}
