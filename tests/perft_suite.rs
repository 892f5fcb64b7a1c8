//! Perft tests through the public API.

use chess_perft::board::PgnError;
use chess_perft::{
    divide, divide_fen, divide_parallel, perft, perft_fen, perft_parallel, Board, DivideReport,
    Mismatch, PerftError,
};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

/// Start position divide at depth 2, as printed by common engines
const STARTPOS_DIVIDE_2: &str = "\
a2a3: 20
b2b3: 20
c2c3: 20
d2d3: 20
e2e3: 20
f2f3: 20
g2g3: 20
h2h3: 20
a2a4: 20
b2b4: 20
c2c4: 20
d2d4: 20
e2e4: 20
f2f4: 20
g2g4: 20
h2h4: 20
b1a3: 20
b1c3: 20
g1f3: 20
g1h3: 20

Nodes searched: 400
";

#[test]
fn startpos_counts() {
    let mut board = Board::new();
    let expected = [1, 20, 400, 8902, 197281];
    for (depth, nodes) in expected.into_iter().enumerate() {
        assert_eq!(perft(&mut board, depth), nodes, "depth {depth}");
    }
}

#[test]
fn perft_leaves_position_untouched() {
    let mut board = Board::from_fen(KIWIPETE);
    let before = board.clone();
    let fen = board.to_fen();

    assert_eq!(perft(&mut board, 3), 97862);
    assert_eq!(board, before);
    assert_eq!(board.to_fen(), fen);
    assert_eq!(perft(&mut board, 3), 97862);
}

#[test]
fn parallel_matches_sequential() {
    let mut board = Board::from_fen(KIWIPETE);
    for depth in 0..=3 {
        assert_eq!(perft_parallel(&board, depth), perft(&mut board, depth), "depth {depth}");
    }
    assert_eq!(divide_parallel(&board, 3), divide(&mut board, 3));
}

#[test]
fn divide_matches_reference_output() {
    let mut board = Board::new();
    let ours = divide(&mut board, 2);
    let reference: DivideReport = STARTPOS_DIVIDE_2.parse().expect("reference parses");

    assert!(ours.diff(&reference).is_empty());
    assert_eq!(ours.total(), reference.total());
    assert_eq!(ours.to_string().parse::<DivideReport>(), Ok(ours));
}

#[test]
fn divide_diff_points_at_the_bad_move() {
    let mut board = Board::new();
    let ours = divide(&mut board, 2);

    let edited = STARTPOS_DIVIDE_2
        .replace("g1h3: 20\n", "")
        .replace("b2b3: 20", "b2b3: 21")
        .replace("Nodes searched: 400", "Nodes searched: 381");
    let reference: DivideReport = edited.parse().expect("edited reference parses");

    let mismatches = ours.diff(&reference);
    assert_eq!(mismatches.len(), 2);
    assert!(mismatches.contains(&Mismatch::Count {
        mv: "b2b3".to_string(),
        ours: 20,
        reference: 21,
    }));
    assert!(mismatches.contains(&Mismatch::Unexpected {
        mv: "g1h3".to_string(),
        ours: 20,
    }));
}

#[test]
fn fen_entry_points() {
    assert_eq!(perft_fen(KIWIPETE, 2), Ok(2039));
    assert_eq!(perft_fen(KIWIPETE, 0), Ok(1));

    let report = divide_fen(KIWIPETE, 1).expect("valid fen");
    assert_eq!(report.len(), 48);
    assert!(report.iter().all(|(_, nodes)| nodes == 1));

    assert!(matches!(
        perft_fen(KIWIPETE, -1),
        Err(PerftError::NegativeDepth { depth: -1 })
    ));
    assert!(matches!(perft_fen("not a fen", 1), Err(PerftError::Fen(_))));
    assert!(matches!(divide_fen("8/8/8/8/8/8/8/8 w - - 0 1", 1), Err(PerftError::Fen(_))));
}

#[test]
fn uci_moves_drive_the_board() {
    let mut board = Board::new();
    for uci in ["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6"] {
        let (_mv, _undo) = board.make_move_uci(uci).expect("legal move");
    }
    assert_eq!(
        board.to_fen(),
        "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4"
    );
    assert!(board.make_move_uci("e1c1").is_err());
    assert!(board.parse_move("e1g1").is_ok_and(|mv| mv.is_castling()));
    let legal = board.generate_moves().len() as u64;
    assert_eq!(perft(&mut board, 1), legal);
}

#[test]
fn pgn_and_san_feed_the_walker() {
    let pgn = "[Event \"Four knights\"]\n1. e4 e5 2. Nf3 Nc6 3. Nc3 Nf6 *";
    let mut from_pgn = Board::from_pgn(pgn).expect("legal game");
    let mut from_fen =
        Board::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/4P3/2N2N2/PPPP1PPP/R1BQKB1R w KQkq - 4 4");
    assert_eq!(from_pgn, from_fen);
    assert_eq!(perft(&mut from_pgn, 3), perft(&mut from_fen, 3));

    let mv = from_pgn.parse_san("Bb5").expect("legal san");
    assert_eq!(mv.to_string(), "f1b5");
    assert_eq!(from_pgn.move_to_san(mv), "Bb5");
    assert!(matches!(
        Board::from_pgn("1. e4 e5 2. Qh5 Ke7 3. Qe6"),
        Err(PgnError::Move { ply: 5, .. })
    ));
}

#[cfg(feature = "serde")]
#[test]
fn divide_report_serde_round_trip() {
    let mut board = Board::from_fen(KIWIPETE);
    let report = divide(&mut board, 2);

    let json = serde_json::to_string(&report).expect("serialize");
    let back: DivideReport = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, report);

    let moves: Vec<_> = board.generate_moves().iter().copied().collect();
    let json = serde_json::to_string(&moves).expect("serialize moves");
    let back: Vec<chess_perft::Move> = serde_json::from_str(&json).expect("deserialize moves");
    assert_eq!(back, moves);
}
