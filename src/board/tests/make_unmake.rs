//! Apply/revert tests.

use crate::board::{Board, CastlingRights, Color, Move, Piece, Square, UndoRecord};
use rand::prelude::*;

fn find_move(board: &mut Board, from: Square, to: Square, promotion: Option<Piece>) -> Move {
    for m in board.generate_moves().iter() {
        if m.from() == from && m.to() == to && m.promotion_piece() == promotion {
            return *m;
        }
    }
    panic!("Expected move not found");
}

#[test]
fn test_en_passant_apply_revert() {
    let mut board =
        Board::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3");
    let original = board.clone();
    let mv = find_move(&mut board, Square(4, 4), Square(5, 5), None);
    assert!(mv.is_en_passant());

    let undo = board.apply(mv);
    assert_eq!(undo.captured(), Some((Piece::Pawn, Square(4, 5))));
    assert!(board.is_empty(Square(4, 5)));
    assert_eq!(board.en_passant_target(), None);

    board.revert(mv, undo);
    assert_eq!(board, original);
}

#[test]
fn test_promotion_apply_revert() {
    let mut board = Board::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1");
    let original = board.clone();
    let mv = find_move(&mut board, Square(6, 0), Square(7, 0), Some(Piece::Queen));

    let undo = board.apply(mv);
    assert_eq!(board.piece_at(Square(7, 0)), Some((Color::White, Piece::Queen)));
    assert_eq!(board.pieces_of(Color::White, Piece::Pawn).popcount(), 0);

    board.revert(mv, undo);
    assert_eq!(board, original);
    assert_eq!(board.piece_at(Square(6, 0)), Some((Color::White, Piece::Pawn)));
}

#[test]
fn test_castling_apply_revert_restores_rights() {
    let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let original = board.clone();
    let mv = find_move(&mut board, Square(0, 4), Square(0, 2), None);
    assert!(mv.is_castle_queenside());

    let undo = board.apply(mv);
    assert_eq!(board.piece_at(Square(0, 3)), Some((Color::White, Piece::Rook)));
    assert!(board.is_empty(Square(0, 0)));
    assert!(!board.castling_rights().has(Color::White, true));
    assert!(!board.castling_rights().has(Color::White, false));
    assert!(board.castling_rights().has(Color::Black, true));

    board.revert(mv, undo);
    assert_eq!(board.castling_rights(), CastlingRights::all());
    assert_eq!(board, original);
}

#[test]
fn test_legal_moves_stable_after_apply_revert() {
    let mut board = Board::new();
    let initial_moves = board.generate_moves();

    for mv in initial_moves.iter() {
        let undo = board.apply(*mv);
        board.revert(*mv, undo);
    }

    let after_moves = board.generate_moves();
    assert_eq!(initial_moves.as_slice(), after_moves.as_slice());
}

#[test]
fn test_every_move_reverts_exactly() {
    let fens = [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    ];

    for fen in fens {
        let mut board = Board::from_fen(fen);
        let original = board.clone();

        for mv in board.generate_moves() {
            let undo = board.apply(mv);
            assert_eq!(board.hash(), board.calculate_hash(), "hash drift after {mv} in {fen}");
            board.revert(mv, undo);
            assert_eq!(board, original, "{mv} not reverted in {fen}");
        }
    }
}

#[test]
fn test_hash_matches_recompute_after_random_moves() {
    let mut board = Board::new();
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let mut history: Vec<(Move, UndoRecord)> = Vec::new();

    for _ in 0..50 {
        let moves = board.generate_moves();
        if moves.is_empty() {
            break;
        }
        let idx = rng.gen_range(0..moves.len());
        let mv = moves.as_slice()[idx];
        let undo = board.apply(mv);
        history.push((mv, undo));

        assert_eq!(board.hash(), board.calculate_hash());
    }

    while let Some((mv, undo)) = history.pop() {
        board.revert(mv, undo);
        assert_eq!(board.hash(), board.calculate_hash());
    }
}

#[test]
fn test_random_playout_round_trip_state() {
    let mut board = Board::new();
    let initial = board.clone();

    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut history: Vec<(Move, UndoRecord)> = Vec::new();

    for _ in 0..200 {
        let moves = board.generate_moves();
        if moves.is_empty() {
            break;
        }
        let idx = rng.gen_range(0..moves.len());
        let mv = moves.as_slice()[idx];
        let undo = board.apply(mv);
        history.push((mv, undo));
        assert_eq!(board.hash(), board.calculate_hash());
        assert!(board.validate().is_ok(), "invalid position after {mv}: {}", board.to_fen());
    }

    while let Some((mv, undo)) = history.pop() {
        board.revert(mv, undo);
    }

    assert_eq!(board, initial);
    assert_eq!(board.halfmove_clock(), 0);
    assert_eq!(board.fullmove_number(), 1);
}

#[test]
fn test_guard_reverts_on_drop() {
    let mut board = Board::new();
    let original = board.clone();
    let mv = find_move(&mut board, Square(1, 4), Square(3, 4), None);

    {
        let mut after = board.play(mv);
        assert_eq!(after.en_passant_target(), Some(Square(2, 4)));
        assert_eq!(after.generate_moves().len(), 20);
    }

    assert_eq!(board, original);
}
