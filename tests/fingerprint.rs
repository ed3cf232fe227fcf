use rashidbot::board::Position;

#[test]
fn move_counters_do_not_change_the_fingerprint() {
    let a = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
        .expect("valid fen");
    let b = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 7 30")
        .expect("valid fen");
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn side_to_move_changes_the_fingerprint() {
    let a = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
        .expect("valid fen");
    let b = Position::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1")
        .expect("valid fen");
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn piece_placement_changes_the_fingerprint() {
    let mut moved = Position::startpos();
    moved.make_move_uci("a2a3").expect("legal");
    let mut back = Position::startpos();
    back.make_move_uci("b2b3").expect("legal");
    assert_ne!(moved.fingerprint(), back.fingerprint());
}

#[test]
fn castling_rights_change_the_fingerprint() {
    let full = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1")
        .expect("valid fen");
    let partial = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w Qkq - 0 1")
        .expect("valid fen");
    assert_ne!(full.fingerprint(), partial.fingerprint());
}

#[test]
fn capturable_en_passant_target_changes_the_fingerprint() {
    // Black pawn on d4 can take e3 en passant in one, not in the other
    let with_ep =
        Position::from_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 3")
            .expect("valid fen");
    let without_ep =
        Position::from_fen("rnbqkbnr/ppp1pppp/8/8/3pP3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 3")
            .expect("valid fen");
    assert_ne!(with_ep.fingerprint(), without_ep.fingerprint());
}

#[test]
fn fingerprint_is_deterministic_across_replays() {
    let moves: Vec<String> = ["e2e4", "e7e5", "g1f3", "b8c6"].iter().map(|s| s.to_string()).collect();
    let a = Position::set_from_start_and_moves(&moves).expect("legal line");
    let b = Position::set_from_start_and_moves(&moves).expect("legal line");
    assert_eq!(a.fingerprint(), b.fingerprint());
}
