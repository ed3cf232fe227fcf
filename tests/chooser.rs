use std::collections::VecDeque;
use std::time::Duration;

use rashidbot::board::Position;
use rashidbot::book::StyleBook;
use rashidbot::chooser::MovePicker;
use rashidbot::corpus::GameRecord;
use rashidbot::engine::{AnalysisError, AnalysisProvider, PrincipalVariation, Score};
use rashidbot::style::aggression_bonus;

/// Scripted analysis provider: pops one canned response per request.
struct FakeAnalyser {
    responses: VecDeque<Result<Vec<PrincipalVariation>, AnalysisError>>,
}

impl FakeAnalyser {
    fn with(responses: Vec<Result<Vec<PrincipalVariation>, AnalysisError>>) -> Box<Self> {
        Box::new(Self { responses: responses.into() })
    }
}

impl AnalysisProvider for FakeAnalyser {
    fn analyse(
        &mut self,
        _fen: &str,
        _budget: Duration,
        _lines: usize,
    ) -> Result<Vec<PrincipalVariation>, AnalysisError> {
        self.responses.pop_front().unwrap_or(Ok(vec![]))
    }
}

fn pv(moves: &[&str], score: Score) -> PrincipalVariation {
    PrincipalVariation { moves: moves.iter().map(|s| s.to_string()).collect(), score }
}

#[test]
fn single_pv_blends_engine_score_with_center_bonus() {
    // e2e4 at +30cp, empty book: total = 30 + 0 + 25
    let fake = FakeAnalyser::with(vec![Ok(vec![pv(&["e2e4", "e7e5"], Score::Cp(30))])]);
    let mut picker = MovePicker::new(StyleBook::empty(), Some(fake));
    let decision = picker.choose(&Position::startpos()).expect("decision");

    assert_eq!(decision.best, "e2e4");
    assert_eq!(decision.candidates.len(), 1);
    let c = &decision.candidates[0];
    assert_eq!(c.engine, 30.0);
    assert_eq!(c.book, 0.0);
    assert_eq!(c.aggression, 25.0);
    assert_eq!(c.total, 55.0);
}

#[test]
fn mate_scores_clamp_to_fifty_thousand_regardless_of_distance() {
    let fake = FakeAnalyser::with(vec![Ok(vec![
        pv(&["e2e4"], Score::Mate(9)),
        pv(&["d2d4"], Score::Mate(1)),
        pv(&["g1f3"], Score::Mate(-2)),
    ])]);
    let mut picker = MovePicker::new(StyleBook::empty(), Some(fake));
    let decision = picker.choose(&Position::startpos()).expect("decision");

    assert_eq!(decision.candidates[0].engine, 50_000.0);
    assert_eq!(decision.candidates[1].engine, 50_000.0);
    assert_eq!(decision.candidates[2].engine, -50_000.0);
    // mate-in-9 and mate-in-1 tie on every term; the engine's first line keeps
    // its rank
    assert_eq!(decision.best, "e2e4");
}

#[test]
fn book_preference_can_outrank_a_small_engine_edge() {
    // e4 seen three times in the corpus; d4 never
    let records: Vec<GameRecord> =
        (0..3).map(|_| GameRecord { moves: vec!["e4".to_string()] }).collect();
    let book = StyleBook::build(&records);

    let fake = FakeAnalyser::with(vec![Ok(vec![
        pv(&["d2d4"], Score::Cp(40)),
        pv(&["e2e4"], Score::Cp(0)),
    ])]);
    let mut picker = MovePicker::new(book, Some(fake));
    let decision = picker.choose(&Position::startpos()).expect("decision");

    assert_eq!(decision.best, "e2e4");
    let e4 = decision.candidates.iter().find(|c| c.uci == "e2e4").expect("listed");
    assert!(e4.book > 200.0, "200*ln(4) expected, got {}", e4.book);
}

#[test]
fn empty_analysis_falls_back_to_aggression_over_all_legal_moves() {
    let fake = FakeAnalyser::with(vec![Ok(vec![])]);
    let mut picker = MovePicker::new(StyleBook::empty(), Some(fake));
    let pos = Position::startpos();
    let decision = picker.choose(&pos).expect("decision");

    // chosen move is legal and maximizes the aggression term
    let mv = pos.find_move(&decision.best).expect("best move is legal");
    let best_bonus = aggression_bonus(&pos, mv);
    for other in pos.legal_moves() {
        assert!(aggression_bonus(&pos, other) <= best_bonus);
    }
    assert_eq!(decision.candidates.len(), 3);
    for c in &decision.candidates {
        assert_eq!(c.engine, 0.0);
        assert_eq!(c.book, 0.0);
        assert_eq!(c.total, c.aggression);
    }
}

#[test]
fn engineless_fallback_prefers_the_queen_capture() {
    let mut picker = MovePicker::new(StyleBook::empty(), None);
    let pos = Position::from_fen("4k3/8/8/7q/8/8/7R/4K2N w - - 0 1").expect("valid fen");
    let decision = picker.choose(&pos).expect("decision");

    assert_eq!(decision.best, "h2h5");
    assert!(decision.candidates[0].aggression >= 720.0);
}

#[test]
fn pv_ties_keep_engine_rank_order() {
    // identical totals: both quiet rook-pawn pushes at 0cp
    let fake = FakeAnalyser::with(vec![Ok(vec![
        pv(&["h2h3"], Score::Cp(0)),
        pv(&["a2a3"], Score::Cp(0)),
    ])]);
    let mut picker = MovePicker::new(StyleBook::empty(), Some(fake));
    let decision = picker.choose(&Position::startpos()).expect("decision");
    assert_eq!(decision.best, "h2h3");
}

#[test]
fn a_failed_request_surfaces_without_choosing_a_move() {
    let fake = FakeAnalyser::with(vec![Err(AnalysisError::Request("engine hiccup".into()))]);
    let mut picker = MovePicker::new(StyleBook::empty(), Some(fake));
    let err = picker.choose(&Position::startpos()).expect_err("must surface");
    assert!(matches!(err, AnalysisError::Request(_)));

    // the next decision works again
    let decision = picker.choose(&Position::startpos()).expect("fallback decision");
    assert!(Position::startpos().find_move(&decision.best).is_some());
}

#[test]
fn unplayable_engine_lines_are_ignored() {
    let fake = FakeAnalyser::with(vec![Ok(vec![
        pv(&["e2e5"], Score::Cp(500)),
        pv(&[], Score::Cp(400)),
        pv(&["g1f3"], Score::Cp(10)),
    ])]);
    let mut picker = MovePicker::new(StyleBook::empty(), Some(fake));
    let decision = picker.choose(&Position::startpos()).expect("decision");
    assert_eq!(decision.best, "g1f3");
    assert_eq!(decision.candidates.len(), 1);
}

#[test]
fn reported_components_are_rounded_for_display() {
    let records = vec![GameRecord { moves: vec!["e4".to_string()] }];
    let book = StyleBook::build(&records);
    let fake = FakeAnalyser::with(vec![Ok(vec![pv(&["e2e4"], Score::Cp(30))])]);
    let mut picker = MovePicker::new(book, Some(fake));
    let decision = picker.choose(&Position::startpos()).expect("decision");

    // 200*ln(2) = 138.629..., shown as 138.6
    let c = &decision.candidates[0];
    assert_eq!(c.book, 138.6);
    assert_eq!(c.total, 193.6);
}
