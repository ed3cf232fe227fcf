//! Candidate ranking: engine evaluation + book preference + aggression.

use std::time::Duration;

use log::{debug, warn};
use serde::Serialize;

use crate::board::Position;
use crate::book::StyleBook;
use crate::engine::{AnalysisError, AnalysisProvider};
use crate::style::aggression_bonus;

/// One scored candidate move. In reports the components are rounded to a
/// tenth; selection happens on the unrounded totals.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub uci: String,
    pub san: String,
    pub engine: f64,
    pub book: f64,
    pub aggression: f64,
    pub total: f64,
}

impl Candidate {
    fn rounded(mut self) -> Self {
        self.engine = round1(self.engine);
        self.book = round1(self.book);
        self.aggression = round1(self.aggression);
        self.total = round1(self.total);
        self
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// The chosen move plus the top few candidates that justify it.
#[derive(Debug, Clone, Serialize)]
pub struct Decision {
    pub best: String,
    pub candidates: Vec<Candidate>,
}

/// Blends analysis lines with the style book and aggression heuristics and
/// picks the highest-scoring candidate.
pub struct MovePicker {
    book: StyleBook,
    engine: Option<Box<dyn AnalysisProvider>>,
    pub budget: Duration,
    pub lines: usize,
}

impl MovePicker {
    pub fn new(book: StyleBook, engine: Option<Box<dyn AnalysisProvider>>) -> Self {
        Self { book, engine, budget: Duration::from_millis(1250), lines: 5 }
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    pub fn book(&self) -> &StyleBook {
        &self.book
    }

    /// Decides a move for `pos`, blocking for up to the time budget while the
    /// engine thinks. A failed engine request surfaces as an error for this
    /// one decision; the next call may try again. Without an engine (or when
    /// it returns no usable lines) every legal move is ranked by aggression
    /// alone.
    pub fn choose(&mut self, pos: &Position) -> Result<Decision, AnalysisError> {
        let mut scored: Vec<(f64, Candidate)> = Vec::new();

        if let Some(engine) = self.engine.as_mut() {
            let pvs = engine.analyse(&pos.fen(), self.budget, self.lines)?;
            let fingerprint = pos.fingerprint();
            for pv in &pvs {
                let Some(first) = pv.moves.first() else { continue };
                let Some(mv) = pos.find_move(first) else {
                    warn!("engine proposed unplayable move {first}");
                    continue;
                };
                let uci = format!("{mv}");
                let engine_score = pv.score.comparable_cp();
                let book = self.book.bonus(&fingerprint, &uci);
                let aggression = aggression_bonus(pos, mv);
                let total = engine_score + book + aggression;
                scored.push((
                    total,
                    Candidate {
                        uci,
                        san: pos.san(mv),
                        engine: engine_score,
                        book,
                        aggression,
                        total,
                    },
                ));
            }
        }

        let report_len = if scored.is_empty() {
            // Fallback path: rank every legal move by aggression alone. Book
            // and engine terms stay at zero.
            for mv in pos.legal_moves() {
                let aggression = aggression_bonus(pos, mv);
                scored.push((
                    aggression,
                    Candidate {
                        uci: format!("{mv}"),
                        san: pos.san(mv),
                        engine: 0.0,
                        book: 0.0,
                        aggression,
                        total: aggression,
                    },
                ));
            }
            3
        } else {
            4
        };

        // Stable sort: equal totals keep the engine's ranking in the normal
        // path and movegen order in the fallback.
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let best = match scored.first() {
            Some((_, c)) => c.uci.clone(),
            None => return Err(AnalysisError::Request("no legal moves in position".into())),
        };
        debug!("chose {best} out of {} candidate(s)", scored.len());
        let candidates = scored
            .into_iter()
            .take(report_len)
            .map(|(_, c)| c.rounded())
            .collect();
        Ok(Decision { best, candidates })
    }
}
