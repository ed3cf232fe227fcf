//! The analysis-provider boundary: evaluated best lines for a position.

pub mod uci;

pub use uci::UciAnalyser;

use std::time::Duration;

use thiserror::Error;

/// Side-to-move-relative evaluation of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Centipawns.
    Cp(i32),
    /// Forced mate in the given number of moves; positive means the side to
    /// move delivers it.
    Mate(i32),
}

impl Score {
    /// Collapses the score onto one centipawn-comparable axis. Mates clamp to
    /// +/-50000 by sign alone: any mate outranks any ordinary evaluation, but
    /// mate distance does not separate candidates by itself.
    pub fn comparable_cp(self) -> f64 {
        match self {
            Score::Cp(cp) => cp as f64,
            Score::Mate(m) => {
                if m > 0 {
                    50_000.0
                } else {
                    -50_000.0
                }
            }
        }
    }
}

/// One principal variation: a best-line move sequence and its score.
#[derive(Debug, Clone)]
pub struct PrincipalVariation {
    pub moves: Vec<String>,
    pub score: Score,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The provider could not be brought up at all; the session runs on the
    /// aggression-only fallback path.
    #[error("engine unavailable: {0}")]
    Unavailable(String),
    /// One request failed; the caller may issue a fresh decision.
    #[error("engine request failed: {0}")]
    Request(String),
    #[error("engine i/o: {0}")]
    Io(#[from] std::io::Error),
}

/// A source of evaluated principal variations. Scores are from the side to
/// move's point of view.
pub trait AnalysisProvider: Send {
    /// Returns up to `lines` PVs for the position, spending at most `budget`
    /// of wall-clock time. This is the only call in the crate expected to
    /// block for a noticeable duration.
    fn analyse(
        &mut self,
        fen: &str,
        budget: Duration,
        lines: usize,
    ) -> Result<Vec<PrincipalVariation>, AnalysisError>;
}
