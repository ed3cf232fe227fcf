//! Style book: move frequencies mined from one player's game corpus.
//!
//! Built once at startup and read-only afterwards, so decisions can probe it
//! concurrently without locking.

use std::collections::HashMap;
use std::path::Path;

use log::{info, warn};

use crate::board::Position;
use crate::corpus::{self, GameRecord};

/// Fingerprint -> move text -> occurrence count. Move text is the rules
/// provider's long-algebraic encoding, so engine candidates canonicalized the
/// same way probe directly.
#[derive(Debug, Clone, Default)]
pub struct StyleBook {
    entries: HashMap<String, HashMap<String, u32>>,
    games: usize,
}

impl StyleBook {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads and replays a PGN corpus. A missing or unreadable file yields an
    /// empty book: the bot degrades to style-only play instead of failing.
    pub fn from_pgn_file(path: &Path) -> Self {
        let records = match corpus::read_games(path) {
            Ok(records) => records,
            Err(e) => {
                warn!("corpus {} unavailable ({e}); continuing without a book", path.display());
                return Self::empty();
            }
        };
        let book = Self::build(&records);
        info!("book loaded: {} games, {} positions", book.games, book.entries.len());
        book
    }

    /// Replays every record from the standard starting position, counting the
    /// move played at the fingerprint of the position before it. A record
    /// that fails to replay (unknown token, illegal move) is skipped whole;
    /// the build carries on with the rest.
    pub fn build(records: &[GameRecord]) -> Self {
        let mut book = Self::empty();
        'records: for record in records {
            let mut pos = Position::startpos();
            let mut staged = Vec::with_capacity(record.moves.len());
            for token in &record.moves {
                let mv = match pos.move_from_san(token) {
                    Some(mv) => mv,
                    None => {
                        warn!("skipping malformed record at token {token:?}");
                        continue 'records;
                    }
                };
                staged.push((pos.fingerprint(), format!("{mv}")));
                pos.play(mv);
            }
            for (fingerprint, mv) in staged {
                *book.entries.entry(fingerprint).or_default().entry(mv).or_insert(0) += 1;
            }
            book.games += 1;
        }
        book
    }

    pub fn count(&self, fingerprint: &str, mv: &str) -> u32 {
        self.entries
            .get(fingerprint)
            .and_then(|moves| moves.get(mv))
            .copied()
            .unwrap_or(0)
    }

    /// Diminishing-returns reward for historically preferred moves: 0 for an
    /// unseen move, otherwise 200 * ln(1 + count).
    pub fn bonus(&self, fingerprint: &str, mv: &str) -> f64 {
        match self.count(fingerprint, mv) {
            0 => 0.0,
            n => 200.0 * (n as f64).ln_1p(),
        }
    }

    /// Number of games that replayed cleanly into the book.
    pub fn games(&self) -> usize {
        self.games
    }

    pub fn positions(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
