//! Splits a PGN-style game corpus into per-game SAN token lists.
//!
//! Only the movetext matters here: tag-pair headers, brace comments,
//! variations, NAGs and result markers are stripped. Resolving the tokens to
//! actual moves happens during book replay, where a rules provider is
//! available.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One game of the corpus, as raw SAN tokens in played order.
#[derive(Debug, Clone, Default)]
pub struct GameRecord {
    pub moves: Vec<String>,
}

pub fn read_games(path: &Path) -> std::io::Result<Vec<GameRecord>> {
    let file = File::open(path)?;
    let mut text = String::new();
    BufReader::new(file).read_to_string(&mut text)?;
    Ok(parse_games(&text))
}

/// Splits corpus text into games. A game's movetext ends when a new header
/// block starts (or at end of input); blank lines inside are tolerated.
pub fn parse_games(text: &str) -> Vec<GameRecord> {
    let mut games = Vec::new();
    let mut movetext = String::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('[') {
            if !movetext.is_empty() {
                push_game(&mut games, &movetext);
                movetext.clear();
            }
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }
        movetext.push(' ');
        movetext.push_str(trimmed);
    }
    if !movetext.is_empty() {
        push_game(&mut games, &movetext);
    }
    games
}

fn push_game(games: &mut Vec<GameRecord>, movetext: &str) {
    let record = tokenize(&strip_comments(movetext));
    if !record.moves.is_empty() {
        games.push(record);
    }
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for ch in text.chars() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out
}

fn tokenize(text: &str) -> GameRecord {
    let mut moves = Vec::new();
    let mut variation_depth = 0i32;
    for raw in text.split_whitespace() {
        let opens = raw.matches('(').count() as i32;
        let closes = raw.matches(')').count() as i32;
        if variation_depth > 0 || opens > 0 {
            variation_depth = (variation_depth + opens - closes).max(0);
            continue;
        }
        // move numbers may be glued to the move ("12.Nf3", "12...c5");
        // bare numbers and result markers parse to nothing and are dropped
        let tok = if raw.chars().next().is_some_and(|c| c.is_ascii_digit()) {
            match raw.rfind('.') {
                Some(i) => &raw[i + 1..],
                None => continue,
            }
        } else {
            raw
        };
        if tok.is_empty() || tok == "*" || tok.starts_with('$') {
            continue;
        }
        moves.push(tok.to_string());
    }
    GameRecord { moves }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_GAMES: &str = r#"[Event "A"]
[Result "1-0"]

1. e4 e5 2. Nf3 {a comment} Nc6 3. Bb5 1-0

[Event "B"]
[Result "0-1"]

1.d4 d5 2.c4 (2. Nf3 Nf6) 2... e6 $1 0-1
"#;

    #[test]
    fn splits_and_tokenizes_games() {
        let games = parse_games(TWO_GAMES);
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].moves, vec!["e4", "e5", "Nf3", "Nc6", "Bb5"]);
        assert_eq!(games[1].moves, vec!["d4", "d5", "c4", "e6"]);
    }

    #[test]
    fn empty_input_yields_no_games() {
        assert!(parse_games("").is_empty());
        assert!(parse_games("[Event \"x\"]\n\n*\n").is_empty());
    }
}
