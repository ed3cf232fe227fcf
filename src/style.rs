//! Aggression heuristics modeling an attacking player's taste in moves.
//!
//! Every term is additive and independent; a term that cannot be evaluated
//! contributes 0 instead of spoiling the rest of the score.

use cozy_chess::{Color, File, Move, Piece, Rank, Square};

use crate::board::Position;

/// Tuned material scale. The bishop sits slightly above the knight on
/// purpose; it keeps the bishop pair when exchanges are otherwise even.
pub fn piece_value(piece: Piece) -> f64 {
    match piece {
        Piece::Pawn => 1.0,
        Piece::Knight => 3.0,
        Piece::Bishop => 3.2,
        Piece::Rook => 5.0,
        Piece::Queen => 9.0,
        Piece::King => 0.0,
    }
}

const CENTER: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];

/// Scores the attacking qualities of `mv` in `before`. The input position is
/// never mutated; the move is simulated on a disposable copy.
pub fn aggression_bonus(before: &Position, mv: Move) -> f64 {
    let mover = before.side_to_move();
    let mut s = 0.0;

    // Capture term reads the victim off the destination square, so an
    // en-passant capture (empty destination) earns nothing here.
    if before.board().color_on(mv.to) == Some(!mover) {
        if let Some(victim) = before.board().piece_on(mv.to) {
            s += piece_value(victim) * 80.0;
        }
    }

    let mut after = before.clone();
    after.play(mv);

    if after.is_check() {
        s += 120.0;
    }
    if after.is_checkmate() {
        s += 10_000.0;
    }

    if CENTER.contains(&mv.to) {
        s += 25.0;
    }

    // Minor piece leaving its own back rank. Judged by origin rank only: a
    // piece shuffled backwards is rewarded again the next time it comes out.
    if let Some(piece) = after.board().piece_on(mv.to) {
        if matches!(piece, Piece::Knight | Piece::Bishop) {
            let back = if mover == Color::White { Rank::First } else { Rank::Eighth };
            if mv.from.rank() == back {
                s += 22.0;
            }
        }
    }

    // King-ring pressure: +12 for each square around the enemy king that the
    // moving side attacks once the move is made. No enemy king (synthetic
    // positions) means no term.
    if let Some(enemy_king) = after.king(!mover) {
        let kf = enemy_king.file() as i8;
        let kr = enemy_king.rank() as i8;
        for df in -1..=1i8 {
            for dr in -1..=1i8 {
                if df == 0 && dr == 0 {
                    continue;
                }
                let (nf, nr) = (kf + df, kr + dr);
                if (0..8).contains(&nf) && (0..8).contains(&nr) {
                    let sq = Square::new(File::index(nf as usize), Rank::index(nr as usize));
                    if after.attacks_square(mover, sq) {
                        s += 12.0;
                    }
                }
            }
        }
    }

    s
}
