use cozy_chess::{
    get_bishop_moves, get_king_moves, get_knight_moves, get_pawn_attacks, get_rook_moves,
    Board as CozyBoard, Color, File, GameStatus, Move, Piece, Rank, Square,
};

/// Rules-provider wrapper around a cozy-chess board. Everything the move
/// picker needs to know about chess legality goes through here.
#[derive(Clone, Debug)]
pub struct Position {
    board: CozyBoard,
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: CozyBoard::default() }
    }

    pub fn from_fen(fen: &str) -> Result<Self, String> {
        CozyBoard::from_fen(fen, false).map(|b| Self { board: b }).map_err(|e| format!("FEN error: {e:?}"))
    }

    pub fn board(&self) -> &CozyBoard { &self.board }

    pub fn fen(&self) -> String {
        format!("{}", self.board)
    }

    /// Book lookup key: piece placement, side to move, castling rights and
    /// en-passant target. Move counters are excluded so the same
    /// configuration reached at different move numbers shares statistics.
    pub fn fingerprint(&self) -> String {
        self.fen().split_whitespace().take(4).collect::<Vec<_>>().join(" ")
    }

    pub fn side_to_move(&self) -> Color { self.board.side_to_move() }

    pub fn legal_moves(&self) -> Vec<Move> {
        let mut out = Vec::with_capacity(32);
        self.board.generate_moves(|moves| { out.extend(moves); false });
        out
    }

    /// Resolves a long-algebraic move string against the legal moves.
    /// Standard castling spellings ("e1g1") are mapped onto cozy-chess's
    /// king-takes-rook encoding ("e1h1").
    pub fn find_move(&self, uci: &str) -> Option<Move> {
        let legal = self.legal_moves();
        if let Some(m) = legal.iter().find(|m| format!("{m}") == uci) {
            return Some(*m);
        }
        let alias = match uci {
            "e1g1" => "e1h1",
            "e1c1" => "e1a1",
            "e8g8" => "e8h8",
            "e8c8" => "e8a8",
            _ => return None,
        };
        legal
            .into_iter()
            .find(|m| format!("{m}") == alias && self.board.piece_on(m.from) == Some(Piece::King))
    }

    pub fn make_move_uci(&mut self, uci: &str) -> Result<(), String> {
        match self.find_move(uci) {
            Some(m) => { self.board.play(m); Ok(()) }
            None => Err(format!("Illegal move: {uci}")),
        }
    }

    /// Plays a move taken from this position's own move generation.
    pub fn play(&mut self, mv: Move) {
        self.board.play(mv);
    }

    pub fn set_from_start_and_moves(moves: &[String]) -> Result<Self, String> {
        let mut pos = Self::startpos();
        for m in moves { pos.make_move_uci(m)?; }
        Ok(pos)
    }

    pub fn is_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }

    pub fn is_checkmate(&self) -> bool {
        self.board.status() == GameStatus::Won
    }

    /// Terminal result string, or None while the game is still on.
    pub fn game_result(&self) -> Option<&'static str> {
        match self.board.status() {
            GameStatus::Ongoing => None,
            GameStatus::Drawn => Some("1/2-1/2"),
            GameStatus::Won => Some(if self.side_to_move() == Color::White { "0-1" } else { "1-0" }),
        }
    }

    pub fn king(&self, color: Color) -> Option<Square> {
        (self.board.colors(color) & self.board.pieces(Piece::King)).into_iter().next()
    }

    /// True if any piece of `attacker` attacks `sq`, sliders included.
    pub fn attacks_square(&self, attacker: Color, sq: Square) -> bool {
        let b = &self.board;
        let occ = b.occupied();
        let them = b.colors(attacker);
        if !(get_knight_moves(sq) & them & b.pieces(Piece::Knight)).is_empty() {
            return true;
        }
        if !(get_king_moves(sq) & them & b.pieces(Piece::King)).is_empty() {
            return true;
        }
        if !(get_pawn_attacks(sq, !attacker) & them & b.pieces(Piece::Pawn)).is_empty() {
            return true;
        }
        let line = them & (b.pieces(Piece::Rook) | b.pieces(Piece::Queen));
        if !(get_rook_moves(sq, occ) & line).is_empty() {
            return true;
        }
        let diag = them & (b.pieces(Piece::Bishop) | b.pieces(Piece::Queen));
        !(get_bishop_moves(sq, occ) & diag).is_empty()
    }

    /// Standard algebraic rendering with a check/mate suffix.
    pub fn san(&self, mv: Move) -> String {
        let mut s = self.san_bare(mv);
        let mut after = self.board.clone();
        after.play(mv);
        if after.status() == GameStatus::Won {
            s.push('#');
        } else if !after.checkers().is_empty() {
            s.push('+');
        }
        s
    }

    fn san_bare(&self, mv: Move) -> String {
        let b = &self.board;
        let piece = match b.piece_on(mv.from) {
            Some(p) => p,
            None => return format!("{mv}"),
        };
        // castling is encoded as king taking its own rook
        if piece == Piece::King && b.color_on(mv.to) == Some(b.side_to_move()) {
            return if (mv.to.file() as usize) > (mv.from.file() as usize) {
                "O-O".to_string()
            } else {
                "O-O-O".to_string()
            };
        }
        let capture = b.color_on(mv.to) == Some(!b.side_to_move())
            || (piece == Piece::Pawn && mv.from.file() != mv.to.file());
        let mut out = String::new();
        if piece == Piece::Pawn {
            if capture {
                out.push(file_char(mv.from.file()));
                out.push('x');
            }
            out.push_str(&format!("{}", mv.to));
            if let Some(p) = mv.promotion {
                out.push('=');
                out.push(piece_char(p));
            }
        } else {
            out.push(piece_char(piece));
            let mut same_file = false;
            let mut same_rank = false;
            let mut others = false;
            for m2 in self.legal_moves() {
                if m2.to == mv.to && m2.from != mv.from && b.piece_on(m2.from) == Some(piece) {
                    others = true;
                    if m2.from.file() == mv.from.file() { same_file = true; }
                    if m2.from.rank() == mv.from.rank() { same_rank = true; }
                }
            }
            if others {
                if !same_file {
                    out.push(file_char(mv.from.file()));
                } else if !same_rank {
                    out.push(rank_char(mv.from.rank()));
                } else {
                    out.push(file_char(mv.from.file()));
                    out.push(rank_char(mv.from.rank()));
                }
            }
            if capture { out.push('x'); }
            out.push_str(&format!("{}", mv.to));
        }
        out
    }

    /// Resolves a SAN token (as found in PGN movetext) to a legal move.
    /// Decorations like check marks and annotation glyphs are ignored; plain
    /// long-algebraic tokens are accepted too.
    pub fn move_from_san(&self, token: &str) -> Option<Move> {
        let clean = token
            .trim_end_matches(['+', '#', '!', '?'])
            .replace("0-0-0", "O-O-O")
            .replace("0-0", "O-O");
        if clean.is_empty() {
            return None;
        }
        for mv in self.legal_moves() {
            let san = self.san_bare(mv);
            if san == clean || san.replace('=', "") == clean {
                return Some(mv);
            }
        }
        self.find_move(&clean)
    }
}

fn piece_char(p: Piece) -> char {
    match p {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

fn file_char(f: File) -> char {
    (b'a' + f as u8) as char
}

fn rank_char(r: Rank) -> char {
    (b'1' + r as u8) as char
}
