use anyhow::Result;
use clap::Parser;
use cozy_chess::{Color, File, Piece, Rank, Square};
use rashidbot::board::Position;
use rashidbot::book::StyleBook;
use rashidbot::chooser::MovePicker;
use rashidbot::decider::{self, Decider};
use rashidbot::engine::{AnalysisProvider, UciAnalyser};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess against a style-book driven attacking bot", long_about = None)]
struct Args {
    /// Path to a UCI engine binary
    #[arg(long, default_value = "stockfish")]
    engine: PathBuf,

    /// Skip the engine entirely (aggression-only play)
    #[arg(long)]
    no_engine: bool,

    /// PGN corpus to build the style book from
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Your color: 'w' for white, 'b' for black
    #[arg(long, default_value = "w")]
    color: String,

    /// Engine think time per bot move, in milliseconds
    #[arg(long, default_value_t = 1250)]
    movetime: u64,

    /// Number of principal variations to request
    #[arg(long, default_value_t = 5)]
    lines: usize,

    /// Starting FEN position
    #[arg(long)]
    fen: Option<String>,

    /// Print the candidate breakdown as JSON after each bot move
    #[arg(long)]
    json: bool,
}

fn parse_color(color_str: &str) -> Result<Color> {
    match color_str.to_lowercase().as_str() {
        "w" | "white" => Ok(Color::White),
        "b" | "black" => Ok(Color::Black),
        _ => anyhow::bail!("Invalid color: use 'w' or 'b'"),
    }
}

fn piece_letter(piece: Piece, color: Color) -> char {
    let ch = match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    };
    if color == Color::White { ch.to_ascii_uppercase() } else { ch }
}

fn print_board(pos: &Position) {
    let board = pos.board();
    for rank in (0..8).rev() {
        print!("{} ", rank + 1);
        for file in 0..8 {
            let sq = Square::new(File::index(file), Rank::index(rank));
            let ch = match (board.piece_on(sq), board.color_on(sq)) {
                (Some(p), Some(c)) => piece_letter(p, c),
                _ => '.',
            };
            print!(" {ch}");
        }
        println!();
    }
    println!("   a b c d e f g h");
}

/// Reads a move from stdin in long algebraic or SAN form. Returns None when
/// the user quits.
fn get_human_move(pos: &Position) -> Result<Option<cozy_chess::Move>> {
    loop {
        print!("Enter your move (e.g., e2e4 or Nf3, 'quit' to stop): ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(None);
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "resign" {
            return Ok(None);
        }

        if let Some(mv) = pos.find_move(input).or_else(|| pos.move_from_san(input)) {
            return Ok(Some(mv));
        }
        println!("Illegal or unparseable move!");
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let human_color = parse_color(&args.color)?;

    let book = match &args.corpus {
        Some(path) => StyleBook::from_pgn_file(path),
        None => StyleBook::empty(),
    };
    if book.is_empty() {
        println!("No style book loaded.");
    } else {
        println!("Style book: {} games, {} positions.", book.games(), book.positions());
    }

    let engine: Option<Box<dyn AnalysisProvider>> = if args.no_engine {
        None
    } else {
        match UciAnalyser::spawn(&args.engine) {
            Ok(engine) => Some(Box::new(engine)),
            Err(e) => {
                log::warn!("{e}");
                println!("Engine unavailable ({e}); playing on aggression alone.");
                None
            }
        }
    };

    let mut picker = MovePicker::new(book, engine);
    picker.budget = Duration::from_millis(args.movetime);
    picker.lines = args.lines;
    let mut decider = Decider::new(picker);

    let mut pos = match &args.fen {
        Some(fen) => Position::from_fen(fen).map_err(|e| anyhow::anyhow!("Invalid FEN string: {e}"))?,
        None => Position::startpos(),
    };

    loop {
        if let Some(result) = pos.game_result() {
            print_board(&pos);
            println!("\nResult: {result}");
            break;
        }

        println!(
            "\n{}'s turn",
            if pos.side_to_move() == Color::White { "White" } else { "Black" }
        );
        print_board(&pos);

        if pos.side_to_move() == human_color {
            match get_human_move(&pos)? {
                Some(mv) => pos.play(mv),
                None => break,
            }
        } else {
            if !decider.request(&pos) {
                anyhow::bail!("a decision is already in flight");
            }
            println!("Thinking...");
            let outcome = match decider.wait() {
                Some(outcome) => outcome,
                None => anyhow::bail!("decision worker died"),
            };
            if let Err(e) = &outcome.result {
                println!("Analysis failed for this move: {e}");
                break;
            }
            match decider::apply_if_current(&mut pos, &outcome) {
                Some(uci) => {
                    if let Ok(decision) = &outcome.result {
                        let line = decision
                            .candidates
                            .iter()
                            .map(|c| {
                                format!(
                                    "{} (Σ{}; eng:{}; book:{}; aggr:{})",
                                    c.san, c.total, c.engine, c.book, c.aggression
                                )
                            })
                            .collect::<Vec<_>>()
                            .join(" · ");
                        println!("Bot plays: {uci}   {line}");
                        if args.json {
                            println!("{}", serde_json::to_string_pretty(decision)?);
                        }
                    }
                }
                None => println!("Dropped a stale decision; position changed."),
            }
        }
    }

    Ok(())
}
