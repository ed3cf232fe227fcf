//! Client for an external UCI engine process (stockfish or compatible).

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use log::debug;

use super::{AnalysisError, AnalysisProvider, PrincipalVariation, Score};

pub struct UciAnalyser {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    multipv: usize,
}

impl UciAnalyser {
    /// Spawns and handshakes the engine binary. Failure here means the whole
    /// session runs without analysis.
    pub fn spawn(path: &Path) -> Result<Self, AnalysisError> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| AnalysisError::Unavailable(format!("{}: {e}", path.display())))?;
        let stdin = child
            .stdin
            .take()
            .map(BufWriter::new)
            .ok_or_else(|| AnalysisError::Unavailable("no stdin handle".into()))?;
        let stdout = child
            .stdout
            .take()
            .map(BufReader::new)
            .ok_or_else(|| AnalysisError::Unavailable("no stdout handle".into()))?;

        let mut engine = Self { child, stdin, stdout, multipv: 0 };
        engine.send("uci")?;
        engine.wait_for("uciok")?;
        engine.send("isready")?;
        engine.wait_for("readyok")?;
        debug!("engine {} ready", path.display());
        Ok(engine)
    }

    fn send(&mut self, cmd: &str) -> Result<(), AnalysisError> {
        writeln!(self.stdin, "{cmd}")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn wait_for(&mut self, token: &str) -> Result<(), AnalysisError> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.stdout.read_line(&mut line)? == 0 {
                return Err(AnalysisError::Request(format!("engine closed before {token}")));
            }
            if line.trim() == token {
                return Ok(());
            }
        }
    }
}

impl AnalysisProvider for UciAnalyser {
    fn analyse(
        &mut self,
        fen: &str,
        budget: Duration,
        lines: usize,
    ) -> Result<Vec<PrincipalVariation>, AnalysisError> {
        if lines != self.multipv {
            self.send(&format!("setoption name MultiPV value {lines}"))?;
            self.multipv = lines;
        }
        self.send(&format!("position fen {fen}"))?;
        self.send(&format!("go movetime {}", budget.as_millis()))?;

        // Keep the deepest report per PV slot; the stream ends at "bestmove".
        let mut slots: Vec<Option<PrincipalVariation>> = vec![None; lines];
        let mut line = String::new();
        loop {
            line.clear();
            if self.stdout.read_line(&mut line)? == 0 {
                return Err(AnalysisError::Request("engine closed mid-search".into()));
            }
            let line = line.trim();
            if line.starts_with("bestmove") {
                break;
            }
            if !line.starts_with("info") {
                continue;
            }
            if let Some((slot, pv)) = parse_info(line) {
                if slot < slots.len() {
                    slots[slot] = Some(pv);
                }
            }
        }
        let pvs: Vec<PrincipalVariation> = slots.into_iter().flatten().collect();
        debug!("analyse returned {} line(s)", pvs.len());
        Ok(pvs)
    }
}

impl Drop for UciAnalyser {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let _ = self.child.wait();
    }
}

/// Parses one `info ... multipv N ... score (cp X | mate M) ... pv m1 m2 ...`
/// line into its zero-based PV slot and variation. Lines without a score or
/// move sequence are ignored.
fn parse_info(line: &str) -> Option<(usize, PrincipalVariation)> {
    let mut multipv = 1usize;
    let mut score = None;
    let mut moves = Vec::new();
    let mut tokens = line.split_whitespace();
    while let Some(token) = tokens.next() {
        match token {
            "multipv" => multipv = tokens.next()?.parse().ok()?,
            "score" => match tokens.next()? {
                "cp" => score = Some(Score::Cp(tokens.next()?.parse().ok()?)),
                "mate" => score = Some(Score::Mate(tokens.next()?.parse().ok()?)),
                _ => return None,
            },
            "pv" => {
                moves = tokens.map(String::from).collect();
                break;
            }
            _ => {}
        }
    }
    if multipv == 0 || moves.is_empty() {
        return None;
    }
    Some((multipv - 1, PrincipalVariation { moves, score: score? }))
}
