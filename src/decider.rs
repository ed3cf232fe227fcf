//! Background decision worker. At most one decision is in flight at a time,
//! and its result must be re-validated against the current position before it
//! is applied.

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use log::warn;

use crate::board::Position;
use crate::chooser::{Decision, MovePicker};
use crate::engine::AnalysisError;

struct Request {
    fen: String,
}

/// A completed decision, tagged with the fingerprint of the position it was
/// computed for so stale results can be detected.
pub struct Outcome {
    pub for_position: String,
    pub result: Result<Decision, AnalysisError>,
}

/// Owns the `MovePicker` on a dedicated worker thread; all analysis traffic
/// is serialized through it. The foreground stays responsive while a decision
/// runs.
pub struct Decider {
    req_tx: Sender<Request>,
    out_rx: Receiver<Outcome>,
    worker: Option<JoinHandle<()>>,
    in_flight: bool,
}

impl Decider {
    pub fn new(mut picker: MovePicker) -> Self {
        let (req_tx, req_rx) = channel::<Request>();
        let (out_tx, out_rx) = channel::<Outcome>();
        let worker = thread::spawn(move || {
            while let Ok(request) = req_rx.recv() {
                let outcome = match Position::from_fen(&request.fen) {
                    Ok(pos) => Outcome {
                        for_position: pos.fingerprint(),
                        result: picker.choose(&pos),
                    },
                    Err(e) => Outcome {
                        for_position: String::new(),
                        result: Err(AnalysisError::Request(e)),
                    },
                };
                if out_tx.send(outcome).is_err() {
                    break;
                }
            }
        });
        Self { req_tx, out_rx, worker: Some(worker), in_flight: false }
    }

    /// Starts a decision for `pos`. Returns false, doing nothing, while one
    /// is already outstanding: the single-outstanding-request guard.
    pub fn request(&mut self, pos: &Position) -> bool {
        if self.in_flight {
            return false;
        }
        if self.req_tx.send(Request { fen: pos.fen() }).is_err() {
            warn!("decision worker is gone");
            return false;
        }
        self.in_flight = true;
        true
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Non-blocking check for a finished decision.
    pub fn poll(&mut self) -> Option<Outcome> {
        match self.out_rx.try_recv() {
            Ok(outcome) => {
                self.in_flight = false;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.in_flight = false;
                None
            }
        }
    }

    /// Blocks until the outstanding decision completes. Returns None if no
    /// decision is in flight or the worker died.
    pub fn wait(&mut self) -> Option<Outcome> {
        if !self.in_flight {
            return None;
        }
        self.in_flight = false;
        self.out_rx.recv().ok()
    }
}

impl Drop for Decider {
    fn drop(&mut self) {
        // closing the request channel ends the worker loop
        let (dead_tx, _) = channel();
        drop(std::mem::replace(&mut self.req_tx, dead_tx));
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Applies an outcome's best move to `pos` if the decision succeeded, was
/// computed for this exact position, and is still legal. Stale or illegal
/// results are dropped and None is returned.
pub fn apply_if_current(pos: &mut Position, outcome: &Outcome) -> Option<String> {
    let decision = outcome.result.as_ref().ok()?;
    if outcome.for_position != pos.fingerprint() {
        return None;
    }
    let mv = pos.find_move(&decision.best)?;
    let uci = format!("{mv}");
    pos.play(mv);
    Some(uci)
}
