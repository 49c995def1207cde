//! In-match turn phases and the SHOT/RESULT exchange.
//!
//! The machine never refuses a SHOT or RESULT because of the local phase; it
//! only reacts to it. When shots carry sequence numbers, duplicated and stale
//! datagrams are recognized and a lost RESULT is recovered by re-sending the
//! SHOT until it is answered.

use alloc::vec::Vec;

use crate::board::BoardModel;
use crate::common::{Cell, MatchStatus, ShotReport};
use crate::config::{Timing, BOARD_HEIGHT, BOARD_WIDTH};
use crate::handshake::FirstMove;
use crate::input::{ButtonEdge, InputSample};
use crate::knowledge::{CellKnowledge, KnowledgeGrid};
use crate::protocol::Message;
use crate::resolver::resolve_shot;

/// Phase of the match once both sides are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    /// Local player aims and fires.
    MyTurn,
    /// Waiting for the RESULT of our shot or for the opponent's SHOT.
    WaitForOpponent,
    /// Showing the effect of the opponent's shot on our board.
    OpponentShot,
    /// Showing the result of our own shot.
    ShowResult,
    /// Match decided.
    GameOver { won: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingShot {
    cell: Cell,
    seq: Option<u32>,
    sent_at: u64,
    /// The opponent has fired since, so it has already answered this shot.
    overtaken: bool,
}

#[derive(Debug, Clone)]
pub struct TurnMachine {
    timing: Timing,
    sequenced: bool,
    fleet_size: usize,
    phase: TurnPhase,
    phase_entered_at: u64,
    aim: Cell,
    aim_dirty: bool,
    last_aim_sent_at: Option<u64>,
    opponent_aim: Option<Cell>,
    opponent_aim_at: u64,
    pending: Option<PendingShot>,
    next_seq: u32,
    last_answered: Option<(u32, ShotReport)>,
    sunk_reports: usize,
}

impl TurnMachine {
    /// `fleet_size` is the number of boats each side has; sinking that many
    /// opponent boats wins.
    pub fn new(timing: Timing, sequenced: bool, fleet_size: usize) -> Self {
        Self {
            timing,
            sequenced,
            fleet_size,
            phase: TurnPhase::WaitForOpponent,
            phase_entered_at: 0,
            aim: (BOARD_WIDTH / 2, BOARD_HEIGHT / 2),
            aim_dirty: false,
            last_aim_sent_at: None,
            opponent_aim: None,
            opponent_aim_at: 0,
            pending: None,
            next_seq: 0,
            last_answered: None,
            sunk_reports: 0,
        }
    }

    /// Enter the first phase once the handshake has decided.
    pub fn start(&mut self, first: FirstMove, now: u64) {
        let phase = match first {
            FirstMove::Local => TurnPhase::MyTurn,
            FirstMove::Opponent => TurnPhase::WaitForOpponent,
        };
        self.enter(phase, now);
    }

    fn enter(&mut self, phase: TurnPhase, now: u64) {
        if let TurnPhase::GameOver { .. } = self.phase {
            return;
        }
        if phase != self.phase {
            log::info!("turn phase {:?} -> {:?}", self.phase, phase);
        }
        self.phase = phase;
        self.phase_entered_at = now;
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// When the current phase was entered.
    pub fn phase_entered_at(&self) -> u64 {
        self.phase_entered_at
    }

    /// Local aim cursor.
    pub fn aim(&self) -> Cell {
        self.aim
    }

    /// Opponent aim cursor, while still fresh.
    pub fn opponent_aim(&self, now: u64) -> Option<Cell> {
        self.opponent_aim
            .filter(|_| now.saturating_sub(self.opponent_aim_at) < self.timing.aim_freshness_ms)
    }

    /// Whether one of our shots is still waiting for its RESULT.
    pub fn awaiting_result(&self) -> bool {
        self.pending.is_some()
    }

    /// Opponent boats reported sunk so far.
    pub fn sunk_reports(&self) -> usize {
        self.sunk_reports
    }

    /// Outcome of the match as far as this node can tell.
    pub fn status(&self, board: &BoardModel) -> MatchStatus {
        if board.all_sunk() {
            MatchStatus::Lost
        } else if self.fleet_size > 0 && self.sunk_reports >= self.fleet_size {
            MatchStatus::Won
        } else {
            MatchStatus::InProgress
        }
    }

    /// Local input during the match: move the aim and fire on press.
    pub fn handle_input(
        &mut self,
        input: InputSample,
        edge: Option<ButtonEdge>,
        knowledge: &KnowledgeGrid,
        now: u64,
        out: &mut Vec<Message>,
    ) {
        if self.phase != TurnPhase::MyTurn {
            return;
        }
        if input.has_direction() {
            let x = clamp_cursor(self.aim.0, input.dx, BOARD_WIDTH);
            let y = clamp_cursor(self.aim.1, input.dy, BOARD_HEIGHT);
            if (x, y) != self.aim {
                self.aim = (x, y);
                self.aim_dirty = true;
            }
        }
        if edge == Some(ButtonEdge::Pressed) {
            self.fire(knowledge, now, out);
        }
    }

    fn fire(&mut self, knowledge: &KnowledgeGrid, now: u64, out: &mut Vec<Message>) {
        let (x, y) = self.aim;
        if knowledge.get(x, y) != CellKnowledge::Unknown {
            log::debug!("not firing at ({}, {}): already known", x, y);
            return;
        }
        let seq = if self.sequenced {
            let seq = self.next_seq;
            self.next_seq = self.next_seq.wrapping_add(1);
            Some(seq)
        } else {
            None
        };
        self.pending = Some(PendingShot {
            cell: (x, y),
            seq,
            sent_at: now,
            overtaken: false,
        });
        out.push(Message::Shot {
            x: x as i32,
            y: y as i32,
            seq,
        });
        self.enter(TurnPhase::WaitForOpponent, now);
    }

    /// Opponent fired at `(x, y)`. The phase changes before the reply is queued.
    pub fn on_shot(
        &mut self,
        x: usize,
        y: usize,
        seq: Option<u32>,
        board: &mut BoardModel,
        now: u64,
        out: &mut Vec<Message>,
    ) {
        if let (Some(seq), Some((answered, report))) = (seq, self.last_answered) {
            if seq == answered {
                log::debug!("repeated SHOT #{}, answering {:?} again", seq, report);
                out.push(Message::Result {
                    report,
                    seq: Some(seq),
                });
                return;
            }
            if seq < answered {
                log::debug!("stale SHOT #{} (last answered #{})", seq, answered);
                return;
            }
        }
        let outcome = match resolve_shot(board, x, y) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::debug!("SHOT at ({}, {}) discarded: {}", x, y, e);
                return;
            }
        };
        let report = outcome.report();
        if let Some(seq) = seq {
            self.last_answered = Some((seq, report));
        }
        if let Some(pending) = self.pending.as_mut().filter(|p| p.seq.is_some()) {
            pending.overtaken = true;
        }
        self.enter(TurnPhase::OpponentShot, now);
        out.push(Message::Result { report, seq });
    }

    /// RESULT for one of our shots.
    pub fn on_result(
        &mut self,
        report: ShotReport,
        seq: Option<u32>,
        knowledge: &mut KnowledgeGrid,
        now: u64,
    ) {
        let overtaken = self.pending.map_or(false, |p| p.overtaken);
        let cell = match (seq, self.pending) {
            (Some(s), Some(p)) if p.seq == Some(s) => p.cell,
            (Some(s), _) => {
                log::debug!("RESULT #{} does not match an outstanding shot", s);
                return;
            }
            (None, Some(p)) => p.cell,
            // Nothing outstanding: attribute it to where we are aiming.
            (None, None) => self.aim,
        };
        self.pending = None;
        if knowledge.apply(cell.0, cell.1, report) {
            self.sunk_reports += 1;
        }
        if overtaken {
            log::debug!("late RESULT {} for ({}, {}) recorded without a phase change", report, cell.0, cell.1);
            return;
        }
        self.enter(TurnPhase::ShowResult, now);
    }

    /// Opponent aim cursor update.
    pub fn on_aim(&mut self, x: usize, y: usize, now: u64) {
        self.opponent_aim = Some((x, y));
        self.opponent_aim_at = now;
    }

    /// Display timeouts, SHOT retransmission and AIM throttling.
    pub fn poll(&mut self, board: &BoardModel, now: u64, out: &mut Vec<Message>) {
        let elapsed = now.saturating_sub(self.phase_entered_at);
        match self.phase {
            TurnPhase::ShowResult if elapsed >= self.timing.display_ms => {
                let next = match self.status(board) {
                    MatchStatus::Won => TurnPhase::GameOver { won: true },
                    MatchStatus::Lost => TurnPhase::GameOver { won: false },
                    MatchStatus::InProgress => TurnPhase::WaitForOpponent,
                };
                self.enter(next, now);
            }
            TurnPhase::OpponentShot if elapsed >= self.timing.display_ms => {
                let next = match self.status(board) {
                    MatchStatus::Lost => TurnPhase::GameOver { won: false },
                    MatchStatus::Won => TurnPhase::GameOver { won: true },
                    MatchStatus::InProgress => TurnPhase::MyTurn,
                };
                self.enter(next, now);
            }
            TurnPhase::MyTurn | TurnPhase::WaitForOpponent => match self.status(board) {
                MatchStatus::Won => self.enter(TurnPhase::GameOver { won: true }, now),
                MatchStatus::Lost => self.enter(TurnPhase::GameOver { won: false }, now),
                MatchStatus::InProgress => {}
            },
            _ => {}
        }

        if let (Some(retry), Some(pending)) = (self.timing.shot_retry_ms, self.pending.as_mut()) {
            if pending.seq.is_some() && now.saturating_sub(pending.sent_at) >= retry {
                log::debug!("re-sending unanswered SHOT {:?}", pending.seq);
                pending.sent_at = now;
                out.push(Message::Shot {
                    x: pending.cell.0 as i32,
                    y: pending.cell.1 as i32,
                    seq: pending.seq,
                });
            }
        }

        if self.phase == TurnPhase::MyTurn && self.aim_dirty {
            if let Some(interval) = self.timing.aim_interval_ms {
                let due = self
                    .last_aim_sent_at
                    .map_or(true, |t| now.saturating_sub(t) >= interval);
                if due {
                    self.aim_dirty = false;
                    self.last_aim_sent_at = Some(now);
                    out.push(Message::Aim {
                        x: self.aim.0 as i32,
                        y: self.aim.1 as i32,
                    });
                }
            }
        }
    }
}

fn clamp_cursor(pos: usize, delta: i8, size: usize) -> usize {
    (pos as i32 + delta as i32).clamp(0, size as i32 - 1) as usize
}
