//! One node's game session and its per-tick update.
//!
//! A tick handles at most one inbound datagram, then one input sample, then
//! the timeouts. A message and a timeout landing in the same tick are
//! therefore always resolved message first.

use alloc::vec::Vec;

use crate::board::BoardModel;
use crate::common::{MatchStatus, PlacementError};
use crate::config::{fleet_boat_count, GameConfig};
use crate::handshake::{FirstMove, HandshakeStep, ReadyHandshake, ReadyState};
use crate::input::{ButtonTracker, InputSample};
use crate::knowledge::KnowledgeGrid;
use crate::placement::{PlacementEngine, PlacementStep};
use crate::protocol::Message;
use crate::turn::{TurnMachine, TurnPhase};

/// Coarse position of the session in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Boats are being laid out.
    Placement,
    /// Our READY is out, the opponent's is not in.
    AwaitingOpponent,
    /// Handshake done; the match runs in the given phase.
    Battle(TurnPhase),
}

/// Session state of one node: board, knowledge, handshake and turn.
pub struct GameSession {
    config: GameConfig,
    board: BoardModel,
    knowledge: KnowledgeGrid,
    placement: PlacementEngine,
    handshake: ReadyHandshake,
    turn: TurnMachine,
    button: ButtonTracker,
    last_placement: PlacementStep,
}

impl GameSession {
    /// Create a session and start placement of `config.fleet`.
    ///
    /// `nonce` breaks ties between equal READY stamps; pass a random value,
    /// or `None` to send bare READY stamps.
    pub fn new(config: GameConfig, nonce: Option<u32>) -> Result<Self, PlacementError> {
        let timing = config.timing;
        let mut board = BoardModel::new();
        let mut placement = PlacementEngine::new(timing.long_press_ms);
        placement.begin(&mut board, &config.fleet)?;
        let turn = TurnMachine::new(timing, config.sequenced_shots, fleet_boat_count(&config.fleet));
        Ok(Self {
            handshake: ReadyHandshake::new(timing.handshake_timeout_ms, timing.ready_repeat_ms, nonce),
            config,
            board,
            knowledge: KnowledgeGrid::new(),
            placement,
            turn,
            button: ButtonTracker::new(),
            last_placement: PlacementStep::Idle,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &BoardModel {
        &self.board
    }

    /// Our shots against the opponent.
    pub fn knowledge(&self) -> &KnowledgeGrid {
        &self.knowledge
    }

    pub fn placement(&self) -> &PlacementEngine {
        &self.placement
    }

    /// What the most recent placement tick did.
    pub fn last_placement(&self) -> PlacementStep {
        self.last_placement
    }

    pub fn handshake(&self) -> &ReadyHandshake {
        &self.handshake
    }

    pub fn turn(&self) -> &TurnMachine {
        &self.turn
    }

    pub fn stage(&self) -> Stage {
        match self.handshake.state() {
            ReadyState::Placement => Stage::Placement,
            ReadyState::WaitingForOpponent => Stage::AwaitingOpponent,
            ReadyState::Synced(_) => Stage::Battle(self.turn.phase()),
        }
    }

    pub fn status(&self) -> MatchStatus {
        match self.stage() {
            Stage::Battle(_) => self.turn.status(&self.board),
            _ => MatchStatus::InProgress,
        }
    }

    /// Run one tick and return the datagrams to send, in order.
    pub fn tick(&mut self, now: u64, inbound: Option<&str>, input: InputSample) -> Vec<Message> {
        let mut out = Vec::new();
        if let Some(text) = inbound {
            self.receive(text, now, &mut out);
        }

        let edge = self.button.update(input.button_down);
        match self.stage() {
            Stage::Placement => {
                let step = self
                    .placement
                    .advance(&mut self.board, input.dx, input.dy, edge, now);
                self.last_placement = step;
                if let PlacementStep::Confirmed { finished: true, .. } = step {
                    log::info!("placement finished at {}ms", now);
                    let hs = self.handshake.finish_placement(now);
                    self.apply_handshake(hs, now, &mut out);
                }
            }
            Stage::AwaitingOpponent => {}
            Stage::Battle(_) => {
                self.turn
                    .handle_input(input, edge, &self.knowledge, now, &mut out);
            }
        }

        let hs = self.handshake.poll(now);
        self.apply_handshake(hs, now, &mut out);
        if let Stage::Battle(_) = self.stage() {
            self.turn.poll(&self.board, now, &mut out);
        }
        out
    }

    /// Decode one datagram and act on it. Undecodable datagrams are dropped.
    pub fn receive(&mut self, text: &str, now: u64, out: &mut Vec<Message>) {
        match Message::decode_on_board(text) {
            Ok(msg) => self.handle(msg, now, out),
            Err(e) => log::debug!("discarding datagram {:?}: {}", text, e),
        }
    }

    /// Act on a decoded message. Coordinates must already be on the board.
    pub fn handle(&mut self, msg: Message, now: u64, out: &mut Vec<Message>) {
        let stage = self.stage();
        match msg {
            Message::Ready { millis, nonce } => {
                let hs = self.handshake.on_ready(millis, nonce, now);
                self.apply_handshake(hs, now, out);
            }
            Message::Aim { x, y } => {
                if stage != Stage::Placement {
                    self.turn.on_aim(x as usize, y as usize, now);
                }
            }
            Message::Shot { x, y, seq } => match stage {
                Stage::Placement => {
                    log::debug!("SHOT at ({}, {}) during placement discarded", x, y);
                }
                Stage::AwaitingOpponent => {
                    self.handshake.yield_first_move();
                    self.turn.start(FirstMove::Opponent, now);
                    self.turn
                        .on_shot(x as usize, y as usize, seq, &mut self.board, now, out);
                }
                Stage::Battle(_) => {
                    self.turn
                        .on_shot(x as usize, y as usize, seq, &mut self.board, now, out);
                }
            },
            Message::Result { report, seq } => match stage {
                Stage::Battle(_) => {
                    self.turn.on_result(report, seq, &mut self.knowledge, now);
                }
                _ => log::debug!("RESULT {} before the match started discarded", report),
            },
        }
    }

    fn apply_handshake(&mut self, step: HandshakeStep, now: u64, out: &mut Vec<Message>) {
        if let Some(msg) = step.send {
            out.push(msg);
        }
        if let Some(first) = step.synced {
            self.turn.start(first, now);
        }
    }
}
