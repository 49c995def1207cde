//! READY exchange deciding which node fires first.
//!
//! Each node stamps the moment it finished placement with its own clock and
//! announces it. The earlier stamp fires first. Clocks are never compared for
//! anything else, so they need not agree.

use crate::protocol::Message;

/// Replies to repeated opponent READYs after syncing are capped at this many.
pub const MAX_READY_ECHOES: u8 = 5;

/// Which side takes the first shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum FirstMove {
    Local,
    Opponent,
}

/// Progress of the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// Local placement still running.
    Placement,
    /// Local placement done, opponent READY not yet seen.
    WaitingForOpponent,
    /// Decision taken; the turn machine owns the match from here.
    Synced(FirstMove),
}

/// Tie-break between the two completion stamps.
///
/// An unset stamp counts as `u32::MAX`, so a side that has not finished
/// loses. The smaller stamp fires first. Equal stamps are broken by the
/// nonces when both are known and differ; otherwise the local side wins.
/// With distinct nonces both nodes reach the same global answer.
pub fn first_move(
    mine: Option<u32>,
    my_nonce: Option<u32>,
    theirs: Option<u32>,
    their_nonce: Option<u32>,
) -> FirstMove {
    let m = mine.unwrap_or(u32::MAX);
    let t = theirs.unwrap_or(u32::MAX);
    if m != t {
        return if m < t { FirstMove::Local } else { FirstMove::Opponent };
    }
    match (my_nonce, their_nonce) {
        (Some(a), Some(b)) if a > b => FirstMove::Opponent,
        _ => FirstMove::Local,
    }
}

/// Messages to send and decisions taken by one handshake call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HandshakeStep {
    pub send: Option<Message>,
    pub synced: Option<FirstMove>,
}

#[derive(Debug, Clone)]
pub struct ReadyHandshake {
    state: ReadyState,
    my_stamp: Option<u32>,
    my_nonce: Option<u32>,
    opponent_stamp: Option<u32>,
    opponent_nonce: Option<u32>,
    finished_at: u64,
    last_sent_at: u64,
    echoes: u8,
    timeout_ms: u64,
    repeat_ms: u64,
}

impl ReadyHandshake {
    /// `nonce` is attached to our READY to break equal stamps; `None` sends
    /// plain `READY:<millis>`.
    pub fn new(timeout_ms: u64, repeat_ms: u64, nonce: Option<u32>) -> Self {
        Self {
            state: ReadyState::Placement,
            my_stamp: None,
            my_nonce: nonce,
            opponent_stamp: None,
            opponent_nonce: None,
            finished_at: 0,
            last_sent_at: 0,
            echoes: 0,
            timeout_ms,
            repeat_ms,
        }
    }

    pub fn state(&self) -> ReadyState {
        self.state
    }

    /// Our completion stamp, once placement is done.
    pub fn my_stamp(&self) -> Option<u32> {
        self.my_stamp
    }

    /// Opponent completion stamp from the latest READY.
    pub fn opponent_stamp(&self) -> Option<u32> {
        self.opponent_stamp
    }

    fn ready_message(&self) -> Option<Message> {
        self.my_stamp.map(|millis| Message::Ready {
            millis,
            nonce: self.my_nonce,
        })
    }

    fn decide(&mut self) -> FirstMove {
        let first = first_move(
            self.my_stamp,
            self.my_nonce,
            self.opponent_stamp,
            self.opponent_nonce,
        );
        self.state = ReadyState::Synced(first);
        log::info!(
            "handshake synced: mine={:?} theirs={:?} first={:?}",
            self.my_stamp,
            self.opponent_stamp,
            first
        );
        first
    }

    /// Local placement finished at `now`: stamp it and announce READY.
    pub fn finish_placement(&mut self, now: u64) -> HandshakeStep {
        if self.state != ReadyState::Placement {
            return HandshakeStep::default();
        }
        self.my_stamp = Some(now as u32);
        self.finished_at = now;
        self.last_sent_at = now;
        self.state = ReadyState::WaitingForOpponent;
        let send = self.ready_message();
        let synced = if self.opponent_stamp.is_some() {
            Some(self.decide())
        } else {
            None
        };
        HandshakeStep { send, synced }
    }

    /// Opponent READY received.
    pub fn on_ready(&mut self, millis: u32, nonce: Option<u32>, now: u64) -> HandshakeStep {
        let repeated = self.opponent_stamp == Some(millis);
        match self.state {
            ReadyState::Placement => {
                log::debug!("opponent ready at {} while still placing", millis);
                self.opponent_stamp = Some(millis);
                self.opponent_nonce = nonce.or(self.opponent_nonce);
                HandshakeStep::default()
            }
            ReadyState::WaitingForOpponent => {
                self.opponent_stamp = Some(millis);
                self.opponent_nonce = nonce.or(self.opponent_nonce);
                HandshakeStep {
                    send: None,
                    synced: Some(self.decide()),
                }
            }
            ReadyState::Synced(_) => {
                // The opponent is still repeating, so it has not heard us yet.
                if repeated
                    && self.echoes < MAX_READY_ECHOES
                    && now.saturating_sub(self.last_sent_at) >= self.repeat_ms
                {
                    self.echoes += 1;
                    self.last_sent_at = now;
                    return HandshakeStep {
                        send: self.ready_message(),
                        synced: None,
                    };
                }
                HandshakeStep::default()
            }
        }
    }

    /// Repeat READY and enforce the timeout while waiting.
    pub fn poll(&mut self, now: u64) -> HandshakeStep {
        if self.state != ReadyState::WaitingForOpponent {
            return HandshakeStep::default();
        }
        if now.saturating_sub(self.finished_at) >= self.timeout_ms {
            log::warn!(
                "handshake timeout: no opponent READY within {}ms, taking the first shot",
                self.timeout_ms
            );
            return HandshakeStep {
                send: None,
                synced: Some(self.decide()),
            };
        }
        if now.saturating_sub(self.last_sent_at) >= self.repeat_ms {
            self.last_sent_at = now;
            return HandshakeStep {
                send: self.ready_message(),
                synced: None,
            };
        }
        HandshakeStep::default()
    }

    /// The opponent has started firing before its READY reached us.
    pub fn yield_first_move(&mut self) {
        if self.state == ReadyState::WaitingForOpponent {
            log::info!("opponent fired before its READY arrived; it moves first");
            self.state = ReadyState::Synced(FirstMove::Opponent);
        }
    }
}
