#![cfg(feature = "std")]

use std::time::Duration;

use rand::Rng;
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::{
    autopilot::Autopilot,
    common::MatchStatus,
    game::GameSession,
    input::InputSample,
    render::{render, Frame},
    transport::Transport,
};

/// Default period of the node loop.
pub const DEFAULT_TICK: Duration = Duration::from_millis(20);
/// How long a node keeps answering after the match is decided, so the peer
/// can recover a lost final RESULT.
pub const DEFAULT_LINGER: Duration = Duration::from_secs(3);

/// Anything that can drive the joystick of a session.
pub trait InputSource: Send {
    fn sample(&mut self, session: &GameSession, now: u64) -> InputSample;
}

impl<R: Rng + Send> InputSource for Autopilot<R> {
    fn sample(&mut self, session: &GameSession, now: u64) -> InputSample {
        Autopilot::sample(self, session, now)
    }
}

/// One player: a session wired to a transport and an input source.
pub struct PlayerNode {
    session: GameSession,
    transport: Box<dyn Transport>,
    input: Box<dyn InputSource>,
    tick: Duration,
    linger: Duration,
    deadline: Option<Duration>,
    frame: Frame,
}

impl PlayerNode {
    pub fn new(session: GameSession, transport: Box<dyn Transport>, input: Box<dyn InputSource>) -> Self {
        Self {
            session,
            transport,
            input,
            tick: DEFAULT_TICK,
            linger: DEFAULT_LINGER,
            deadline: None,
            frame: Frame::default(),
        }
    }

    pub fn with_timing(mut self, tick: Duration, linger: Duration) -> Self {
        self.tick = tick;
        self.linger = linger;
        self
    }

    /// Give up with an error if the match is still undecided after `limit`.
    pub fn with_deadline(mut self, limit: Duration) -> Self {
        self.deadline = Some(limit);
        self
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Frame produced by the latest step.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn status(&self) -> MatchStatus {
        self.session.status()
    }

    /// One tick at `now` ms: receive, update, send, render.
    ///
    /// Transport failures are logged and the tick carries on, as a lost
    /// datagram would.
    pub async fn step(&mut self, now: u64) -> &Frame {
        let inbound = match self.transport.try_recv() {
            Ok(datagram) => datagram,
            Err(e) => {
                log::warn!("receive failed: {}", e);
                None
            }
        };
        let input = self.input.sample(&self.session, now);
        let outbound = self.session.tick(now, inbound.as_deref(), input);
        for msg in outbound {
            let text = msg.encode();
            log::trace!("send {}", text);
            if let Err(e) = self.transport.send(&text).await {
                log::warn!("send of {} failed: {}", text, e);
            }
        }
        self.frame = render(&self.session, now);
        &self.frame
    }

    /// Tick until the match is decided, then linger before returning.
    pub async fn run(&mut self) -> anyhow::Result<MatchStatus> {
        let started = Instant::now();
        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut decided_at: Option<Instant> = None;
        loop {
            ticker.tick().await;
            let now = started.elapsed().as_millis() as u64;
            self.step(now).await;
            match decided_at {
                None if self.status() != MatchStatus::InProgress => {
                    log::info!("match decided: {:?}", self.status());
                    decided_at = Some(Instant::now());
                }
                Some(t) if t.elapsed() >= self.linger => break,
                _ => {}
            }
            if let (None, Some(limit)) = (decided_at, self.deadline) {
                if started.elapsed() >= limit {
                    return Err(anyhow::anyhow!("match still undecided after {:?}", limit));
                }
            }
        }
        Ok(self.status())
    }
}
