//! Deterministic match between two autopilot sessions.
//!
//! Both sessions share one synthetic clock, shifted per node so that their
//! READY stamps come from unrelated time bases. Datagrams cross a seeded
//! [`LinkQueue`] in each direction and each node reads at most one per tick.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::autopilot::Autopilot;
use crate::common::{MatchStatus, PlacementError};
use crate::config::GameConfig;
use crate::game::GameSession;
use crate::handshake::{FirstMove, ReadyState};
use crate::knowledge::CellKnowledge;
use crate::link::{LinkProfile, LinkQueue, LinkStats};

/// Mixed into the seeds to derive the link's own generator.
const LINK_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Debug, Clone)]
pub struct DuelConfig {
    pub game: GameConfig,
    pub seeds: [u64; 2],
    pub profile: LinkProfile,
    pub tick_ms: u64,
    /// Give up after this much simulated time.
    pub max_ms: u64,
    /// Per-node clock offsets.
    pub clock_offsets: [u64; 2],
    /// Attach a random tie-break nonce to READY.
    pub nonces: bool,
}

impl DuelConfig {
    pub fn new(seeds: [u64; 2]) -> Self {
        Self {
            game: GameConfig::default(),
            seeds,
            profile: LinkProfile::PERFECT,
            tick_ms: 10,
            max_ms: 3_600_000,
            clock_offsets: [0, 0],
            nonces: true,
        }
    }

    pub fn with_profile(mut self, profile: LinkProfile) -> Self {
        self.profile = profile;
        self
    }
}

/// Summary of one simulated match.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct DuelReport {
    pub seeds: [u64; 2],
    pub profile: LinkProfile,
    /// Index of the winning node when both agree on the outcome.
    pub winner: Option<usize>,
    pub statuses: [MatchStatus; 2],
    pub first_moves: [Option<FirstMove>; 2],
    /// Opponent cells each node has learned about.
    pub shots_fired: [usize; 2],
    /// Distinct cells of each node's board the opponent fired at.
    pub shots_received: [usize; 2],
    /// Traffic towards each node.
    pub links: [LinkStats; 2],
    pub elapsed_ms: u64,
    pub timed_out: bool,
}

pub struct Duel {
    config: DuelConfig,
    sessions: [GameSession; 2],
    pilots: [Autopilot<SmallRng>; 2],
    /// `inbox[i]` holds datagrams on their way to node `i`.
    inbox: [LinkQueue; 2],
    link_rng: SmallRng,
    now: u64,
}

impl Duel {
    pub fn new(config: DuelConfig) -> Result<Self, PlacementError> {
        let mut rngs = config.seeds.map(SmallRng::seed_from_u64);
        let nonce_for = |rng: &mut SmallRng| config.nonces.then(|| rng.random::<u32>());
        let nonces = [nonce_for(&mut rngs[0]), nonce_for(&mut rngs[1])];
        let sessions = [
            GameSession::new(config.game.clone(), nonces[0])?,
            GameSession::new(config.game.clone(), nonces[1])?,
        ];
        let long_press = config.game.timing.long_press_ms;
        let [r0, r1] = rngs;
        let link_seed = config.seeds[0] ^ config.seeds[1].rotate_left(32) ^ LINK_SEED_SALT;
        Ok(Self {
            sessions,
            pilots: [Autopilot::new(r0, long_press), Autopilot::new(r1, long_press)],
            inbox: [LinkQueue::new(config.profile), LinkQueue::new(config.profile)],
            link_rng: SmallRng::seed_from_u64(link_seed),
            now: 0,
            config,
        })
    }

    pub fn session(&self, node: usize) -> Option<&GameSession> {
        self.sessions.get(node)
    }

    /// Simulated time since the start.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Both nodes know the outcome.
    pub fn is_decided(&self) -> bool {
        self.sessions
            .iter()
            .all(|s| s.status() != MatchStatus::InProgress)
    }

    /// Advance both nodes by one tick.
    pub fn step(&mut self) {
        for node in 0..2 {
            let local = self.now + self.config.clock_offsets[node];
            let inbound = self.inbox[node].pop();
            let input = self.pilots[node].sample(&self.sessions[node], local);
            let out = self.sessions[node].tick(local, inbound.as_deref(), input);
            for msg in out {
                log::trace!("node {} -> {}", node, msg);
                self.inbox[1 - node].push(msg.encode(), &mut self.link_rng);
            }
        }
        self.now += self.config.tick_ms;
    }

    /// Run until both nodes know the outcome or time runs out.
    pub fn run(mut self) -> DuelReport {
        while !self.is_decided() && self.now < self.config.max_ms {
            self.step();
        }
        self.report()
    }

    pub fn report(&self) -> DuelReport {
        let statuses = [self.sessions[0].status(), self.sessions[1].status()];
        let winner = match statuses {
            [MatchStatus::Won, MatchStatus::Lost] => Some(0),
            [MatchStatus::Lost, MatchStatus::Won] => Some(1),
            _ => None,
        };
        let first_move = |s: &GameSession| match s.handshake().state() {
            ReadyState::Synced(first) => Some(first),
            _ => None,
        };
        let fired = |s: &GameSession| {
            s.knowledge()
                .iter()
                .filter(|&(_, _, c)| c != CellKnowledge::Unknown)
                .count()
        };
        DuelReport {
            seeds: self.config.seeds,
            profile: self.config.profile,
            winner,
            statuses,
            first_moves: [first_move(&self.sessions[0]), first_move(&self.sessions[1])],
            shots_fired: [fired(&self.sessions[0]), fired(&self.sessions[1])],
            shots_received: [
                self.sessions[0].board().shots_received().count_ones(),
                self.sessions[1].board().shots_received().count_ones(),
            ],
            links: [self.inbox[0].stats(), self.inbox[1].stats()],
            elapsed_ms: self.now,
            timed_out: !self.is_decided(),
        }
    }
}
