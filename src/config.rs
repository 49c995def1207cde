use alloc::vec::Vec;

use crate::bitboard::BitBoard;

/// Matrix width in cells.
pub const BOARD_WIDTH: usize = 16;
/// Matrix height in cells.
pub const BOARD_HEIGHT: usize = 16;
/// Fixed capacity of the boat list.
pub const MAX_BOATS: usize = 10;

/// Occupancy grid covering the whole matrix.
pub type Bits = BitBoard<u16, BOARD_WIDTH, BOARD_HEIGHT>;

/// One line of a fleet configuration: `count` boats of `length` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetEntry {
    length: usize,
    count: usize,
}

impl FleetEntry {
    /// Create a new fleet entry.
    pub const fn new(length: usize, count: usize) -> Self {
        Self { length, count }
    }

    /// Boat length in cells.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of boats of this length.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl From<(usize, usize)> for FleetEntry {
    fn from((length, count): (usize, usize)) -> Self {
        Self::new(length, count)
    }
}

pub const DEFAULT_FLEET: [FleetEntry; 4] = [
    FleetEntry::new(5, 1),
    FleetEntry::new(4, 1),
    FleetEntry::new(3, 2),
    FleetEntry::new(2, 1),
];

/// Total number of boats described by a fleet, saturating at `usize::MAX`.
pub fn fleet_boat_count(fleet: &[FleetEntry]) -> usize {
    fleet.iter().fold(0usize, |n, e| n.saturating_add(e.count()))
}

/// Timing knobs of the engine, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Presses at least this long confirm a boat; shorter ones rotate it.
    pub long_press_ms: u64,
    /// How long to wait for the opponent READY before deciding alone.
    pub handshake_timeout_ms: u64,
    /// Interval between READY repeats while waiting for the opponent.
    pub ready_repeat_ms: u64,
    /// How long OpponentShot and ShowResult stay on screen.
    pub display_ms: u64,
    /// Minimum interval between AIM broadcasts; `None` disables them.
    pub aim_interval_ms: Option<u64>,
    /// How long a received AIM stays visible.
    pub aim_freshness_ms: u64,
    /// Interval between SHOT retransmissions; `None` disables them.
    pub shot_retry_ms: Option<u64>,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            long_press_ms: 500,
            handshake_timeout_ms: 10_000,
            ready_repeat_ms: 500,
            display_ms: 1_000,
            aim_interval_ms: Some(150),
            aim_freshness_ms: 1_500,
            shot_retry_ms: Some(1_000),
        }
    }
}

/// Per-session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub timing: Timing,
    pub fleet: Vec<FleetEntry>,
    /// Attach `#<seq>` to SHOT/RESULT. Disable to talk to peers that send
    /// the bare formats only.
    pub sequenced_shots: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            timing: Timing::default(),
            fleet: DEFAULT_FLEET.to_vec(),
            sequenced_shots: true,
        }
    }
}

impl GameConfig {
    /// Default timing with a custom fleet.
    pub fn with_fleet(fleet: &[FleetEntry]) -> Self {
        Self {
            fleet: fleet.to_vec(),
            ..Self::default()
        }
    }

    /// Bare wire formats only: no sequence numbers, no SHOT retransmission.
    pub fn legacy(mut self) -> Self {
        self.sequenced_shots = false;
        self.timing.shot_retry_ms = None;
        self
    }
}
