//! Interactive boat layout driven by the joystick.
//!
//! Movement and rotation clamp the current boat onto the matrix. A long press
//! tries to confirm it; a position that leaves the matrix or overlaps a
//! confirmed boat is rejected without touching the board.

use crate::board::BoardModel;
use crate::boat::Boat;
use crate::common::{BoardError, PlacementError, PlacementRejection};
use crate::config::{fleet_boat_count, FleetEntry, BOARD_HEIGHT, BOARD_WIDTH, MAX_BOATS};
use crate::input::ButtonEdge;

/// What a single placement tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementStep {
    /// Nothing changed.
    Idle,
    /// The current boat moved (possibly clamped in place).
    Moved,
    /// A short press toggled the orientation.
    Rotated,
    /// A long press confirmed the boat at `index`.
    Confirmed { index: usize, finished: bool },
    /// A long press was refused.
    Rejected(PlacementRejection),
}

/// Builds the local layout one boat at a time.
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    long_press_ms: u64,
    started: bool,
    current: Option<usize>,
    pressed_at: Option<u64>,
}

impl PlacementEngine {
    pub fn new(long_press_ms: u64) -> Self {
        Self {
            long_press_ms,
            started: false,
            current: None,
            pressed_at: None,
        }
    }

    /// Reset `board` to the boats described by `fleet`, all unplaced,
    /// centered and horizontal, and make the first one current.
    pub fn begin(&mut self, board: &mut BoardModel, fleet: &[FleetEntry]) -> Result<(), PlacementError> {
        let requested = fleet_boat_count(fleet);
        if requested > MAX_BOATS {
            return Err(PlacementError::CapacityExceeded {
                requested,
                max: MAX_BOATS,
            });
        }
        if requested == 0 {
            return Err(PlacementError::EmptyFleet);
        }
        let longest_fit = BOARD_WIDTH.min(BOARD_HEIGHT);
        if let Some(bad) = fleet
            .iter()
            .find(|e| e.count() > 0 && (e.length() == 0 || e.length() > longest_fit))
        {
            return Err(PlacementError::InvalidLength { length: bad.length() });
        }

        board.reset(
            fleet
                .iter()
                .flat_map(|e| core::iter::repeat(e.length()).take(e.count()))
                .map(Boat::new),
        );
        self.started = true;
        self.current = board.next_unplaced();
        self.pressed_at = None;
        log::debug!("placement started with {} boats", requested);
        Ok(())
    }

    /// Index of the boat being positioned.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Returns `true` once every boat has been confirmed.
    pub fn is_finished(&self) -> bool {
        self.started && self.current.is_none()
    }

    /// Apply one tick of input to the current boat.
    pub fn advance(
        &mut self,
        board: &mut BoardModel,
        dx: i8,
        dy: i8,
        edge: Option<ButtonEdge>,
        now: u64,
    ) -> PlacementStep {
        let Some(index) = self.current else {
            return PlacementStep::Idle;
        };

        let mut step = PlacementStep::Idle;
        if dx != 0 || dy != 0 {
            if let Some(boat) = board.boat_mut(index) {
                boat.translate_clamped(dx as i32, dy as i32);
                step = PlacementStep::Moved;
            }
        }

        match edge {
            Some(ButtonEdge::Pressed) => {
                self.pressed_at = Some(now);
            }
            Some(ButtonEdge::Released) => {
                if let Some(start) = self.pressed_at.take() {
                    let held = now.saturating_sub(start);
                    step = if held < self.long_press_ms {
                        self.rotate(board, index)
                    } else {
                        self.confirm(board, index)
                    };
                }
            }
            None => {}
        }
        step
    }

    fn rotate(&mut self, board: &mut BoardModel, index: usize) -> PlacementStep {
        match board.boat_mut(index) {
            Some(boat) => {
                boat.rotate_clamped();
                PlacementStep::Rotated
            }
            None => PlacementStep::Idle,
        }
    }

    fn confirm(&mut self, board: &mut BoardModel, index: usize) -> PlacementStep {
        match board.confirm(index) {
            Ok(()) => {
                self.current = board.next_unplaced();
                if let Some(next) = self.current {
                    if let Some(boat) = board.boat_mut(next) {
                        boat.recenter();
                    }
                }
                let finished = self.current.is_none();
                log::debug!("boat {} confirmed, finished={}", index, finished);
                PlacementStep::Confirmed { index, finished }
            }
            Err(BoardError::Rejected(reason)) => {
                log::debug!("boat {} rejected: {}", index, reason);
                PlacementStep::Rejected(reason)
            }
            Err(e) => {
                log::warn!("boat {} could not be confirmed: {}", index, e);
                PlacementStep::Idle
            }
        }
    }
}
