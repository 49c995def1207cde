//! Boat geometry and the two positioning policies.
//!
//! Movement uses the *clamp* policy: a translated or rotated boat is pulled
//! back onto the matrix so it always stays visible. Confirmation uses the
//! *reject* policy implemented by [`Boat::mask`] and the board model.

use core::fmt;

use crate::common::{Cell, PlacementRejection};
use crate::config::{Bits, BOARD_HEIGHT, BOARD_WIDTH};

/// Orientation of a boat on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// The other orientation.
    pub fn toggled(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// A straight boat anchored at its top-left cell.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Boat {
    length: usize,
    x: usize,
    y: usize,
    orientation: Orientation,
    placed: bool,
}

impl Boat {
    /// Unplaced boat of `length` at the default centered, horizontal position.
    pub fn new(length: usize) -> Self {
        let mut boat = Self {
            length,
            x: 0,
            y: 0,
            orientation: Orientation::Horizontal,
            placed: false,
        };
        boat.recenter();
        boat
    }

    /// Unplaced boat at an explicit anchor. No bounds are enforced.
    pub fn at(length: usize, x: usize, y: usize, orientation: Orientation) -> Self {
        Self {
            length,
            x,
            y,
            orientation,
            placed: false,
        }
    }

    /// Boat length in cells.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Anchor cell `(x, y)`.
    pub fn anchor(&self) -> Cell {
        (self.x, self.y)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Whether the boat has been confirmed.
    pub fn is_placed(&self) -> bool {
        self.placed
    }

    pub(crate) fn freeze(&mut self) {
        self.placed = true;
    }

    /// Width and height of the boat's footprint.
    pub fn extent(&self) -> (usize, usize) {
        match self.orientation {
            Orientation::Horizontal => (self.length, 1),
            Orientation::Vertical => (1, self.length),
        }
    }

    /// Cells covered by the boat, starting at the anchor.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.length).map(move |i| match self.orientation {
            Orientation::Horizontal => (self.x + i, self.y),
            Orientation::Vertical => (self.x, self.y + i),
        })
    }

    /// Whether `(x, y)` is one of the boat's cells.
    pub fn covers(&self, x: usize, y: usize) -> bool {
        let (w, h) = self.extent();
        x >= self.x && x - self.x < w && y >= self.y && y - self.y < h
    }

    /// Whether every cell lies on the matrix.
    pub fn in_bounds(&self) -> bool {
        let (w, h) = self.extent();
        let fits = |start: usize, extent: usize, size: usize| {
            start.checked_add(extent).map_or(false, |end| end <= size)
        };
        fits(self.x, w, BOARD_WIDTH) && fits(self.y, h, BOARD_HEIGHT)
    }

    /// Occupancy mask of the boat, rejecting any footprint that leaves the matrix.
    pub fn mask(&self) -> Result<Bits, PlacementRejection> {
        if !self.in_bounds() {
            return Err(PlacementRejection::OutOfBounds);
        }
        let mut mask = Bits::new();
        for (x, y) in self.cells() {
            mask.set(x, y).map_err(|_| PlacementRejection::OutOfBounds)?;
        }
        Ok(mask)
    }

    /// Move back to the centered default, horizontal.
    pub fn recenter(&mut self) {
        self.orientation = Orientation::Horizontal;
        let (w, h) = self.extent();
        self.x = BOARD_WIDTH.saturating_sub(w) / 2;
        self.y = BOARD_HEIGHT.saturating_sub(h) / 2;
    }

    /// Translate by `(dx, dy)` and clamp the footprint onto the matrix.
    pub fn translate_clamped(&mut self, dx: i32, dy: i32) {
        let (w, h) = self.extent();
        self.x = clamp_axis(self.x as i32 + dx, BOARD_WIDTH, w);
        self.y = clamp_axis(self.y as i32 + dy, BOARD_HEIGHT, h);
    }

    /// Toggle orientation around the anchor and clamp the footprint onto the matrix.
    pub fn rotate_clamped(&mut self) {
        self.orientation = self.orientation.toggled();
        self.translate_clamped(0, 0);
    }
}

fn clamp_axis(pos: i32, size: usize, extent: usize) -> usize {
    let max = size.saturating_sub(extent) as i32;
    pos.clamp(0, max) as usize
}

impl fmt::Debug for Boat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Boat {{ length: {}, anchor: ({}, {}), orientation: {:?}, placed: {} }}",
            self.length, self.x, self.y, self.orientation, self.placed,
        )
    }
}
