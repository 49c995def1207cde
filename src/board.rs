//! Local board model: boat inventory, occupancy and received hits.

use alloc::vec::Vec;
use core::fmt;

use crate::boat::Boat;
use crate::common::{BoardError, PlacementRejection};
use crate::config::{Bits, MAX_BOATS};

/// Boats of the local player plus the grids derived from them.
pub struct BoardModel {
    boats: Vec<Boat>,
    occupied: Bits,
    hit_received: Bits,
    shots_received: Bits,
}

impl BoardModel {
    /// Create an empty board (no boats, nothing hit).
    pub fn new() -> Self {
        BoardModel {
            boats: Vec::with_capacity(MAX_BOATS),
            occupied: Bits::new(),
            hit_received: Bits::new(),
            shots_received: Bits::new(),
        }
    }

    /// Replace the boat list and clear both grids.
    pub(crate) fn reset(&mut self, boats: impl IntoIterator<Item = Boat>) {
        self.boats.clear();
        self.boats.extend(boats);
        self.occupied.clear_all();
        self.hit_received.clear_all();
        self.shots_received.clear_all();
    }

    /// Boats in placement order, placed or not.
    pub fn boats(&self) -> &[Boat] {
        &self.boats
    }

    pub(crate) fn boat_mut(&mut self, index: usize) -> Option<&mut Boat> {
        self.boats.get_mut(index)
    }

    /// Cells covered by confirmed boats.
    pub fn occupied(&self) -> Bits {
        self.occupied
    }

    /// Cells of this board struck by the opponent.
    pub fn hit_received(&self) -> Bits {
        self.hit_received
    }

    /// Every cell the opponent has fired at, hit or not.
    pub fn shots_received(&self) -> Bits {
        self.shots_received
    }

    /// Check a candidate boat against bounds and the boats already placed.
    pub fn validate(&self, candidate: &Boat) -> Result<Bits, PlacementRejection> {
        let mask = candidate.mask()?;
        if mask.intersects(&self.occupied) {
            return Err(PlacementRejection::Overlap);
        }
        Ok(mask)
    }

    /// Confirm the boat at `index` where it currently stands.
    ///
    /// A rejected position leaves the board untouched.
    pub fn confirm(&mut self, index: usize) -> Result<(), BoardError> {
        let boat = self.boats.get(index).ok_or(BoardError::InvalidIndex)?;
        if boat.is_placed() {
            return Err(BoardError::AlreadyPlaced);
        }
        let mask = self.validate(boat)?;
        self.occupied = self.occupied | mask;
        self.boats[index].freeze();
        Ok(())
    }

    /// Append a boat and confirm it immediately. Used to build fixed layouts.
    pub fn place(&mut self, boat: Boat) -> Result<usize, BoardError> {
        if self.boats.len() >= MAX_BOATS {
            return Err(BoardError::Full);
        }
        let mask = self.validate(&boat)?;
        let mut boat = boat;
        boat.freeze();
        self.occupied = self.occupied | mask;
        self.boats.push(boat);
        Ok(self.boats.len() - 1)
    }

    /// Index of the first boat not yet confirmed.
    pub fn next_unplaced(&self) -> Option<usize> {
        self.boats.iter().position(|b| !b.is_placed())
    }

    /// Index of the placed boat covering `(x, y)`.
    pub fn boat_at(&self, x: usize, y: usize) -> Option<usize> {
        self.boats
            .iter()
            .position(|b| b.is_placed() && b.covers(x, y))
    }

    /// Remember that the opponent fired at `(x, y)`.
    pub(crate) fn record_shot(&mut self, x: usize, y: usize) -> Result<(), BoardError> {
        self.shots_received.set(x, y)?;
        Ok(())
    }

    /// Mark `(x, y)` as struck by the opponent.
    pub(crate) fn record_hit(&mut self, x: usize, y: usize) -> Result<(), BoardError> {
        self.hit_received.set(x, y)?;
        Ok(())
    }

    /// A boat is sunk when every cell it covers has been struck.
    pub fn is_sunk(&self, index: usize) -> bool {
        match self.boats.get(index) {
            Some(boat) if boat.is_placed() => boat
                .cells()
                .all(|(x, y)| self.hit_received.get(x, y).unwrap_or(false)),
            _ => false,
        }
    }

    /// Number of placed boats that are sunk.
    pub fn sunk_count(&self) -> usize {
        (0..self.boats.len()).filter(|&i| self.is_sunk(i)).count()
    }

    /// Returns `true` when the fleet is placed and every boat is sunk.
    pub fn all_sunk(&self) -> bool {
        !self.boats.is_empty() && (0..self.boats.len()).all(|i| self.is_sunk(i))
    }
}

impl Default for BoardModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BoardModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "BoardModel {{\n  boats: {:?},\n  occupied: {:?},\n  hit_received: {:?},\n  shots_received: {:?}\n}}",
            self.boats, self.occupied, self.hit_received, self.shots_received
        )
    }
}
