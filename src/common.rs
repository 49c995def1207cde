//! Common types: shot reports and board/placement errors.

use core::fmt;

use crate::bitboard::BitBoardError;
use crate::config::{BOARD_HEIGHT, BOARD_WIDTH};

/// A cell on the matrix as `(x, y)`.
pub type Cell = (usize, usize);

/// Returns `true` when the signed coordinate lies on the matrix.
pub fn in_bounds(x: i32, y: i32) -> bool {
    x >= 0 && y >= 0 && (x as usize) < BOARD_WIDTH && (y as usize) < BOARD_HEIGHT
}

/// Outcome of a shot as reported on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum ShotReport {
    /// Shot landed on water.
    Miss,
    /// Shot hit a boat that is still afloat.
    Hit,
    /// Shot hit the last intact cell of a boat.
    Sink,
}

/// Current status of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchStatus {
    InProgress,
    Won,
    Lost,
}

/// Errors returned by board operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    /// Underlying bitboard error (e.g. index out of range).
    BitBoard(BitBoardError),
    /// Specified boat index does not exist.
    InvalidIndex,
    /// Boat was already confirmed.
    AlreadyPlaced,
    /// The boat list is at capacity.
    Full,
    /// The boat cannot be confirmed where it stands.
    Rejected(PlacementRejection),
}

impl From<PlacementRejection> for BoardError {
    fn from(reason: PlacementRejection) -> Self {
        BoardError::Rejected(reason)
    }
}

impl From<BitBoardError> for BoardError {
    fn from(err: BitBoardError) -> Self {
        BoardError::BitBoard(err)
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::BitBoard(e) => write!(f, "BitBoard error: {}", e),
            BoardError::InvalidIndex => write!(f, "Boat index is out of range"),
            BoardError::AlreadyPlaced => write!(f, "Boat is already placed on the board"),
            BoardError::Full => write!(f, "Board already holds the maximum number of boats"),
            BoardError::Rejected(reason) => write!(f, "Placement rejected: {}", reason),
        }
    }
}

/// Errors raised when a placement round cannot start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// The fleet asks for more boats than the board can hold.
    CapacityExceeded { requested: usize, max: usize },
    /// A boat length is zero or does not fit on the matrix.
    InvalidLength { length: usize },
    /// The fleet contains no boats at all.
    EmptyFleet,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::CapacityExceeded { requested, max } => {
                write!(f, "Fleet requests {} boats but capacity is {}", requested, max)
            }
            PlacementError::InvalidLength { length } => {
                write!(f, "Boat length {} does not fit on the board", length)
            }
            PlacementError::EmptyFleet => write!(f, "Fleet contains no boats"),
        }
    }
}

/// Why a boat could not be confirmed where it stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementRejection {
    /// Part of the boat lies outside the matrix.
    OutOfBounds,
    /// The boat overlaps an already placed boat.
    Overlap,
}

impl fmt::Display for PlacementRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementRejection::OutOfBounds => write!(f, "Boat placement is out of bounds"),
            PlacementRejection::Overlap => write!(f, "Boat placement overlaps another boat"),
        }
    }
}
