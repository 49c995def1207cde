//! What this player has learned about the opponent's board.
//!
//! The grid only ever holds outcomes disclosed by RESULT messages. Boat shapes
//! are never known in advance, so a SINK report is turned into a sunk region
//! by flooding the straight run of hit cells through the reported cell.

use crate::common::{Cell, ShotReport};
use crate::config::{BOARD_HEIGHT, BOARD_WIDTH};

/// Knowledge about a single opponent cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellKnowledge {
    #[default]
    Unknown,
    Miss,
    Hit,
    /// Part of a sunk boat. Never changes afterwards.
    Sunk,
}

/// Per-cell record of our shots against the opponent.
#[derive(Clone, PartialEq, Eq)]
pub struct KnowledgeGrid {
    cells: [[CellKnowledge; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl KnowledgeGrid {
    /// A grid where every cell is unknown.
    pub fn new() -> Self {
        Self {
            cells: [[CellKnowledge::Unknown; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    /// Knowledge at `(x, y)`; off-grid cells read as `Unknown`.
    pub fn get(&self, x: usize, y: usize) -> CellKnowledge {
        self.cells
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or_default()
    }

    fn set(&mut self, x: usize, y: usize, value: CellKnowledge) {
        if let Some(cell) = self.cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            if *cell != CellKnowledge::Sunk {
                *cell = value;
            }
        }
    }

    /// Number of cells holding `value`.
    pub fn count(&self, value: CellKnowledge) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&c| c == value)
            .count()
    }

    /// Iterates over `(x, y, knowledge)` for every cell, row by row.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, CellKnowledge)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .flat_map(|(y, row)| row.iter().enumerate().map(move |(x, &c)| (x, y, c)))
    }

    /// Record the reported outcome of our shot at `(x, y)`.
    ///
    /// Returns `true` when a SINK report sank cells that were not sunk before.
    pub fn apply(&mut self, x: usize, y: usize, report: ShotReport) -> bool {
        if x >= BOARD_WIDTH || y >= BOARD_HEIGHT {
            return false;
        }
        match report {
            ShotReport::Miss => {
                self.set(x, y, CellKnowledge::Miss);
                false
            }
            ShotReport::Hit => {
                self.set(x, y, CellKnowledge::Hit);
                false
            }
            ShotReport::Sink => {
                if self.get(x, y) == CellKnowledge::Sunk {
                    return false;
                }
                self.set(x, y, CellKnowledge::Hit);
                self.propagate_sunk(x, y);
                true
            }
        }
    }

    /// Promote the run of hits through `(x, y)` to sunk.
    ///
    /// The horizontal run wins when it is longer than one cell; otherwise the
    /// vertical run (possibly just the cell itself) is promoted.
    pub fn propagate_sunk(&mut self, x: usize, y: usize) {
        let (start, len) = self.hit_run(x, y, (1, 0));
        if len > 1 {
            for i in 0..len {
                self.cells[y][start + i] = CellKnowledge::Sunk;
            }
            return;
        }
        let (start, len) = self.hit_run(x, y, (0, 1));
        for i in 0..len {
            self.cells[start + i][x] = CellKnowledge::Sunk;
        }
    }

    /// Start coordinate along the axis and length of the contiguous `Hit`
    /// run containing `(x, y)` in direction `step`.
    fn hit_run(&self, x: usize, y: usize, step: (usize, usize)) -> (usize, usize) {
        let is_hit = |cell: Cell| self.get(cell.0, cell.1) == CellKnowledge::Hit;
        if !is_hit((x, y)) {
            return (if step.0 == 1 { x } else { y }, 0);
        }
        let (mut lo_x, mut lo_y) = (x, y);
        while lo_x >= step.0 && lo_y >= step.1 && is_hit((lo_x - step.0, lo_y - step.1)) {
            lo_x -= step.0;
            lo_y -= step.1;
        }
        let (mut hi_x, mut hi_y) = (x, y);
        while hi_x + step.0 < BOARD_WIDTH
            && hi_y + step.1 < BOARD_HEIGHT
            && is_hit((hi_x + step.0, hi_y + step.1))
        {
            hi_x += step.0;
            hi_y += step.1;
        }
        if step.0 == 1 {
            (lo_x, hi_x - lo_x + 1)
        } else {
            (lo_y, hi_y - lo_y + 1)
        }
    }
}

impl Default for KnowledgeGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for KnowledgeGrid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "KnowledgeGrid [")?;
        for row in self.cells.iter() {
            f.write_str("  ")?;
            for c in row.iter() {
                let ch = match c {
                    CellKnowledge::Unknown => ".",
                    CellKnowledge::Miss => "o",
                    CellKnowledge::Hit => "x",
                    CellKnowledge::Sunk => "#",
                };
                f.write_str(ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "]")
    }
}
