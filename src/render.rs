//! Frame composition for the 16×16 LED matrix.
//!
//! The engine never drives LEDs itself. It fills a [`Frame`] of abstract
//! [`Paint`] values that a display driver maps to colours; `to_ascii` gives
//! the same picture for terminals and logs.

use alloc::string::String;

use crate::common::Cell;
use crate::config::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::game::{GameSession, Stage};
use crate::knowledge::CellKnowledge;
use crate::turn::TurnPhase;

/// What a single LED shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Paint {
    #[default]
    Off,
    Water,
    Boat,
    /// Boat being placed, currently valid.
    Candidate,
    /// Boat being placed, overlapping or off the matrix.
    Blocked,
    Cursor,
    OpponentAim,
    Hit,
    Miss,
    Sunk,
}

impl Paint {
    fn glyph(self) -> char {
        match self {
            Paint::Off => ' ',
            Paint::Water => '.',
            Paint::Boat => '#',
            Paint::Candidate => '+',
            Paint::Blocked => '!',
            Paint::Cursor => '@',
            Paint::OpponentAim => '?',
            Paint::Hit => 'X',
            Paint::Miss => 'o',
            Paint::Sunk => '%',
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    cells: [[Paint; BOARD_WIDTH]; BOARD_HEIGHT],
}

impl Frame {
    /// Number of LEDs on the strip.
    pub const LEDS: usize = BOARD_WIDTH * BOARD_HEIGHT;

    pub fn new(fill: Paint) -> Self {
        Self {
            cells: [[fill; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    /// Paint at `(x, y)`; off-matrix reads are `Off`.
    pub fn get(&self, x: usize, y: usize) -> Paint {
        self.cells
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(Paint::Off)
    }

    /// Off-matrix writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, paint: Paint) {
        if let Some(cell) = self.cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = paint;
        }
    }

    /// Position of `(x, y)` on the serpentine LED strip: even rows run left
    /// to right, odd rows right to left.
    pub fn led_index(x: usize, y: usize) -> Option<usize> {
        if x >= BOARD_WIDTH || y >= BOARD_HEIGHT {
            return None;
        }
        let column = if y % 2 == 0 { x } else { BOARD_WIDTH - 1 - x };
        Some(y * BOARD_WIDTH + column)
    }

    /// Paints in strip order, ready to be pushed to the LEDs.
    pub fn strip(&self) -> [Paint; Frame::LEDS] {
        let mut strip = [Paint::Off; Frame::LEDS];
        for (y, row) in self.cells.iter().enumerate() {
            for (x, &paint) in row.iter().enumerate() {
                if let Some(i) = Self::led_index(x, y) {
                    strip[i] = paint;
                }
            }
        }
        strip
    }

    /// Number of LEDs showing `paint`.
    pub fn count(&self, paint: Paint) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&p| p == paint)
            .count()
    }

    /// One text line per row, top row first.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((BOARD_WIDTH + 1) * BOARD_HEIGHT);
        for row in &self.cells {
            out.extend(row.iter().map(|p| p.glyph()));
            out.push('\n');
        }
        out
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new(Paint::Off)
    }
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.to_ascii())
    }
}

/// Compose the frame a node shows at `now`.
pub fn render(session: &GameSession, now: u64) -> Frame {
    match session.stage() {
        Stage::Placement => placement_view(session),
        Stage::AwaitingOpponent => own_board_view(session, session.turn().opponent_aim(now)),
        Stage::Battle(TurnPhase::MyTurn) | Stage::Battle(TurnPhase::ShowResult) => {
            target_view(session)
        }
        Stage::Battle(TurnPhase::GameOver { .. }) => own_board_view(session, None),
        Stage::Battle(_) => own_board_view(session, session.turn().opponent_aim(now)),
    }
}

fn placement_view(session: &GameSession) -> Frame {
    let board = session.board();
    let mut frame = Frame::new(Paint::Water);
    for (x, y) in board.occupied().iter_ones() {
        frame.set(x, y, Paint::Boat);
    }
    let current = session
        .placement()
        .current()
        .and_then(|i| board.boats().get(i));
    if let Some(boat) = current {
        let paint = if board.validate(boat).is_ok() {
            Paint::Candidate
        } else {
            Paint::Blocked
        };
        for (x, y) in boat.cells() {
            frame.set(x, y, paint);
        }
    }
    frame
}

fn own_board_view(session: &GameSession, opponent_aim: Option<Cell>) -> Frame {
    let board = session.board();
    let mut frame = Frame::new(Paint::Water);
    for (x, y) in board.occupied().iter_ones() {
        frame.set(x, y, Paint::Boat);
    }
    for (x, y) in board.shots_received().iter_ones() {
        frame.set(x, y, Paint::Miss);
    }
    for (x, y) in board.hit_received().iter_ones() {
        let paint = match board.boat_at(x, y) {
            Some(i) if board.is_sunk(i) => Paint::Sunk,
            _ => Paint::Hit,
        };
        frame.set(x, y, paint);
    }
    if let Some((x, y)) = opponent_aim {
        frame.set(x, y, Paint::OpponentAim);
    }
    frame
}

fn target_view(session: &GameSession) -> Frame {
    let mut frame = Frame::new(Paint::Water);
    for (x, y, cell) in session.knowledge().iter() {
        let paint = match cell {
            CellKnowledge::Unknown => continue,
            CellKnowledge::Miss => Paint::Miss,
            CellKnowledge::Hit => Paint::Hit,
            CellKnowledge::Sunk => Paint::Sunk,
        };
        frame.set(x, y, paint);
    }
    if session.turn().phase() == TurnPhase::MyTurn {
        let (x, y) = session.turn().aim();
        frame.set(x, y, Paint::Cursor);
    }
    frame
}
