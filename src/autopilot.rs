//! Scripted player that drives a session through the joystick interface.
//!
//! The autopilot never touches the board directly. It produces the same
//! [`InputSample`]s a human would: it steers each boat to a random free spot,
//! rotates with short presses and confirms with a long press. In battle it
//! walks the aim cursor to the most likely cell and clicks.

use alloc::vec::Vec;

use rand::Rng;

use crate::boat::{Boat, Orientation};
use crate::common::Cell;
use crate::config::{FleetEntry, BOARD_HEIGHT, BOARD_WIDTH};
use crate::game::{GameSession, Stage};
use crate::input::InputSample;
use crate::knowledge::{CellKnowledge, KnowledgeGrid};
use crate::placement::PlacementStep;
use crate::turn::TurnPhase;

/// Placements covering known hits weigh this much more per hit, so cells
/// next to a hit dominate the search.
const HIT_BIAS: u64 = 10;
/// Random spots tried before settling for the current one.
const PLACEMENT_ATTEMPTS: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Hold {
    since: u64,
    long: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Goal {
    index: usize,
    x: usize,
    y: usize,
    orientation: Orientation,
}

pub struct Autopilot<R: Rng> {
    rng: R,
    long_press_ms: u64,
    hold: Option<Hold>,
    goal: Option<Goal>,
    target: Option<Cell>,
}

impl<R: Rng> Autopilot<R> {
    pub fn new(rng: R, long_press_ms: u64) -> Self {
        Self {
            rng,
            long_press_ms,
            hold: None,
            goal: None,
            target: None,
        }
    }

    /// Cell the autopilot is currently steering towards in battle.
    pub fn target(&self) -> Option<Cell> {
        self.target
    }

    /// Next input for `session` at `now`.
    pub fn sample(&mut self, session: &GameSession, now: u64) -> InputSample {
        if let Some(hold) = self.hold {
            if hold.long && now.saturating_sub(hold.since) < self.long_press_ms {
                return InputSample::button();
            }
            self.hold = None;
            return InputSample::IDLE;
        }
        match session.stage() {
            Stage::Placement => self.place(session, now),
            Stage::Battle(TurnPhase::MyTurn) => self.aim_and_fire(session, now),
            _ => InputSample::IDLE,
        }
    }

    fn press(&mut self, now: u64, long: bool) -> InputSample {
        self.hold = Some(Hold { since: now, long });
        InputSample::button()
    }

    fn place(&mut self, session: &GameSession, now: u64) -> InputSample {
        let Some(index) = session.placement().current() else {
            return InputSample::IDLE;
        };
        let Some(boat) = session.board().boats().get(index).copied() else {
            return InputSample::IDLE;
        };
        let rejected = matches!(session.last_placement(), PlacementStep::Rejected(_));
        let stale = self.goal.map_or(true, |g| g.index != index);
        if stale || rejected {
            self.goal = Some(self.pick_spot(session, index, &boat));
        }
        let Some(goal) = self.goal else {
            return InputSample::IDLE;
        };

        if boat.orientation() != goal.orientation {
            return self.press(now, false);
        }
        let (x, y) = boat.anchor();
        if (x, y) != (goal.x, goal.y) {
            return InputSample::new(step_towards(x, goal.x), step_towards(y, goal.y), false);
        }
        self.press(now, true)
    }

    fn pick_spot(&mut self, session: &GameSession, index: usize, boat: &Boat) -> Goal {
        let length = boat.length();
        let mut fallback = None;
        for _ in 0..PLACEMENT_ATTEMPTS {
            let orientation = if self.rng.random_bool(0.5) {
                Orientation::Horizontal
            } else {
                Orientation::Vertical
            };
            let candidate = Boat::at(length, 0, 0, orientation);
            let (w, h) = candidate.extent();
            let x = self.rng.random_range(0..=BOARD_WIDTH.saturating_sub(w));
            let y = self.rng.random_range(0..=BOARD_HEIGHT.saturating_sub(h));
            let goal = Goal {
                index,
                x,
                y,
                orientation,
            };
            if session
                .board()
                .validate(&Boat::at(length, x, y, orientation))
                .is_ok()
            {
                log::trace!("boat {} heading to ({}, {}) {:?}", index, x, y, orientation);
                return goal;
            }
            if fallback.is_none() {
                fallback = Some(goal);
            }
        }
        fallback.unwrap_or(Goal {
            index,
            x: boat.anchor().0,
            y: boat.anchor().1,
            orientation: boat.orientation(),
        })
    }

    fn aim_and_fire(&mut self, session: &GameSession, now: u64) -> InputSample {
        let knowledge = session.knowledge();
        let still_open = self
            .target
            .map_or(false, |(x, y)| knowledge.get(x, y) == CellKnowledge::Unknown);
        if !still_open {
            self.target = choose_target(knowledge, &session.config().fleet, &mut self.rng);
        }
        let Some((tx, ty)) = self.target else {
            return InputSample::IDLE;
        };
        let (ax, ay) = session.turn().aim();
        if (ax, ay) != (tx, ty) {
            return InputSample::new(step_towards(ax, tx), step_towards(ay, ty), false);
        }
        self.press(now, false)
    }
}

fn step_towards(from: usize, to: usize) -> i8 {
    match from.cmp(&to) {
        core::cmp::Ordering::Less => 1,
        core::cmp::Ordering::Equal => 0,
        core::cmp::Ordering::Greater => -1,
    }
}

/// Relative likelihood that each unknown cell holds part of a boat.
///
/// Every straight placement of every fleet length that avoids misses and
/// sunk cells contributes to the unknown cells it covers, scaled up by the
/// hits it already contains.
pub fn density(knowledge: &KnowledgeGrid, fleet: &[FleetEntry]) -> [[u64; BOARD_WIDTH]; BOARD_HEIGHT] {
    let mut matrix = [[0u64; BOARD_WIDTH]; BOARD_HEIGHT];
    let mut lengths: Vec<usize> = fleet
        .iter()
        .filter(|e| e.count() > 0 && e.length() > 0)
        .map(|e| e.length())
        .collect();
    lengths.sort_unstable();
    lengths.dedup();

    for &len in &lengths {
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let probe = Boat::at(len, 0, 0, orientation);
            let (w, h) = probe.extent();
            if w > BOARD_WIDTH || h > BOARD_HEIGHT {
                continue;
            }
            for y in 0..=BOARD_HEIGHT - h {
                for x in 0..=BOARD_WIDTH - w {
                    let boat = Boat::at(len, x, y, orientation);
                    let mut hits = 0u32;
                    let mut blocked = false;
                    for (cx, cy) in boat.cells() {
                        match knowledge.get(cx, cy) {
                            CellKnowledge::Miss | CellKnowledge::Sunk => {
                                blocked = true;
                                break;
                            }
                            CellKnowledge::Hit => hits += 1,
                            CellKnowledge::Unknown => {}
                        }
                    }
                    if blocked {
                        continue;
                    }
                    let weight = HIT_BIAS.saturating_pow(hits);
                    for (cx, cy) in boat.cells() {
                        if knowledge.get(cx, cy) == CellKnowledge::Unknown {
                            matrix[cy][cx] = matrix[cy][cx].saturating_add(weight);
                        }
                    }
                }
            }
        }
    }
    matrix
}

/// Pick the densest unknown cell, breaking ties at random. Falls back to any
/// unknown cell when no placement fits; `None` once nothing is left to shoot.
pub fn choose_target<R: Rng + ?Sized>(
    knowledge: &KnowledgeGrid,
    fleet: &[FleetEntry],
    rng: &mut R,
) -> Option<Cell> {
    let matrix = density(knowledge, fleet);
    let mut best = 0u64;
    let mut candidates: Vec<Cell> = Vec::new();
    for (x, y, cell) in knowledge.iter() {
        if cell != CellKnowledge::Unknown {
            continue;
        }
        let weight = matrix[y][x];
        if weight > best {
            best = weight;
            candidates.clear();
        }
        if weight == best {
            candidates.push((x, y));
        }
    }
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[rng.random_range(0..candidates.len())])
}
