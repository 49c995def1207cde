use crate::board::BoardModel;
use crate::common::{BoardError, ShotReport};

/// Local adjudication of one incoming shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotOutcome {
    pub was_hit: bool,
    /// Index of the boat the shot belongs to, when that boat is now sunk.
    pub sunk_boat: Option<usize>,
}

impl ShotOutcome {
    /// The report sent back to the shooter.
    pub fn report(&self) -> ShotReport {
        match (self.was_hit, self.sunk_boat) {
            (false, _) => ShotReport::Miss,
            (true, None) => ShotReport::Hit,
            (true, Some(_)) => ShotReport::Sink,
        }
    }
}

/// Resolve a shot at `(x, y)` against our own board.
///
/// The receiver of a SHOT is the only authority on its outcome. Repeating a
/// shot is harmless: the hit grid does not change and a sunk boat stays sunk.
pub fn resolve_shot(board: &mut BoardModel, x: usize, y: usize) -> Result<ShotOutcome, BoardError> {
    board.record_shot(x, y)?;
    if !board.occupied().get(x, y)? {
        return Ok(ShotOutcome {
            was_hit: false,
            sunk_boat: None,
        });
    }
    board.record_hit(x, y)?;
    let sunk_boat = board.boat_at(x, y).filter(|&i| board.is_sunk(i));
    Ok(ShotOutcome {
        was_hit: true,
        sunk_boat,
    })
}
