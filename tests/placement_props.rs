use matrix_battleship::{
    fleet_boat_count, BoardModel, Boat, ButtonEdge, FleetEntry, Orientation, PlacementEngine,
    PlacementError, PlacementRejection, PlacementStep, DEFAULT_FLEET, MAX_BOATS,
};
use proptest::prelude::*;

const LONG: u64 = 500;

fn started(fleet: &[FleetEntry]) -> (PlacementEngine, BoardModel) {
    let mut engine = PlacementEngine::new(LONG);
    let mut board = BoardModel::new();
    engine.begin(&mut board, fleet).unwrap();
    (engine, board)
}

/// Press at `now` and release `held` ms later.
fn click(engine: &mut PlacementEngine, board: &mut BoardModel, now: u64, held: u64) -> PlacementStep {
    engine.advance(board, 0, 0, Some(ButtonEdge::Pressed), now);
    engine.advance(board, 0, 0, Some(ButtonEdge::Released), now + held)
}

#[test]
fn capacity_is_checked_before_anything_changes() {
    let mut engine = PlacementEngine::new(LONG);
    let mut board = BoardModel::new();
    let err = engine.begin(&mut board, &[FleetEntry::new(2, MAX_BOATS + 1)]).unwrap_err();
    assert_eq!(err, PlacementError::CapacityExceeded { requested: 11, max: MAX_BOATS });
    assert!(board.boats().is_empty());
    assert_eq!(engine.current(), None);
    assert!(!engine.is_finished());
}

#[test]
fn huge_fleet_counts_saturate_into_capacity_exceeded() {
    let mut engine = PlacementEngine::new(LONG);
    let mut board = BoardModel::new();
    let fleet = [FleetEntry::new(2, usize::MAX), FleetEntry::new(3, 1)];
    assert_eq!(fleet_boat_count(&fleet), usize::MAX);
    assert_eq!(
        engine.begin(&mut board, &fleet),
        Err(PlacementError::CapacityExceeded { requested: usize::MAX, max: MAX_BOATS })
    );
    assert!(board.boats().is_empty());
}

#[test]
fn bad_fleets_are_refused() {
    let mut engine = PlacementEngine::new(LONG);
    let mut board = BoardModel::new();
    assert_eq!(engine.begin(&mut board, &[]), Err(PlacementError::EmptyFleet));
    assert_eq!(
        engine.begin(&mut board, &[FleetEntry::new(17, 1)]),
        Err(PlacementError::InvalidLength { length: 17 })
    );
    assert_eq!(
        engine.begin(&mut board, &[FleetEntry::new(0, 1)]),
        Err(PlacementError::InvalidLength { length: 0 })
    );
}

#[test]
fn short_press_rotates_long_press_confirms() {
    let (mut engine, mut board) = started(&[FleetEntry::new(3, 2)]);
    assert_eq!(click(&mut engine, &mut board, 0, 100), PlacementStep::Rotated);
    assert_eq!(board.boats()[0].orientation(), Orientation::Vertical);

    let step = click(&mut engine, &mut board, 1_000, LONG);
    assert_eq!(step, PlacementStep::Confirmed { index: 0, finished: false });
    assert_eq!(engine.current(), Some(1));
    assert_eq!(board.occupied().count_ones(), 3);

    // The next boat starts at the same centre and overlaps: rejected.
    let step = click(&mut engine, &mut board, 2_000, 800);
    assert_eq!(step, PlacementStep::Rejected(PlacementRejection::Overlap));
    assert_eq!(engine.current(), Some(1));
    assert_eq!(board.occupied().count_ones(), 3);

    engine.advance(&mut board, 1, 0, None, 3_000);
    engine.advance(&mut board, 1, 0, None, 3_010);
    let step = click(&mut engine, &mut board, 3_100, 600);
    assert_eq!(step, PlacementStep::Confirmed { index: 1, finished: true });
    assert!(engine.is_finished());
    assert_eq!(engine.advance(&mut board, 1, 1, None, 4_000), PlacementStep::Idle);
}

#[test]
fn release_without_press_does_nothing() {
    let (mut engine, mut board) = started(&DEFAULT_FLEET);
    let step = engine.advance(&mut board, 0, 0, Some(ButtonEdge::Released), 10);
    assert_eq!(step, PlacementStep::Idle);
}

#[test]
fn moving_into_the_wall_is_clamped() {
    let (mut engine, mut board) = started(&[FleetEntry::new(5, 1)]);
    for t in 0..20 {
        engine.advance(&mut board, -1, -1, None, t * 10);
    }
    assert_eq!(board.boats()[0].anchor(), (0, 0));
    for t in 0..20 {
        engine.advance(&mut board, 1, 1, None, 1_000 + t * 10);
    }
    assert_eq!(board.boats()[0].anchor(), (11, 15));
}

#[derive(Debug, Clone)]
enum Action {
    Move(i8, i8),
    Click(u64),
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (-1i8..=1, -1i8..=1).prop_map(|(dx, dy)| Action::Move(dx, dy)),
        (0u64..1_000).prop_map(Action::Click),
    ]
}

fn fleet() -> impl Strategy<Value = Vec<FleetEntry>> {
    prop::collection::vec((1usize..=16, 0usize..=3), 1..6)
        .prop_map(|entries| {
            entries
                .into_iter()
                .map(FleetEntry::from)
                .collect::<Vec<_>>()
        })
        .prop_filter("fleet within capacity", |f| {
            (1..=MAX_BOATS).contains(&fleet_boat_count(f))
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn begin_builds_every_boat_unplaced_in_fleet_order(fleet in fleet()) {
        let (engine, board) = started(&fleet);
        let expected: Vec<usize> = fleet
            .iter()
            .flat_map(|e| std::iter::repeat(e.length()).take(e.count()))
            .collect();

        prop_assert_eq!(board.boats().len(), fleet_boat_count(&fleet));
        let lengths: Vec<usize> = board.boats().iter().map(|b| b.length()).collect();
        prop_assert_eq!(lengths, expected);
        prop_assert!(board.boats().iter().all(|b| !b.is_placed()));
        prop_assert!(board.occupied().is_empty());
        prop_assert_eq!(engine.current(), Some(0));

        let first = board.boats()[0];
        let centered = Boat::new(first.length());
        prop_assert_eq!(first.anchor(), centered.anchor());
        prop_assert_eq!(first.orientation(), Orientation::Horizontal);
    }

    #[test]
    fn layout_never_overlaps_or_leaves_the_matrix(actions in prop::collection::vec(action(), 0..300)) {
        let (mut engine, mut board) = started(&DEFAULT_FLEET);
        let mut now = 0u64;
        for a in actions {
            match a {
                Action::Move(dx, dy) => {
                    engine.advance(&mut board, dx, dy, None, now);
                }
                Action::Click(held) => {
                    click(&mut engine, &mut board, now, held);
                    now += held;
                }
            }
            now += 10;

            let mut seen = 0;
            for boat in board.boats() {
                prop_assert!(boat.in_bounds());
                if boat.is_placed() {
                    seen += boat.length();
                }
            }
            // Placed boats never share a cell.
            prop_assert_eq!(board.occupied().count_ones(), seen);
        }
    }
}
