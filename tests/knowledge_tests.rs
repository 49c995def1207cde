use matrix_battleship::{CellKnowledge, KnowledgeGrid, ShotReport};

#[test]
fn reports_are_recorded_per_cell() {
    let mut grid = KnowledgeGrid::new();
    assert!(!grid.apply(1, 1, ShotReport::Miss));
    assert!(!grid.apply(2, 2, ShotReport::Hit));
    assert_eq!(grid.get(1, 1), CellKnowledge::Miss);
    assert_eq!(grid.get(2, 2), CellKnowledge::Hit);
    assert_eq!(grid.get(40, 40), CellKnowledge::Unknown);
    assert_eq!(grid.count(CellKnowledge::Unknown), 254);
}

#[test]
fn sink_floods_horizontal_run() {
    let mut grid = KnowledgeGrid::new();
    grid.apply(4, 6, ShotReport::Hit);
    grid.apply(5, 6, ShotReport::Hit);
    grid.apply(7, 6, ShotReport::Hit);
    assert!(grid.apply(6, 6, ShotReport::Sink));
    for x in 4..=7 {
        assert_eq!(grid.get(x, 6), CellKnowledge::Sunk);
    }
}

#[test]
fn sink_floods_vertical_run_when_alone_horizontally() {
    let mut grid = KnowledgeGrid::new();
    grid.apply(3, 0, ShotReport::Hit);
    grid.apply(3, 1, ShotReport::Hit);
    assert!(grid.apply(3, 2, ShotReport::Sink));
    assert_eq!(grid.count(CellKnowledge::Sunk), 3);
    assert_eq!(grid.get(3, 3), CellKnowledge::Unknown);
}

#[test]
fn sunk_cells_are_terminal_and_counted_once() {
    let mut grid = KnowledgeGrid::new();
    assert!(grid.apply(0, 0, ShotReport::Sink));
    assert!(!grid.apply(0, 0, ShotReport::Sink));
    grid.apply(0, 0, ShotReport::Miss);
    assert_eq!(grid.get(0, 0), CellKnowledge::Sunk);
    assert!(!grid.apply(16, 0, ShotReport::Sink));
}
