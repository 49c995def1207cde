use matrix_battleship::{
    CellKnowledge, FirstMove, FleetEntry, GameConfig, GameSession, InputSample, MatchStatus,
    Message, ReadyState, ShotReport, Stage, TurnPhase,
};

const IDLE: InputSample = InputSample::IDLE;

/// One boat of length 2, centered at (7,7)-(8,7); a 100 ms press confirms.
fn config() -> GameConfig {
    let mut config = GameConfig::with_fleet(&[FleetEntry::new(2, 1)]);
    config.timing.long_press_ms = 100;
    config
}

fn session(config: GameConfig) -> GameSession {
    GameSession::new(config, None).unwrap()
}

/// Confirm the only boat with a release at `at`.
fn finish_placement(s: &mut GameSession, at: u64) -> Vec<Message> {
    s.tick(at - 100, None, InputSample::button());
    s.tick(at, None, IDLE)
}

/// A session that finished at 200 and fires first.
fn my_turn(config: GameConfig) -> GameSession {
    let mut s = session(config);
    finish_placement(&mut s, 200);
    s.tick(250, Some("READY:300"), IDLE);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::MyTurn));
    s
}

fn click(s: &mut GameSession, now: u64) -> Vec<Message> {
    let out = s.tick(now, None, InputSample::button());
    s.tick(now + 10, None, IDLE);
    out
}

#[test]
fn finishing_placement_announces_ready() {
    let mut s = session(config());
    assert_eq!(s.stage(), Stage::Placement);
    let out = finish_placement(&mut s, 200);
    assert_eq!(out, vec![Message::Ready { millis: 200, nonce: None }]);
    assert_eq!(s.stage(), Stage::AwaitingOpponent);
    assert_eq!(s.board().occupied().count_ones(), 2);
}

#[test]
fn earlier_opponent_ready_waits() {
    let mut s = session(config());
    finish_placement(&mut s, 200);
    s.tick(250, Some("READY:100"), IDLE);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::WaitForOpponent));
}

#[test]
fn later_opponent_ready_takes_turn() {
    let mut s = session(config());
    finish_placement(&mut s, 200);
    s.tick(250, Some("READY:300"), IDLE);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::MyTurn));
}

#[test]
fn silent_opponent_times_out_into_my_turn() {
    let mut s = session(config());
    finish_placement(&mut s, 200);
    s.tick(200 + 9_999, None, IDLE);
    assert_eq!(s.stage(), Stage::AwaitingOpponent);
    s.tick(200 + 10_001, None, IDLE);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::MyTurn));
}

#[test]
fn legacy_result_lands_under_the_aim() {
    let mut s = my_turn(config().legacy());
    let mut now = 300;
    for _ in 0..5 {
        s.tick(now, None, InputSample::new(-1, 0, false));
        now += 10;
    }
    for _ in 0..4 {
        s.tick(now, None, InputSample::new(0, -1, false));
        now += 10;
    }
    assert_eq!(s.turn().aim(), (3, 4));

    s.tick(now, Some("RESULT:HIT"), IDLE);
    assert_eq!(s.knowledge().get(3, 4), CellKnowledge::Hit);
    assert_eq!(s.knowledge().count(CellKnowledge::Unknown), 255);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::ShowResult));
}

#[test]
fn messages_during_placement_are_ignored_except_ready() {
    let mut s = session(config());
    assert!(s.tick(0, Some("SHOT:7,7"), IDLE).is_empty());
    assert!(s.tick(10, Some("RESULT:HIT"), IDLE).is_empty());
    assert!(s.tick(20, Some("AIM:1,1"), IDLE).is_empty());
    assert!(s.board().shots_received().is_empty());
    assert_eq!(s.knowledge().count(CellKnowledge::Unknown), 256);

    s.tick(30, Some("READY:5"), IDLE);
    assert_eq!(s.handshake().opponent_stamp(), Some(5));
    finish_placement(&mut s, 400);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::WaitForOpponent));
}

#[test]
fn undecodable_and_off_board_datagrams_are_dropped() {
    let mut s = session(config());
    finish_placement(&mut s, 200);
    s.tick(210, Some("READY:100"), IDLE);
    assert!(s.tick(220, Some("SHOT:16,3#0"), IDLE).is_empty());
    assert!(s.tick(230, Some("NOISE"), IDLE).is_empty());
    assert!(s.board().shots_received().is_empty());
}

#[test]
fn shot_while_awaiting_means_opponent_went_first() {
    let mut s = session(config());
    finish_placement(&mut s, 200);
    let out = s.tick(300, Some("SHOT:7,7#0"), IDLE);
    assert_eq!(out, vec![Message::Result { report: ShotReport::Hit, seq: Some(0) }]);
    assert_eq!(s.handshake().state(), ReadyState::Synced(FirstMove::Opponent));
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::OpponentShot));
}

#[test]
fn repeated_and_stale_shots_do_not_resolve_twice() {
    let mut s = session(config());
    finish_placement(&mut s, 200);
    s.tick(210, Some("READY:100"), IDLE);
    s.tick(300, Some("SHOT:7,7#0"), IDLE);

    let again = s.tick(400, Some("SHOT:7,7#0"), IDLE);
    assert_eq!(again, vec![Message::Result { report: ShotReport::Hit, seq: Some(0) }]);
    assert_eq!(s.turn().phase_entered_at(), 300);

    let sink = s.tick(500, Some("SHOT:8,7#1"), IDLE);
    assert_eq!(sink, vec![Message::Result { report: ShotReport::Sink, seq: Some(1) }]);
    assert!(s.tick(600, Some("SHOT:0,0#0"), IDLE).is_empty());
    assert!(!s.board().shots_received().get(0, 0).unwrap());
}

#[test]
fn losing_the_last_boat_ends_the_match() {
    let mut s = session(config());
    finish_placement(&mut s, 200);
    s.tick(210, Some("READY:100"), IDLE);
    s.tick(300, Some("SHOT:7,7"), IDLE);
    s.tick(1_300, None, IDLE);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::MyTurn));
    let out = s.tick(1_400, Some("SHOT:8,7"), IDLE);
    assert_eq!(out, vec![Message::Result { report: ShotReport::Sink, seq: None }]);
    assert_eq!(s.status(), MatchStatus::Lost);
    s.tick(2_400, None, IDLE);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::GameOver { won: false }));

    // Still answering so the peer can recover a lost final RESULT.
    let out = s.tick(2_500, Some("SHOT:8,7"), IDLE);
    assert_eq!(out, vec![Message::Result { report: ShotReport::Sink, seq: None }]);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::GameOver { won: false }));
}

#[test]
fn fired_shot_is_retransmitted_until_answered() {
    let mut s = my_turn(config());
    let out = click(&mut s, 300);
    assert_eq!(out, vec![Message::Shot { x: 8, y: 8, seq: Some(0) }]);
    assert!(s.turn().awaiting_result());
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::WaitForOpponent));

    assert!(s.tick(1_000, None, IDLE).is_empty());
    assert_eq!(s.tick(1_300, None, IDLE), vec![Message::Shot { x: 8, y: 8, seq: Some(0) }]);

    // An answer to some other shot is not ours.
    s.tick(1_350, Some("RESULT:HIT#9"), IDLE);
    assert!(s.turn().awaiting_result());

    s.tick(1_400, Some("RESULT:MISS#0"), IDLE);
    assert!(!s.turn().awaiting_result());
    assert_eq!(s.knowledge().get(8, 8), CellKnowledge::Miss);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::ShowResult));
    s.tick(2_400, None, IDLE);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::WaitForOpponent));
    assert!(s.tick(5_000, None, IDLE).is_empty());
}

#[test]
fn legacy_shots_are_bare_and_not_retransmitted() {
    let mut s = my_turn(config().legacy());
    let out = click(&mut s, 300);
    assert_eq!(out, vec![Message::Shot { x: 8, y: 8, seq: None }]);
    assert!(s.tick(5_000, None, IDLE).is_empty());
}

#[test]
fn known_cells_cannot_be_fired_at() {
    let mut s = my_turn(config());
    click(&mut s, 300);
    s.tick(400, Some("RESULT:MISS#0"), IDLE);
    s.tick(1_400, None, IDLE);
    s.tick(1_500, Some("SHOT:0,0#0"), IDLE);
    s.tick(2_500, None, IDLE);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::MyTurn));

    assert!(click(&mut s, 2_600).is_empty());
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::MyTurn));

    let out = s.tick(2_700, None, InputSample::new(1, 0, false));
    assert_eq!(out, vec![Message::Aim { x: 9, y: 8 }]);
    let out = click(&mut s, 2_800);
    assert_eq!(out, vec![Message::Shot { x: 9, y: 8, seq: Some(1) }]);
}

#[test]
fn aim_updates_are_throttled() {
    let mut s = my_turn(config());
    let left = InputSample::new(-1, 0, false);
    assert_eq!(s.tick(300, None, left), vec![Message::Aim { x: 7, y: 8 }]);
    assert!(s.tick(310, None, left).is_empty());
    assert!(s.tick(320, None, IDLE).is_empty());
    assert_eq!(s.tick(450, None, IDLE), vec![Message::Aim { x: 6, y: 8 }]);
    assert!(s.tick(700, None, IDLE).is_empty());
}

#[test]
fn opponent_aim_fades() {
    let mut s = session(config());
    finish_placement(&mut s, 200);
    s.tick(210, Some("READY:100"), IDLE);
    s.tick(300, Some("AIM:4,5"), IDLE);
    assert_eq!(s.turn().opponent_aim(1_000), Some((4, 5)));
    assert_eq!(s.turn().opponent_aim(1_800), None);
}

#[test]
fn sinking_the_whole_fleet_wins() {
    let mut s = my_turn(config());
    click(&mut s, 300);
    s.tick(400, Some("RESULT:SINK#0"), IDLE);
    assert_eq!(s.status(), MatchStatus::Won);
    assert_eq!(s.turn().sunk_reports(), 1);
    s.tick(1_400, None, IDLE);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::GameOver { won: true }));
    // Nothing more can be fired.
    assert!(click(&mut s, 1_500).is_empty());
}

#[test]
fn late_result_after_opponent_fired_keeps_the_phase() {
    let mut s = my_turn(config());
    click(&mut s, 300);
    s.tick(1_000, Some("SHOT:0,0#0"), IDLE);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::OpponentShot));

    s.tick(1_100, Some("RESULT:HIT#0"), IDLE);
    assert_eq!(s.knowledge().get(8, 8), CellKnowledge::Hit);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::OpponentShot));
    s.tick(2_000, None, IDLE);
    assert_eq!(s.stage(), Stage::Battle(TurnPhase::MyTurn));
}

#[test]
fn capacity_exceeded_fleet_is_refused() {
    let config = GameConfig::with_fleet(&[FleetEntry::new(2, 11)]);
    assert!(GameSession::new(config, None).is_err());
}
