use std::time::Duration;

use matrix_battleship::{
    Autopilot, FleetEntry, GameConfig, GameSession, InMemoryTransport, MatchStatus, PlayerNode,
};
use rand::{rngs::SmallRng, SeedableRng};

fn fast_config() -> GameConfig {
    let mut config = GameConfig::with_fleet(&[FleetEntry::new(2, 1), FleetEntry::new(3, 1)]);
    config.timing.long_press_ms = 30;
    config.timing.display_ms = 20;
    config.timing.ready_repeat_ms = 50;
    config.timing.shot_retry_ms = Some(100);
    config
}

fn node(seed: u64, transport: InMemoryTransport) -> PlayerNode {
    let config = fast_config();
    let long_press = config.timing.long_press_ms;
    let session = GameSession::new(config, Some(seed as u32)).unwrap();
    let pilot = Autopilot::new(SmallRng::seed_from_u64(seed), long_press);
    PlayerNode::new(session, Box::new(transport), Box::new(pilot))
        .with_timing(Duration::from_millis(1), Duration::from_millis(50))
        .with_deadline(Duration::from_secs(60))
}

#[tokio::test]
async fn two_nodes_play_to_the_end() -> anyhow::Result<()> {
    let (t1, t2) = InMemoryTransport::pair();
    let mut n1 = node(1, t1);
    let mut n2 = node(2, t2);
    let (s1, s2) = tokio::try_join!(n1.run(), n2.run())?;
    let mut outcome = [s1, s2];
    outcome.sort_by_key(|s| *s == MatchStatus::Won);
    assert_eq!(outcome, [MatchStatus::Lost, MatchStatus::Won]);
    Ok(())
}

#[tokio::test]
async fn step_renders_a_frame() {
    let (t1, _t2) = InMemoryTransport::pair();
    let mut n1 = node(3, t1);
    let frame = n1.step(0).await.clone();
    assert_eq!(frame.count(matrix_battleship::Paint::Candidate), 2);
    assert_eq!(n1.status(), MatchStatus::InProgress);
}
