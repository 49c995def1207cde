#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use matrix_battleship::{
    init_logging, Autopilot, GameConfig, GameSession, InMemoryTransport, LinkProfile,
    LossyTransport, MatchStatus, PlayerNode, UdpTransport, DEFAULT_LINGER,
};

#[cfg(feature = "std")]
use clap::Parser;
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::{Rng, SeedableRng};
#[cfg(feature = "std")]
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Two autopilot nodes in this process, over a simulated link.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 0.0, help = "Probability that a datagram is lost")]
        drop: f64,
        #[arg(long, default_value_t = 0.0, help = "Probability that a datagram arrives twice")]
        duplicate: f64,
        #[arg(long, default_value_t = 0.0, help = "Probability that a datagram overtakes the previous one")]
        reorder: f64,
        #[arg(long, default_value_t = 20)]
        tick_ms: u64,
    },
    /// One autopilot node talking UDP to a peer.
    Udp {
        #[arg(long, default_value = "0.0.0.0:8888")]
        bind: String,
        #[arg(long, default_value = "192.168.0.181:8888")]
        peer: String,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 20)]
        tick_ms: u64,
        #[arg(long, help = "Send bare SHOT/RESULT without sequence numbers")]
        legacy: bool,
    },
}

#[cfg(feature = "std")]
fn seeded_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

#[cfg(feature = "std")]
fn autopilot_node(
    config: GameConfig,
    mut rng: SmallRng,
    transport: Box<dyn matrix_battleship::Transport>,
    tick: Duration,
) -> anyhow::Result<PlayerNode> {
    let nonce = rng.random::<u32>();
    let long_press = config.timing.long_press_ms;
    let session = GameSession::new(config, Some(nonce)).map_err(|e| anyhow::anyhow!(e))?;
    let pilot = Autopilot::new(rng, long_press);
    Ok(PlayerNode::new(session, transport, Box::new(pilot)).with_timing(tick, DEFAULT_LINGER))
}

#[cfg(feature = "std")]
fn print_outcome(name: &str, node: &PlayerNode, status: MatchStatus) {
    println!("{}: {:?}", name, status);
    print!("{}", node.frame().to_ascii());
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Local {
            seed,
            drop,
            duplicate,
            reorder,
            tick_ms,
        } => {
            println!("Starting local autopilot match...");
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let rng1 = seeded_rng(seed);
            let rng2 = seeded_rng(seed.map(|s| s.wrapping_add(1)));
            let profile = LinkProfile::new(drop, duplicate, reorder);
            let link_seed = seed.unwrap_or_else(|| rand::rng().random());
            let tick = Duration::from_millis(tick_ms);

            let (t1, t2) = InMemoryTransport::pair();
            let t1 = Box::new(LossyTransport::new(t1, profile, link_seed));
            let t2 = Box::new(LossyTransport::new(t2, profile, link_seed.wrapping_add(1)));
            let mut node1 = autopilot_node(GameConfig::default(), rng1, t1, tick)?;
            let mut node2 = autopilot_node(GameConfig::default(), rng2, t2, tick)?;

            let (s1, s2) = tokio::try_join!(node1.run(), node2.run())?;
            print_outcome("player1", &node1, s1);
            print_outcome("player2", &node2, s2);
        }
        Commands::Udp {
            bind,
            peer,
            seed,
            tick_ms,
            legacy,
        } => {
            println!("Listening on {}, peer {}", bind, peer);
            let transport = Box::new(UdpTransport::bind(bind.as_str(), peer.as_str()).await?);
            let config = if legacy {
                GameConfig::default().legacy()
            } else {
                GameConfig::default()
            };
            let mut node = autopilot_node(config, seeded_rng(seed), transport, Duration::from_millis(tick_ms))?;
            let status = node.run().await?;
            print_outcome("local", &node, status);
        }
    }
    Ok(())
}
