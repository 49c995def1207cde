use matrix_battleship::{init_logging, Duel, DuelConfig, LinkProfile};

fn main() -> anyhow::Result<()> {
    init_logging();
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 && args.len() != 6 {
        eprintln!("Usage: {} <seed1> <seed2> [<drop> <duplicate> <reorder>]", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;
    let profile = if args.len() == 6 {
        LinkProfile::new(args[3].parse()?, args[4].parse()?, args[5].parse()?)
    } else {
        LinkProfile::PERFECT
    };

    let config = DuelConfig::new([seed1, seed2]).with_profile(profile);
    let duel = Duel::new(config).map_err(|e| anyhow::anyhow!(e))?;
    let report = duel.run();

    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}
