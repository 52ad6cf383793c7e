use clap::Parser;
use holdem_engine::config::TableConfig;
use holdem_engine::engine::Engine;
use holdem_engine::player::PlayerId;
use holdem_engine::provider::{ProviderTable, RandomPolicy};
use std::error::Error;
use std::path::PathBuf;

/// Run bot-only Texas Hold'em hands and print the results.
#[derive(Parser)]
#[command(name = "holdem-sim", version = holdem_engine::VERSION)]
struct Cli {
    /// TOML table config; defaults are used for anything it leaves out
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of hands to play (stops early once one player holds every chip)
    #[arg(long, default_value_t = 10)]
    hands: u64,
    /// Seed for the deck and the bots (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,
    /// Number of seats (overrides the config file)
    #[arg(long)]
    players: Option<usize>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().format_target(false).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => TableConfig::load(path)?,
        None => TableConfig::default(),
    };
    if let Some(n) = cli.players {
        config.num_players = n;
    }
    let seed = cli.seed.or(config.seed).unwrap_or_else(rand::random);
    config.seed = Some(seed);
    config.validate()?;

    let mut providers = ProviderTable::new(RandomPolicy::seeded(seed));
    for id in 0..config.num_players as u32 {
        providers.set(PlayerId(id), RandomPolicy::seeded(seed.wrapping_add(u64::from(id) + 1)));
    }
    let mut engine = Engine::new(&config, providers)?;
    println!("holdem-sim {}: {} players, seed {seed}", holdem_engine::VERSION, config.num_players);

    for _ in 0..cli.hands {
        if engine.is_finished() {
            break;
        }
        let hand = engine.play_hand()?;
        let board: Vec<String> = hand.board.iter().map(ToString::to_string).collect();
        let awards: Vec<String> =
            hand.showdown.awards.iter().map(|(id, v)| format!("{id} +{v}")).collect();
        let with = hand.showdown.best.map(|e| format!(" with {}", e.name())).unwrap_or_default();
        println!(
            "hand {:>3}: [{}] {}{with}",
            engine.hands_played(),
            board.join(" "),
            awards.join(", ")
        );
    }

    println!("after {} hands:", engine.hands_played());
    for p in engine.state().players() {
        println!("  {} {}: {}", p.id(), p.name(), p.chips());
    }
    Ok(())
}
