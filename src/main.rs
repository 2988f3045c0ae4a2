use anyhow::Result;
use clap::Parser;
use godcell_lib::headless;
use godcell_lib::model::GameConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 3600)]
    ticks: u64,

    /// Override the world seed
    #[arg(long)]
    seed: Option<u64>,

    /// Skip content seeding (no nutrients, fauna or bots)
    #[arg(long)]
    empty: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "godcell=info,godcell_core=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = GameConfig::load_or_default(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }

    if args.dump_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    tracing::info!(ticks = args.ticks, seed = ?config.world.seed, "Running headless simulation");
    let summary = headless::run(config, args.ticks, !args.empty)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        tracing::info!(
            ticks = summary.ticks,
            entities = summary.entities,
            players = summary.players,
            deaths = summary.deaths,
            kills = summary.kills,
            evolutions = summary.evolutions,
            respawns = summary.respawns,
            "Headless simulation finished"
        );
    }
    Ok(())
}
