mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use metagame_lib::CrawlConfig;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "tcgp-metagame")]
#[command(about = "Crawl Pokémon TCG Pocket sets and tournaments into JSON records")]
struct Cli {
    /// Output format: table or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Page cache directory (overrides config)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Record output directory (overrides config)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every set of the card database
    Sets,
    /// Extract completed tournaments with standings, decklists and matches
    Tournaments(commands::tournaments::TournamentsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("metagame_lib=info".parse()?),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    let mut config = CrawlConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.cache_dir {
        config.cache_dir = dir;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    match &cli.command {
        Commands::Sets => commands::sets::run(&config, &format).await?,
        Commands::Tournaments(args) => commands::tournaments::run(args, config, &format).await?,
    }

    Ok(())
}
