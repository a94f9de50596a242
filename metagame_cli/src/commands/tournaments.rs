//! The `tournaments` subcommand: walk the completed-tournament listing.

use std::time::Instant;

use anyhow::Result;
use clap::Args;
use metagame_lib::standings::DecklistLinks;
use metagame_lib::{CrawlConfig, RecordWriter, TournamentCrawler};

use crate::output::{print_summary, OutputFormat, Summary};

#[derive(Args)]
pub struct TournamentsArgs {
    /// First listing page to visit
    #[arg(long)]
    pub start_page: Option<u32>,

    /// Stop after this many listing pages
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Game filter (e.g. POCKET)
    #[arg(long)]
    pub game: Option<String>,

    /// Format filter (e.g. STANDARD, NOEX)
    #[arg(long)]
    pub format: Option<String>,

    /// Platform filter (e.g. all, limitless)
    #[arg(long)]
    pub platform: Option<String>,

    /// Tournament type filter (e.g. online, inperson)
    #[arg(long = "type")]
    pub kind: Option<String>,

    /// Time window filter (e.g. all, 4weeks)
    #[arg(long)]
    pub time: Option<String>,
}

impl TournamentsArgs {
    /// Overlays the flags that were given onto the configured listing.
    fn apply(&self, config: &mut CrawlConfig) {
        let listing = &mut config.listing;
        if let Some(page) = self.start_page {
            listing.start_page = page;
        }
        if self.max_pages.is_some() {
            listing.max_pages = self.max_pages;
        }
        if let Some(ref game) = self.game {
            listing.game = game.clone();
        }
        if let Some(ref format) = self.format {
            listing.format = format.clone();
        }
        if let Some(ref platform) = self.platform {
            listing.platform = platform.clone();
        }
        if let Some(ref kind) = self.kind {
            listing.kind = kind.clone();
        }
        if let Some(ref time) = self.time {
            listing.time = time.clone();
        }
    }
}

pub async fn run(
    args: &TournamentsArgs,
    mut config: CrawlConfig,
    format: &OutputFormat,
) -> Result<()> {
    args.apply(&mut config);
    let started = Instant::now();
    let (fetcher, writer) = super::pipeline(&config, &config.tournaments_base_url)?;
    let links = DecklistLinks::new(&config.cards_base_url)?;

    let query = config.listing.query();
    tracing::info!(
        "extracting tournaments from {} into {}",
        query.page_path(query.start_page),
        writer.tournaments_dir().display()
    );
    let report = TournamentCrawler::new(&fetcher, &writer, query, links)
        .with_max_pages(config.listing.max_pages)
        .crawl()
        .await?;

    let summary = Summary::new(
        "tournaments",
        report,
        &writer.tournaments_dir(),
        RecordWriter::count_files(&writer.tournaments_dir()),
        started.elapsed(),
    );
    print_summary(&summary, format);
    Ok(())
}
