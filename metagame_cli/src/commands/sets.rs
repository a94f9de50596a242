//! The `sets` subcommand: extract every set and its cards.

use std::time::Instant;

use anyhow::Result;
use metagame_lib::{CrawlConfig, RecordWriter, SetCrawler};

use crate::output::{print_summary, OutputFormat, Summary};

pub async fn run(config: &CrawlConfig, format: &OutputFormat) -> Result<()> {
    let started = Instant::now();
    let (fetcher, writer) = super::pipeline(config, &config.cards_base_url)?;

    tracing::info!("extracting sets into {}", writer.sets_dir().display());
    let report = SetCrawler::new(&fetcher, &writer).crawl().await?;

    let summary = Summary::new(
        "sets",
        report,
        &writer.sets_dir(),
        RecordWriter::count_files(&writer.sets_dir()),
        started.elapsed(),
    );
    print_summary(&summary, format);
    Ok(())
}
