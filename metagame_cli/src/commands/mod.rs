//! CLI subcommand implementations.

pub mod sets;
pub mod tournaments;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use metagame_lib::{CachedFetcher, CrawlConfig, RecordWriter};
use tokio::sync::Semaphore;

/// Fetcher for one site plus the record writer, sharing one file-handle cap.
pub(crate) fn pipeline(
    config: &CrawlConfig,
    base_url: &str,
) -> Result<(CachedFetcher, RecordWriter)> {
    let files = Arc::new(Semaphore::new(config.max_open_files.max(1)));
    let fetcher = CachedFetcher::for_site(
        base_url,
        Duration::from_secs(config.request_timeout_secs),
        &config.cache_dir,
        files.clone(),
        config.max_connections,
    )
    .with_context(|| format!("cannot build client for {}", base_url))?;
    let writer = RecordWriter::new(&config.output_dir, files);
    Ok((fetcher, writer))
}
