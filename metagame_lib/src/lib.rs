//! Crawl-extract-cache pipeline for Pokémon TCG Pocket metagame data.
//!
//! Fetches card and tournament pages through a write-through disk cache,
//! parses them into the records of `limitless_api::types`, and writes one
//! JSON file per set and per tournament. File existence is the only
//! resumability marker.

pub mod cache;
pub mod card;
pub mod config;
pub mod error;
pub mod fetch;
pub mod html;
pub mod pairings;
pub mod sets;
pub mod standings;
pub mod tournaments;
pub mod writer;

pub use limitless_api;
pub use limitless_api::types;
pub use limitless_api::TournamentListQuery;

pub use cache::DiskCache;
pub use config::{ConfigError, CrawlConfig};
pub use error::ExtractError;
pub use fetch::CachedFetcher;
pub use sets::{SetCrawler, SetReport};
pub use tournaments::{CrawlReport, TournamentCrawler, TournamentOutcome};
pub use writer::RecordWriter;
