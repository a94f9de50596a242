//! Crawl configuration: TOML file, then environment overrides.

use std::path::{Path, PathBuf};

use limitless_api::{TournamentListQuery, CARDS_BASE_URL, TOURNAMENTS_BASE_URL};
use serde::Deserialize;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    TomlParse(String),
    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },
}

/// Settings shared by the set and tournament crawls.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub cards_base_url: String,
    pub tournaments_base_url: String,
    pub cache_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Simultaneous HTTP requests per site.
    pub max_connections: usize,
    /// Simultaneous open files across cache and output.
    pub max_open_files: usize,
    pub request_timeout_secs: u64,
    pub listing: ListingConfig,
}

/// Entry point of the tournament crawl.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub path: String,
    pub game: String,
    pub format: String,
    pub platform: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub time: String,
    pub start_page: u32,
    pub max_pages: Option<u32>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            cards_base_url: CARDS_BASE_URL.to_string(),
            tournaments_base_url: TOURNAMENTS_BASE_URL.to_string(),
            cache_dir: PathBuf::from("data/cache"),
            output_dir: PathBuf::from("data/output"),
            max_connections: 20,
            max_open_files: 50,
            request_timeout_secs: 30,
            listing: ListingConfig::default(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        let query = TournamentListQuery::default();
        Self {
            path: query.path,
            game: query.game,
            format: query.format,
            platform: query.platform,
            kind: query.kind,
            time: query.time,
            start_page: query.start_page,
            max_pages: None,
        }
    }
}

impl ListingConfig {
    pub fn query(&self) -> TournamentListQuery {
        TournamentListQuery {
            path: self.path.clone(),
            ..TournamentListQuery::default()
        }
        .with_game(&self.game)
        .with_format(&self.format)
        .with_platform(&self.platform)
        .with_kind(&self.kind)
        .with_time(&self.time)
        .with_start_page(self.start_page)
    }
}

impl CrawlConfig {
    /// Parses a TOML document. Missing keys fall back to defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlParse(e.to_string()))
    }

    /// Loads the optional config file, then applies `METAGAME_*` environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&content)?
            }
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("METAGAME_CARDS_BASE_URL") {
            self.cards_base_url = url;
        }
        if let Some(url) = lookup("METAGAME_TOURNAMENTS_BASE_URL") {
            self.tournaments_base_url = url;
        }
        if let Some(dir) = lookup("METAGAME_CACHE_DIR") {
            self.cache_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("METAGAME_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("METAGAME_MAX_CONNECTIONS") {
            self.max_connections = parse_env("METAGAME_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = lookup("METAGAME_MAX_OPEN_FILES") {
            self.max_open_files = parse_env("METAGAME_MAX_OPEN_FILES", &value)?;
        }
        if let Some(value) = lookup("METAGAME_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("METAGAME_REQUEST_TIMEOUT_SECS", &value)?;
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key: key.to_string(),
        value: value.to_string(),
    })
}
