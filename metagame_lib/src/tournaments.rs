//! Completed-tournament listing crawl.

use futures::future::try_join_all;
use limitless_api::standings_path;
use limitless_api::types::{Match, Player, Tournament};
use limitless_api::TournamentListQuery;
use regex::Regex;
use scraper::Html;
use serde::Serialize;

use crate::error::{ExtractError, Result};
use crate::fetch::CachedFetcher;
use crate::html::{self, table_rows, ElementExt};
use crate::pairings::extract_matches;
use crate::standings::{extract_players, parse_standings, DecklistLinks};
use crate::writer::RecordWriter;

const LISTING_TABLE: &str = "completed-tournaments";
const LISTING_HEADER_ROWS: usize = 1;

/// Index of the tournament id in `/tournament/<id>/standings`.
const TOURNAMENT_ID_SEGMENT: usize = 2;
const STANDINGS_LINK_PATTERN: &str = r"/tournament/[a-zA-Z0-9_\-]*/standings";

/// Position of a listing page within the whole listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub max: u32,
}

impl Pagination {
    pub fn next(&self) -> Option<u32> {
        (self.current < self.max).then_some(self.current + 1)
    }
}

/// A tournament row of the listing, before any of its pages are fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListedTournament {
    pub id: String,
    pub name: String,
    pub date: String,
    pub organizer: String,
    pub format: String,
    pub nb_players: u32,
}

impl ListedTournament {
    fn into_tournament(self, players: Vec<Player>, matches: Vec<Match>) -> Tournament {
        Tournament {
            id: self.id,
            name: self.name,
            date: self.date,
            organizer: self.organizer,
            format: self.format,
            nb_players: self.nb_players,
            players,
            matches,
        }
    }
}

/// One listing page: where it sits and what it lists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingPage {
    pub pagination: Pagination,
    pub tournaments: Vec<ListedTournament>,
}

/// Parses a completed-tournament listing page.
pub fn parse_listing(document: &Html) -> Result<ListingPage> {
    let root = html::root(document);
    let nav = root.require("ul.pagination")?;
    let pagination = Pagination {
        current: nav.attr_parse("data-current")?,
        max: nav.attr_parse("data-max")?,
    };

    let standings_link = Regex::new(STANDINGS_LINK_PATTERN)
        .map_err(|_| ExtractError::Selector(STANDINGS_LINK_PATTERN.to_string()))?;

    let rows = table_rows(root, LISTING_TABLE, LISTING_HEADER_ROWS)?;
    let mut tournaments = Vec::with_capacity(rows.len());
    for row in rows {
        let hrefs = row.hrefs()?;
        let href = hrefs
            .iter()
            .find(|href| standings_link.is_match(href))
            .ok_or_else(|| ExtractError::missing("a[href~=/tournament/<id>/standings]"))?;
        let id = href
            .split('/')
            .nth(TOURNAMENT_ID_SEGMENT)
            .ok_or_else(|| ExtractError::invalid("standings link", href))?;
        let id = html::file_stem("tournament id", id)?;

        tournaments.push(ListedTournament {
            id,
            name: row.require_attr("data-name")?.to_string(),
            date: row.require_attr("data-date")?.to_string(),
            organizer: row.require_attr("data-organizer")?.to_string(),
            format: row.require_attr("data-format")?.to_string(),
            nb_players: row.attr_parse("data-players")?,
        });
    }

    Ok(ListingPage {
        pagination,
        tournaments,
    })
}

/// What happened to one listed tournament.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TournamentOutcome {
    /// Output already present; nothing was fetched.
    Skipped,
    /// Standings page could not be fetched.
    Unavailable,
    /// No player published a decklist; nothing written.
    NoDecklists,
    Written,
}

/// Counts from one listing crawl.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    pub pages: u32,
    pub listed: usize,
    pub skipped: usize,
    pub unavailable: usize,
    pub without_decklists: usize,
    pub written: usize,
}

impl CrawlReport {
    fn record(&mut self, outcome: TournamentOutcome) {
        match outcome {
            TournamentOutcome::Skipped => self.skipped += 1,
            TournamentOutcome::Unavailable => self.unavailable += 1,
            TournamentOutcome::NoDecklists => self.without_decklists += 1,
            TournamentOutcome::Written => self.written += 1,
        }
    }
}

/// Walks the completed-tournament listing and writes one file per
/// tournament that has at least one published decklist.
pub struct TournamentCrawler<'a> {
    fetcher: &'a CachedFetcher,
    writer: &'a RecordWriter,
    query: TournamentListQuery,
    max_pages: Option<u32>,
    links: DecklistLinks,
}

impl<'a> TournamentCrawler<'a> {
    pub fn new(
        fetcher: &'a CachedFetcher,
        writer: &'a RecordWriter,
        query: TournamentListQuery,
        links: DecklistLinks,
    ) -> Self {
        Self {
            fetcher,
            writer,
            query,
            max_pages: None,
            links,
        }
    }

    /// Stops the crawl after visiting this many listing pages.
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Visits listing pages from the query's start page until the last page
    /// (or the page limit). Listing pages are never served from the cache.
    ///
    /// The tournaments of a page are processed concurrently and the next page
    /// is only requested once they have all completed. A failing tournament
    /// fails the crawl.
    pub async fn crawl(&self) -> Result<CrawlReport> {
        let mut report = CrawlReport::default();
        let mut page = self.query.start_page;

        loop {
            if self.max_pages.is_some_and(|max| report.pages >= max) {
                tracing::info!("stopping after {} listing pages", report.pages);
                break;
            }

            let url = self.query.page_path(page);
            let listing = {
                let document = self
                    .fetcher
                    .fetch_page(&url, false)
                    .await
                    .ok_or_else(|| ExtractError::FetchFailed { url: url.clone() })?;
                parse_listing(&document).map_err(|e| e.in_page(&url))?
            };
            tracing::info!(
                "extracting completed tournaments page {} of {}",
                listing.pagination.current,
                listing.pagination.max
            );

            report.pages += 1;
            report.listed += listing.tournaments.len();

            let outcomes = try_join_all(
                listing
                    .tournaments
                    .into_iter()
                    .map(|tournament| self.extract_tournament(tournament)),
            )
            .await?;
            for outcome in outcomes {
                report.record(outcome);
            }

            match listing.pagination.next() {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(report)
    }

    /// Extracts and writes one listed tournament.
    pub async fn extract_tournament(&self, listed: ListedTournament) -> Result<TournamentOutcome> {
        if self.writer.tournament_exists(&listed.id).await {
            tracing::debug!("skipping tournament {} because it is already in output", listed.id);
            return Ok(TournamentOutcome::Skipped);
        }

        let url = standings_path(&listed.id);
        let rows = {
            let Some(document) = self.fetcher.fetch_page(&url, true).await else {
                tracing::warn!("standings of tournament {} are unavailable", listed.id);
                return Ok(TournamentOutcome::Unavailable);
            };
            parse_standings(&document).map_err(|e| e.in_page(&url))?
        };

        tracing::debug!("extracting tournament {}", listed.id);
        let players = extract_players(self.fetcher, &listed.id, rows, &self.links).await?;
        if !players.iter().any(|player| player.has_decklist()) {
            tracing::debug!("skipping tournament {} because no decklist was detected", listed.id);
            return Ok(TournamentOutcome::NoDecklists);
        }

        let matches = extract_matches(self.fetcher, &listed.id).await.map_err(|e| {
            tracing::error!("Error extracting matches of tournament {}: {}", listed.id, e);
            e
        })?;

        let tournament = listed.into_tournament(players, matches);
        self.writer.write_tournament(&tournament).await?;
        tracing::info!(
            "wrote tournament {} ({} players, {} matches)",
            tournament.id,
            tournament.players.len(),
            tournament.matches.len()
        );
        Ok(TournamentOutcome::Written)
    }
}
