//! Standings rows and player decklists.

use futures::future::try_join_all;
use limitless_api::decklist_path;
use limitless_api::types::{DeckListItem, Player};
use regex::Regex;
use scraper::Html;

use crate::error::{ExtractError, Result};
use crate::fetch::CachedFetcher;
use crate::html::{self, table_rows, ElementExt};

const STANDINGS_TABLE: &str = "striped";
const STANDINGS_HEADER_ROWS: usize = 1;
const DEFAULT_PLACING: i32 = -1;

/// Index of the player id in `/tournament/<id>/player/<pid>`.
const PLAYER_ID_SEGMENT: usize = 4;

const PLAYER_LINK_PATTERN: &str = r"/tournament/[a-zA-Z0-9_\-]*/player/[a-zA-Z0-9_]*";
const DECKLIST_LINK_PATTERN: &str = r"/tournament/[a-zA-Z0-9_\-]*/player/[a-zA-Z0-9_]*/decklist";

/// One row of a standings table, before its decklist is fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StandingRow {
    pub player_id: String,
    pub name: String,
    pub placing: i32,
    pub country: Option<String>,
    pub has_decklist: bool,
}

impl StandingRow {
    fn into_player(self, decklist: Vec<DeckListItem>) -> Player {
        Player {
            id: self.player_id,
            name: self.name,
            placing: self.placing,
            country: self.country,
            decklist,
        }
    }
}

fn link_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|_| ExtractError::Selector(pattern.to_string()))
}

/// Parses the rows of a standings page.
pub fn parse_standings(document: &Html) -> Result<Vec<StandingRow>> {
    let player_link = link_regex(PLAYER_LINK_PATTERN)?;
    let decklist_link = link_regex(DECKLIST_LINK_PATTERN)?;

    let rows = table_rows(html::root(document), STANDINGS_TABLE, STANDINGS_HEADER_ROWS)?;
    let mut standings = Vec::with_capacity(rows.len());
    for row in rows {
        let hrefs = row.hrefs()?;
        let player_href = hrefs
            .iter()
            .find(|href| player_link.is_match(href))
            .ok_or_else(|| ExtractError::missing("a[href~=/tournament/<id>/player/<pid>]"))?;
        let player_id = player_href
            .split('/')
            .nth(PLAYER_ID_SEGMENT)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ExtractError::invalid("player link", player_href))?;

        let placing = match row.attr_opt("data-placing") {
            Some(raw) => html::parse_field("data-placing", raw)?,
            None => DEFAULT_PLACING,
        };

        standings.push(StandingRow {
            player_id: player_id.to_string(),
            name: row.require_attr("data-name")?.to_string(),
            placing,
            country: row.attr_opt("data-country").map(str::to_string),
            has_decklist: hrefs.iter().any(|href| decklist_link.is_match(href)),
        });
    }
    Ok(standings)
}

/// Recognizes card links on decklist pages and turns them into card paths.
#[derive(Clone, Debug)]
pub struct DecklistLinks {
    cards_base_url: String,
    card_link: Regex,
}

impl DecklistLinks {
    /// Card links point at `<cards_base_url>/cards/...`.
    pub fn new(cards_base_url: &str) -> Result<Self> {
        let cards_base_url = cards_base_url.trim_end_matches('/').to_string();
        let card_link = link_regex(&format!("{}/cards/", regex::escape(&cards_base_url)))?;
        Ok(Self {
            cards_base_url,
            card_link,
        })
    }

    fn card_path<'h>(&self, href: &'h str) -> Option<&'h str> {
        if !self.card_link.is_match(href) {
            return None;
        }
        Some(href.strip_prefix(self.cards_base_url.as_str()).unwrap_or(href))
    }
}

/// Parses a decklist page. A page without a decklist block is an empty deck.
pub fn parse_decklist(document: &Html, links: &DecklistLinks) -> Result<Vec<DeckListItem>> {
    let Some(block) = html::root(document).find("div.decklist")? else {
        return Ok(Vec::new());
    };

    let mut decklist = Vec::new();
    for link in block.find_all("a")? {
        let Some(url) = link.attr_opt("href").and_then(|href| links.card_path(href)) else {
            continue;
        };
        let text = link.text_content();
        let first = text
            .chars()
            .next()
            .ok_or_else(|| ExtractError::invalid("card count", &text))?;
        let count = first
            .to_digit(10)
            .filter(|count| *count > 0)
            .ok_or_else(|| ExtractError::invalid("card count", &text))?;
        decklist.push(DeckListItem {
            url: url.to_string(),
            count,
        });
    }
    Ok(decklist)
}

/// Fetches the decklist of every row that links one and builds the players.
///
/// Rows without a decklist link and rows whose decklist page cannot be
/// fetched are left out. A decklist page that fetches but does not parse
/// fails the whole batch.
pub async fn extract_players(
    fetcher: &CachedFetcher,
    tournament_id: &str,
    rows: Vec<StandingRow>,
    links: &DecklistLinks,
) -> Result<Vec<Player>> {
    let fetched = try_join_all(rows.into_iter().map(|row| async move {
        if !row.has_decklist {
            return Ok::<_, ExtractError>(None);
        }
        let url = decklist_path(tournament_id, &row.player_id);
        let Some(document) = fetcher.fetch_page(&url, true).await else {
            tracing::warn!(
                "dropping player {} of tournament {}: decklist unavailable",
                row.player_id,
                tournament_id
            );
            return Ok(None);
        };
        let decklist = parse_decklist(&document, links).map_err(|e| e.in_page(&url))?;
        Ok(Some(row.into_player(decklist)))
    }))
    .await?;

    Ok(fetched.into_iter().flatten().collect())
}
