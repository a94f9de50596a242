//! Card page extraction.

use limitless_api::types::{Card, CardKind, BASIC_STAGE};
use scraper::{ElementRef, Html};

use crate::error::{ExtractError, Result};
use crate::fetch::CachedFetcher;
use crate::html::{self, ElementExt};

/// Link from an evolved card to the search page of its previous stage.
const EVOLVES_FROM_LINK: &str = r#"a[href*="/cards?q=name:"]"#;
const SEARCH_GRID: &str = "div.card-search-grid";

/// Everything read from the card page itself, before the predecessor lookup.
#[derive(Debug, PartialEq)]
pub struct CardPage {
    pub card: Card,
    /// Search page listing the previous stage, for evolved Pokémon.
    pub evolves_from_link: Option<String>,
}

impl CardPage {
    /// True when the card is a Pokémon above the Basic stage.
    pub fn is_evolved(&self) -> bool {
        self.card.kind() == CardKind::Pokemon
            && self.card.stage.as_deref().is_some_and(|s| s != BASIC_STAGE)
    }
}

/// Fetches a card page and resolves its predecessors.
///
/// Structural problems on the card page fail the card. The predecessor lookup
/// is lenient: a missing link, an unreachable search page or a search page
/// without a grid all leave `evolves_from` empty with a warning.
pub async fn extract_card(fetcher: &CachedFetcher, url: &str) -> Result<Card> {
    let parsed = {
        let document = fetcher
            .fetch_page(url, true)
            .await
            .ok_or_else(|| ExtractError::FetchFailed {
                url: url.to_string(),
            })?;
        parse_card_page(&document, url)
    };
    let page = parsed.map_err(|e| {
        tracing::error!("Error extracting card data from URL {}: {}", url, e);
        e.in_page(url)
    })?;

    if !page.is_evolved() {
        return Ok(page.card);
    }

    let mut card = page.card;
    card.evolves_from = match page.evolves_from_link {
        Some(link) => previous_stages(fetcher, url, &link).await?,
        None => {
            tracing::warn!("Evolves from link not found for non-basic Pokémon URL: {}", url);
            Vec::new()
        }
    };
    Ok(card)
}

async fn previous_stages(fetcher: &CachedFetcher, url: &str, link: &str) -> Result<Vec<String>> {
    let Some(document) = fetcher.fetch_page(link, true).await else {
        tracing::warn!("Failed to fetch evolves from page for URL: {}", url);
        return Ok(Vec::new());
    };
    match html::root(&document).find(SEARCH_GRID)? {
        Some(grid) => grid.hrefs(),
        None => {
            tracing::warn!("Card search grid not found in evolves from page for URL: {}", url);
            Ok(Vec::new())
        }
    }
}

/// Parses a card page. `evolves_from` is left empty; see [`extract_card`].
pub fn parse_card_page(document: &Html, url: &str) -> Result<CardPage> {
    let root = html::root(document);

    let versions = root.require("table.card-prints-versions")?;
    let number = parse_number(versions.require("tr.current")?)?;
    let is_promo = is_promo(versions)?;

    let name = root
        .require("span.card-text-name")?
        .text_content()
        .trim()
        .to_string();

    let type_line = root
        .require("p.card-text-type")?
        .stripped_strings()
        .into_iter()
        .next()
        .ok_or_else(|| ExtractError::missing("p.card-text-type text"))?;
    let card_type = primary_type(&type_line);

    let mut card = Card {
        url: url.to_string(),
        number,
        name,
        card_type: card_type.clone(),
        subtype: None,
        stage: None,
        evolves_from: Vec::new(),
        is_promo,
    };
    let mut evolves_from_link = None;

    match CardKind::from_type(&card_type) {
        CardKind::Pokemon => {
            let stage = type_suffix(&type_line).ok_or_else(|| {
                ExtractError::invalid("Pokémon type line", &type_line)
            })?;
            card.subtype = Some(pokemon_subtype(root)?);
            if stage != BASIC_STAGE {
                evolves_from_link = root
                    .find(EVOLVES_FROM_LINK)?
                    .and_then(|a| a.attr_opt("href"))
                    .map(str::to_string);
            }
            card.stage = Some(stage);
        }
        CardKind::Trainer => {
            let subtype = type_suffix(&type_line).ok_or_else(|| {
                ExtractError::invalid("Trainer type line", &type_line)
            })?;
            card.subtype = Some(subtype);
        }
        CardKind::Other => {}
    }

    Ok(CardPage {
        card,
        evolves_from_link,
    })
}

/// Printed number of the current printing, e.g. `#12` -> 12.
fn parse_number(current: ElementRef<'_>) -> Result<u32> {
    let raw = current
        .require("span.prints-table-card-number")?
        .text_content();
    let raw = raw.trim();
    let mut chars = raw.chars();
    if chars.next().is_none() || raw.chars().count() < 2 {
        return Err(ExtractError::invalid("card number", raw));
    }
    let number: u32 = html::parse_field("card number", chars.as_str())?;
    if number == 0 {
        return Err(ExtractError::invalid("card number", raw));
    }
    Ok(number)
}

/// A card is a promo when the first printing listed (the row after the
/// header) carries no print class.
fn is_promo(versions: ElementRef<'_>) -> Result<bool> {
    let rows = versions.find_all("tr")?;
    let first = rows
        .get(1)
        .ok_or_else(|| ExtractError::missing("table.card-prints-versions tr"))?;
    Ok(first.attr_opt("class").is_none())
}

/// Text before the first `-` of the first line, e.g. `Pokémon`.
fn primary_type(type_line: &str) -> String {
    let first_line = type_line.lines().next().unwrap_or_default();
    first_line
        .split('-')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Text after the first `"- "` up to the end of that line, e.g. `Stage 1`.
fn type_suffix(type_line: &str) -> Option<String> {
    let (_, rest) = type_line.split_once("- ")?;
    let suffix = rest.lines().next().unwrap_or_default().trim();
    (!suffix.is_empty()).then(|| suffix.to_string())
}

/// Energy type from the title line: `Ivysaur - Grass - 90 HP` -> `Grass`.
fn pokemon_subtype(root: ElementRef<'_>) -> Result<String> {
    let title = root.require("p.card-text-title")?.stripped_strings();
    let segment = title
        .get(1)
        .ok_or_else(|| ExtractError::missing("p.card-text-title subtype"))?;
    let subtype = segment
        .split("- ")
        .nth(1)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ExtractError::invalid("Pokémon subtype", segment))?;
    Ok(subtype.to_string())
}
