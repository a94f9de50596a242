//! Set listing extraction and the set catalog crawl.

use futures::future::try_join_all;
use limitless_api::types::{Card, Set};
use limitless_api::SETS_PATH;
use scraper::Html;
use serde::Serialize;

use crate::card::extract_card;
use crate::error::{ExtractError, Result};
use crate::fetch::CachedFetcher;
use crate::html::{self, table_rows, ElementExt};
use crate::writer::RecordWriter;

/// Header rows at the top of the catalog table.
const CATALOG_HEADER_ROWS: usize = 2;

/// Counts from one pass over the set catalog.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SetReport {
    pub listed: usize,
    pub skipped: usize,
    pub written: usize,
    pub cards: usize,
}

/// Extracts every card linked from a set's card grid.
///
/// Cards are extracted concurrently; the first failing card fails the set.
pub async fn extract_set(fetcher: &CachedFetcher, url: &str) -> Result<Vec<Card>> {
    tracing::info!("extracting set {}", url);
    let links = {
        let document = fetcher
            .fetch_page(url, true)
            .await
            .ok_or_else(|| ExtractError::FetchFailed {
                url: url.to_string(),
            })?;
        card_links(&document).map_err(|e| e.in_page(url))?
    };

    if links.is_empty() {
        tracing::warn!("No card links found for set URL: {}", url);
        return Ok(Vec::new());
    }

    try_join_all(links.iter().map(|link| extract_card(fetcher, link)))
        .await
        .map_err(|e| {
            tracing::error!("Error extracting set from URL {}: {}", url, e);
            e
        })
}

/// Links of the set page's card grid, in page order.
pub fn card_links(document: &Html) -> Result<Vec<String>> {
    html::root(document)
        .require("div.card-search-grid")?
        .hrefs()
}

/// Reads the catalog table into sets whose cards are not extracted yet.
pub fn parse_set_catalog(document: &Html) -> Result<Vec<Set>> {
    let rows = table_rows(html::root(document), "sets-table", CATALOG_HEADER_ROWS)?;
    let mut sets = Vec::with_capacity(rows.len());
    for row in rows {
        let cells = row.find_all("td")?;
        let (Some(first), Some(second)) = (cells.first(), cells.get(1)) else {
            return Err(ExtractError::missing(".sets-table td"));
        };
        let url = first.require("a")?.require_attr("href")?.to_string();
        let code = html::file_stem("set code", first.require("img")?.require_attr("alt")?)?;
        let name = first
            .stripped_strings()
            .into_iter()
            .next()
            .ok_or_else(|| ExtractError::missing(".sets-table td text"))?;
        let release_date = second.require("a")?.text_content().trim().to_string();
        sets.push(Set {
            name,
            code,
            release_date,
            url,
            cards: None,
        });
    }
    Ok(sets)
}

/// Crawls the set catalog and writes one file per set.
pub struct SetCrawler<'a> {
    fetcher: &'a CachedFetcher,
    writer: &'a RecordWriter,
}

impl<'a> SetCrawler<'a> {
    pub fn new(fetcher: &'a CachedFetcher, writer: &'a RecordWriter) -> Self {
        Self { fetcher, writer }
    }

    /// Fetches the catalog (never cached), skips sets already written, and
    /// extracts the rest concurrently. Each set is written as soon as all of
    /// its cards are in; a failing set fails the crawl.
    pub async fn crawl(&self) -> Result<SetReport> {
        let sets = {
            let document = self
                .fetcher
                .fetch_page(SETS_PATH, false)
                .await
                .ok_or_else(|| ExtractError::FetchFailed {
                    url: SETS_PATH.to_string(),
                })?;
            parse_set_catalog(&document).map_err(|e| e.in_page(SETS_PATH))?
        };

        let mut report = SetReport {
            listed: sets.len(),
            ..SetReport::default()
        };

        let mut pending = Vec::new();
        for set in sets {
            if self.writer.set_exists(&set.code).await {
                tracing::info!(
                    "skipping set {} because {} already exists",
                    set.code,
                    self.writer.set_path(&set.code).display()
                );
                report.skipped += 1;
                continue;
            }
            if set.release_date_parsed().is_none() {
                tracing::warn!(
                    "set {} has an unrecognized release date {:?}",
                    set.code,
                    set.release_date
                );
            }
            pending.push(set);
        }

        let written =
            try_join_all(pending.into_iter().map(|set| self.extract_and_write(set))).await?;
        report.written = written.len();
        report.cards = written.iter().sum();
        Ok(report)
    }

    async fn extract_and_write(&self, set: Set) -> Result<usize> {
        let cards = extract_set(self.fetcher, &set.url).await?;
        let count = cards.len();
        let set = set.with_cards(cards);
        self.writer.write_set(&set).await?;
        tracing::info!("wrote set {} ({} cards)", set.code, count);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
        <html><body>
        <table class="sets-table">
          <tr><th colspan="3">Sets</th></tr>
          <tr><th>Name</th><th>Release</th><th>Cards</th></tr>
          <tr>
            <td><a href="/cards/A1"><img alt="A1" src="a1.png"> Genetic Apex <span class="code">A1</span></a></td>
            <td><a href="/cards/A1">29 Oct 24</a></td>
            <td>286</td>
          </tr>
          <tr>
            <td><a href="/cards/P-A"><img alt="P-A" src="pa.png">Promo-A</a></td>
            <td><a href="/cards/P-A"> 29 Oct 24 </a></td>
            <td>41</td>
          </tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn catalog_rows() {
        let sets = parse_set_catalog(&Html::parse_document(CATALOG)).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].name, "Genetic Apex");
        assert_eq!(sets[0].code, "A1");
        assert_eq!(sets[0].url, "/cards/A1");
        assert_eq!(sets[0].release_date, "29 Oct 24");
        assert!(sets[0].cards.is_none());
        assert_eq!(sets[1].code, "P-A");
        assert_eq!(sets[1].name, "Promo-A");
        assert_eq!(sets[1].release_date, "29 Oct 24");
    }

    #[test]
    fn catalog_rejects_code_outside_sets_dir() {
        let html = CATALOG.replace(r#"alt="P-A""#, r#"alt="../x""#);
        let err = parse_set_catalog(&Html::parse_document(&html)).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidValue { ref value, .. } if value == "../x"));
    }

    #[test]
    fn catalog_missing_image_fails() {
        let html = CATALOG.replace(r#"<img alt="P-A" src="pa.png">"#, "");
        let err = parse_set_catalog(&Html::parse_document(&html)).unwrap_err();
        assert!(matches!(err, ExtractError::MissingElement { .. }));
    }

    #[test]
    fn grid_links() {
        let html = r#"<div class="card-search-grid">
            <a href="/cards/A1/1"><img></a><a href="/cards/A1/2"><img></a>
        </div>"#;
        assert_eq!(
            card_links(&Html::parse_document(html)).unwrap(),
            vec!["/cards/A1/1", "/cards/A1/2"]
        );
        assert!(card_links(&Html::parse_document("<div></div>")).is_err());
    }
}
