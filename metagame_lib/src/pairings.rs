//! Pairing pages: layout classification, match parsing and round discovery.

use futures::future::try_join_all;
use limitless_api::pairings_path;
use limitless_api::types::{Match, MatchResult};
use scraper::{ElementRef, Html};

use crate::error::{ExtractError, Result};
use crate::fetch::CachedFetcher;
use crate::html::{self, ElementExt};

/// How a pairing page encodes its results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairingLayout {
    /// Single-elimination bracket with two-sided match blocks.
    Bracket,
    /// Swiss round, one table row per pairing.
    Table,
    Unrecognized,
}

/// Decides the layout of a pairing page.
pub fn classify(document: &Html) -> Result<PairingLayout> {
    let root = html::root(document);
    if root.find("div.live-bracket")?.is_some() {
        return Ok(PairingLayout::Bracket);
    }
    if root.find("div.pairings table[data-tournament]")?.is_some() {
        return Ok(PairingLayout::Table);
    }
    Ok(PairingLayout::Unrecognized)
}

/// Parses the matches of one pairing page according to its layout.
pub fn parse_pairings(document: &Html) -> Result<Vec<Match>> {
    match classify(document)? {
        PairingLayout::Bracket => bracket_matches(html::root(document)),
        PairingLayout::Table => table_matches(html::root(document)),
        PairingLayout::Unrecognized => Err(ExtractError::UnrecognizedPairings),
    }
}

/// Matches of a bracket page. Blocks involving a bye are skipped.
pub fn bracket_matches(root: ElementRef<'_>) -> Result<Vec<Match>> {
    let bracket = root.require("div.live-bracket")?;
    let mut matches = Vec::new();
    for block in bracket.find_all("div.bracket-match")? {
        if block.find("a.bye")?.is_some() {
            continue;
        }
        let players = block.find_all("div.live-bracket-player")?;
        if players.is_empty() {
            continue;
        }
        let match_results = players
            .into_iter()
            .map(|player| {
                Ok(MatchResult {
                    player_id: player.require_attr("data-id")?.to_string(),
                    score: player.require("div.score")?.attr_parse("data-score")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        matches.push(Match { match_results });
    }
    Ok(matches)
}

/// Matches of a swiss table page. Only completed rows count, and only rows
/// exposing both sides.
pub fn table_matches(root: ElementRef<'_>) -> Result<Vec<Match>> {
    let mut matches = Vec::new();
    for row in root.find_all(r#"tr[data-completed="1"]"#)? {
        let (Some(p1), Some(p2)) = (row.find("td.p1")?, row.find("td.p2")?) else {
            continue;
        };
        matches.push(Match {
            match_results: vec![side_result(p1)?, side_result(p2)?],
        });
    }
    Ok(matches)
}

fn side_result(side: ElementRef<'_>) -> Result<MatchResult> {
    Ok(MatchResult {
        player_id: side.require_attr("data-id")?.to_string(),
        score: side.attr_parse("data-count")?,
    })
}

/// Links to the earlier rounds, read from the final round's page.
///
/// The last mini-nav link is the page itself and is dropped. A tournament
/// with a single round has no mini-nav and yields an empty list.
pub fn previous_round_urls(document: &Html) -> Result<Vec<String>> {
    let Some(nav) = html::root(document).find(".mini-nav")? else {
        return Ok(Vec::new());
    };
    let mut links = nav.find_all("a")?;
    links.pop();
    Ok(links
        .into_iter()
        .filter_map(|a| a.attr_opt("href"))
        .map(str::to_string)
        .collect())
}

/// Extracts every match of a tournament across all of its rounds.
///
/// The final round page is fetched first to discover the earlier rounds,
/// which are then fetched concurrently. A page that cannot be fetched or
/// parsed fails the tournament. Earlier rounds come first in the result.
pub async fn extract_matches(fetcher: &CachedFetcher, tournament_id: &str) -> Result<Vec<Match>> {
    let last_url = pairings_path(tournament_id);
    let (previous, last_matches) = {
        let document = fetch(fetcher, &last_url).await?;
        let previous = previous_round_urls(&document).map_err(|e| e.in_page(&last_url))?;
        let matches = parse_pairings(&document).map_err(|e| e.in_page(&last_url))?;
        (previous, matches)
    };

    let earlier = try_join_all(previous.iter().map(|url| async move {
        let document = fetch(fetcher, url).await?;
        parse_pairings(&document).map_err(|e| e.in_page(url))
    }))
    .await?;

    let mut matches: Vec<Match> = earlier.into_iter().flatten().collect();
    matches.extend(last_matches);
    Ok(matches)
}

async fn fetch(fetcher: &CachedFetcher, url: &str) -> Result<Html> {
    fetcher
        .fetch_page(url, true)
        .await
        .ok_or_else(|| ExtractError::FetchFailed {
            url: url.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bracket_player(id: &str, score: i32) -> String {
        format!(
            r#"<div class="live-bracket-player" data-id="{id}">
                 <span class="name">{id}</span><div class="score" data-score="{score}">{score}</div>
               </div>"#
        )
    }

    const BYE_BLOCK: &str = r#"<div class="bracket-match">
        <div class="live-bracket-player" data-id="erika"><div class="score" data-score="0"></div></div>
        <a class="bye">BYE</a>
    </div>"#;

    fn bracket_page(blocks: &[String]) -> String {
        format!(
            r#"<html><body><div class="live-bracket">{}</div></body></html>"#,
            blocks.join("\n")
        )
    }

    fn bracket_block(a: (&str, i32), b: (&str, i32)) -> String {
        format!(
            r#"<div class="bracket-match">{}{}</div>"#,
            bracket_player(a.0, a.1),
            bracket_player(b.0, b.1)
        )
    }

    const TABLE_PAGE: &str = r#"<html><body>
        <div class="pairings">
          <table data-tournament="67a1">
            <tr><th>Table</th><th>Player 1</th><th>Player 2</th></tr>
            <tr data-completed="1">
              <td>1</td>
              <td class="p1" data-id="ash" data-count="2">Ash</td>
              <td class="p2" data-id="gary" data-count="1">Gary</td>
            </tr>
            <tr data-completed="0">
              <td>2</td>
              <td class="p1" data-id="misty" data-count="0">Misty</td>
              <td class="p2" data-id="brock" data-count="0">Brock</td>
            </tr>
            <tr data-completed="1">
              <td>3</td>
              <td class="p1" data-id="erika" data-count="1">Erika</td>
              <td>BYE</td>
            </tr>
          </table>
        </div>
        </body></html>"#;

    #[test]
    fn classify_layouts() {
        let bracket = Html::parse_document(&bracket_page(&[]));
        assert_eq!(classify(&bracket).unwrap(), PairingLayout::Bracket);

        let table = Html::parse_document(TABLE_PAGE);
        assert_eq!(classify(&table).unwrap(), PairingLayout::Table);

        let bare_table = Html::parse_document(
            r#"<div class="pairings"><table><tr><td>1</td></tr></table></div>"#,
        );
        assert_eq!(classify(&bare_table).unwrap(), PairingLayout::Unrecognized);
        assert!(matches!(
            parse_pairings(&bare_table),
            Err(ExtractError::UnrecognizedPairings)
        ));
    }

    #[test]
    fn four_player_bracket_round() {
        let page = bracket_page(&[
            bracket_block(("ash", 2), ("gary", 1)),
            bracket_block(("misty", 0), ("brock", 2)),
        ]);
        let matches = parse_pairings(&Html::parse_document(&page)).unwrap();
        assert_eq!(matches.len(), 2);
        assert!(matches.iter().all(|m| m.match_results.len() == 2));
        assert_eq!(matches[0].match_results[0].player_id, "ash");
        assert_eq!(matches[0].match_results[0].score, 2);
        assert_eq!(matches[1].match_results[1].player_id, "brock");
    }

    #[test]
    fn bracket_bye_yields_no_match() {
        let page = bracket_page(&[BYE_BLOCK.to_string()]);
        let matches = parse_pairings(&Html::parse_document(&page)).unwrap();
        assert!(matches.is_empty());

        let page = bracket_page(&[
            BYE_BLOCK.to_string(),
            bracket_block(("ash", 2), ("gary", 0)),
        ]);
        let matches = parse_pairings(&Html::parse_document(&page)).unwrap();
        assert_eq!(matches.len(), 1);
        assert!(matches[0]
            .match_results
            .iter()
            .all(|r| r.player_id != "erika"));
    }

    #[test]
    fn bracket_missing_score_fails() {
        let page = bracket_page(&[
            r#"<div class="bracket-match"><div class="live-bracket-player" data-id="ash"></div></div>"#
                .to_string(),
        ]);
        assert!(matches!(
            parse_pairings(&Html::parse_document(&page)),
            Err(ExtractError::MissingElement { .. })
        ));
    }

    #[test]
    fn bracket_non_numeric_score_fails() {
        let page = bracket_page(&[bracket_block(("ash", 2), ("gary", 1)).replace(
            r#"data-score="1""#,
            r#"data-score="W""#,
        )]);
        assert!(matches!(
            parse_pairings(&Html::parse_document(&page)),
            Err(ExtractError::InvalidValue { .. })
        ));
    }

    #[test]
    fn table_only_completed_two_sided_rows() {
        let matches = parse_pairings(&Html::parse_document(TABLE_PAGE)).unwrap();
        assert_eq!(matches.len(), 1);
        let results = &matches[0].match_results;
        assert_eq!(results.len(), 2);
        assert_eq!(
            results[0],
            MatchResult {
                player_id: "ash".to_string(),
                score: 2
            }
        );
        assert_eq!(results[1].player_id, "gary");
        assert_eq!(results[1].score, 1);
    }

    #[test]
    fn table_missing_count_fails() {
        let page = TABLE_PAGE.replace(r#"data-id="gary" data-count="1""#, r#"data-id="gary""#);
        assert!(matches!(
            parse_pairings(&Html::parse_document(&page)),
            Err(ExtractError::MissingAttribute { .. })
        ));
    }

    #[test]
    fn previous_rounds_drop_current_page() {
        let page = r#"<html><body>
            <div class="mini-nav">
              <a href="/tournament/67a1/pairings?round=1">1</a>
              <a href="/tournament/67a1/pairings?round=2">2</a>
              <a href="/tournament/67a1/pairings?round=3">Top 4</a>
            </div></body></html>"#;
        assert_eq!(
            previous_round_urls(&Html::parse_document(page)).unwrap(),
            vec![
                "/tournament/67a1/pairings?round=1",
                "/tournament/67a1/pairings?round=2"
            ]
        );
    }

    #[test]
    fn single_round_has_no_siblings() {
        let page = Html::parse_document(TABLE_PAGE);
        assert!(previous_round_urls(&page).unwrap().is_empty());

        let empty_nav = Html::parse_document(r#"<div class="mini-nav"></div>"#);
        assert!(previous_round_urls(&empty_nav).unwrap().is_empty());
    }
}
