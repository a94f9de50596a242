//! Page builders and fixtures shared by the integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use metagame_lib::{CachedFetcher, RecordWriter};
use tokio::sync::Semaphore;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CARDS_HOST: &str = "https://pocket.limitlesstcg.com";

/// Fetcher against the mock server, caching under `cache_dir`.
pub fn fetcher(server: &MockServer, cache_dir: &Path, files: Arc<Semaphore>) -> CachedFetcher {
    CachedFetcher::for_site(&server.uri(), Duration::from_secs(5), cache_dir, files, 20)
        .expect("build fetcher")
}

pub fn writer(output_dir: &Path, files: Arc<Semaphore>) -> RecordWriter {
    RecordWriter::new(output_dir, files)
}

pub fn files() -> Arc<Semaphore> {
    Arc::new(Semaphore::new(50))
}

/// Serves `body` for GET `route`, expecting exactly `times` requests.
pub async fn serve(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Serves `body` for GET `route` without any request-count expectation,
/// for pages a fail-fast batch may or may not reach.
pub async fn serve_any(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn fail(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string("unavailable"))
        .mount(server)
        .await;
}

/// A card page. `type_line` is the type paragraph, e.g. `Pokémon - Stage 1`.
pub fn card_page(name: &str, number: u32, type_line: &str, extra: &str) -> String {
    format!(
        r#"<html><body>
        <div class="card-text">
          <p class="card-text-title"><span class="card-text-name"><a href="/cards/A1/{number}">{name}</a></span> - Grass - 90 HP</p>
          <p class="card-text-type">{type_line}</p>
          {extra}
        </div>
        <table class="card-prints-versions">
          <tr><th>Set</th><th>No.</th></tr>
          <tr class="current"><td>Genetic Apex</td><td><span class="prints-table-card-number">#{number}</span></td></tr>
        </table>
        </body></html>"#
    )
}

pub fn search_grid(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{href}"><img alt="card"></a>"#))
        .collect();
    format!(r#"<html><body><div class="card-search-grid">{anchors}</div></body></html>"#)
}

/// Set catalog with one row per `(code, name, release date)`.
pub fn set_catalog(sets: &[(&str, &str, &str)]) -> String {
    let rows: String = sets
        .iter()
        .map(|(code, name, date)| {
            format!(
                r#"<tr>
                  <td><a href="/cards/{code}"><img alt="{code}" src="{code}.png">{name}</a></td>
                  <td><a href="/cards/{code}">{date}</a></td>
                  <td>2</td>
                </tr>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><table class="sets-table">
          <tr><th colspan="3">Pocket sets</th></tr>
          <tr><th>Set</th><th>Release</th><th>Cards</th></tr>
          {rows}
        </table></body></html>"#
    )
}

/// Listing page with one row per `(id, name, players)`.
pub fn listing_page(current: u32, max: u32, tournaments: &[(&str, &str, u32)]) -> String {
    let rows: String = tournaments
        .iter()
        .map(|(id, name, players)| {
            format!(
                r#"<tr data-name="{name}" data-date="2025-02-01" data-organizer="Pallet League"
                       data-format="STANDARD" data-players="{players}">
                  <td>1 Feb</td>
                  <td><a href="/tournament/{id}/standings">{name}</a></td>
                  <td>{players}</td>
                </tr>"#
            )
        })
        .collect();
    format!(
        r#"<html><body>
        <ul class="pagination" data-current="{current}" data-max="{max}"></ul>
        <table class="completed-tournaments">
          <tr><th>Date</th><th>Name</th><th>Players</th></tr>
          {rows}
        </table></body></html>"#
    )
}

/// Standings page; each entry is `(player id, name, placing, has decklist link)`.
pub fn standings_page(tournament: &str, players: &[(&str, &str, i32, bool)]) -> String {
    let rows: String = players
        .iter()
        .map(|(id, name, placing, has_decklist)| {
            let decklist = if *has_decklist {
                format!(r#"<a href="/tournament/{tournament}/player/{id}/decklist">deck</a>"#)
            } else {
                String::new()
            };
            format!(
                r#"<tr data-name="{name}" data-placing="{placing}" data-country="FR">
                  <td>{placing}</td>
                  <td><a href="/tournament/{tournament}/player/{id}">{name}</a></td>
                  <td>{decklist}</td>
                </tr>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><table class="striped">
          <tr><th>#</th><th>Player</th><th>Deck</th></tr>
          {rows}
        </table></body></html>"#
    )
}

/// Decklist page; each entry is `(card path, count)`.
pub fn decklist_page(cards: &[(&str, u32)]) -> String {
    let anchors: String = cards
        .iter()
        .map(|(card, count)| format!(r#"<a href="{CARDS_HOST}{card}">{count} card</a>"#))
        .collect();
    format!(r#"<html><body><div class="decklist">{anchors}</div></body></html>"#)
}

pub fn empty_decklist_page() -> String {
    "<html><body><p>No decklist submitted.</p></body></html>".to_string()
}

/// Bracket pairing page; each match is two `(player id, score)` sides.
pub fn bracket_page(matches: &[((&str, i32), (&str, i32))]) -> String {
    let blocks: String = matches
        .iter()
        .map(|(a, b)| {
            format!(
                r#"<div class="bracket-match">
                  <div class="live-bracket-player" data-id="{}"><div class="score" data-score="{}"></div></div>
                  <div class="live-bracket-player" data-id="{}"><div class="score" data-score="{}"></div></div>
                </div>"#,
                a.0, a.1, b.0, b.1
            )
        })
        .collect();
    format!(r#"<html><body><div class="live-bracket">{blocks}</div></body></html>"#)
}

/// Swiss pairing page with an optional round navigation.
pub fn table_page(nav: &[&str], matches: &[((&str, i32), (&str, i32))]) -> String {
    let links: String = nav
        .iter()
        .map(|href| format!(r#"<a href="{href}">round</a>"#))
        .collect();
    let rows: String = matches
        .iter()
        .map(|(a, b)| {
            format!(
                r#"<tr data-completed="1">
                  <td class="p1" data-id="{}" data-count="{}"></td>
                  <td class="p2" data-id="{}" data-count="{}"></td>
                </tr>"#,
                a.0, a.1, b.0, b.1
            )
        })
        .collect();
    format!(
        r#"<html><body>
        <div class="mini-nav">{links}</div>
        <div class="pairings"><table data-tournament="t">
          <tr><th>P1</th><th>P2</th></tr>
          {rows}
        </table></div></body></html>"#
    )
}
