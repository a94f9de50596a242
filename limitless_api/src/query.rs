//! Path builders for every page shape the crawler visits.

use url::form_urlencoded;

/// Set catalog page on the card database.
pub const SETS_PATH: &str = "/cards";

/// Standings page of a tournament, with the player column expanded.
pub fn standings_path(tournament_id: &str) -> String {
    format!("/tournament/{}/standings?players", tournament_id)
}

/// Pairings page of a tournament. Without a round parameter the source
/// serves the final round.
pub fn pairings_path(tournament_id: &str) -> String {
    format!("/tournament/{}/pairings?players", tournament_id)
}

/// Decklist page of one player in a tournament.
pub fn decklist_path(tournament_id: &str, player_id: &str) -> String {
    format!("/tournament/{}/player/{}/decklist", tournament_id, player_id)
}

/// Filters for the completed-tournament listing.
///
/// Serializes to the listing path with its query string. The first page is
/// requested without a `page` parameter, later pages append `page=N`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TournamentListQuery {
    pub path: String,
    pub game: String,
    pub format: String,
    pub platform: String,
    pub kind: String,
    pub time: String,
    pub start_page: u32,
}

impl Default for TournamentListQuery {
    fn default() -> Self {
        Self {
            path: "/tournaments/completed".to_string(),
            game: "POCKET".to_string(),
            format: "STANDARD".to_string(),
            platform: "all".to_string(),
            kind: "online".to_string(),
            time: "all".to_string(),
            start_page: 1,
        }
    }
}

impl TournamentListQuery {
    pub fn with_game(mut self, game: &str) -> Self {
        self.game = game.to_string();
        self
    }

    pub fn with_format(mut self, format: &str) -> Self {
        self.format = format.to_string();
        self
    }

    pub fn with_platform(mut self, platform: &str) -> Self {
        self.platform = platform.to_string();
        self
    }

    /// Sets the tournament type filter (`online`, `inperson`, ...).
    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }

    pub fn with_time(mut self, time: &str) -> Self {
        self.time = time.to_string();
        self
    }

    /// Sets the first listing page to visit (1-indexed).
    pub fn with_start_page(mut self, page: u32) -> Self {
        self.start_page = page.max(1);
        self
    }

    /// Returns the listing path for the given page number.
    pub fn page_path(&self, page: u32) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("game", &self.game)
            .append_pair("format", &self.format)
            .append_pair("platform", &self.platform)
            .append_pair("type", &self.kind)
            .append_pair("time", &self.time);
        if page > 1 {
            query.append_pair("page", &page.to_string());
        }
        format!("{}?{}", self.path, query.finish())
    }
}
