use serde::{Deserialize, Serialize};

/// One line of a decklist: a card path and how many copies were played.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckListItem {
    pub url: String,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub placing: i32,
    pub country: Option<String>,
    pub decklist: Vec<DeckListItem>,
}

impl Player {
    pub fn has_decklist(&self) -> bool {
        !self.decklist.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub player_id: String,
    pub score: i32,
}

/// A played match. Byes are never recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub match_results: Vec<MatchResult>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: String,
    pub name: String,
    pub date: String,
    pub organizer: String,
    pub format: String,
    pub nb_players: u32,
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
}
