use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stage label of a Pokémon that does not evolve from anything.
pub const BASIC_STAGE: &str = "Basic";

/// Format of set release dates in the catalog, e.g. `29 Oct 24`.
pub const RELEASE_DATE_FORMAT: &str = "%d %b %y";

/// Primary card type, as printed on the type line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardKind {
    Pokemon,
    Trainer,
    Other,
}

impl CardKind {
    pub fn from_type(card_type: &str) -> Self {
        match card_type {
            "Pokémon" => Self::Pokemon,
            "Trainer" => Self::Trainer,
            _ => Self::Other,
        }
    }
}

/// One printing of a card.
///
/// `stage` and `subtype` are only set for Pokémon (Trainers carry a subtype
/// only). `evolves_from` is empty for Basic Pokémon and every non-Pokémon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub url: String,
    pub number: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub card_type: String,
    pub subtype: Option<String>,
    pub stage: Option<String>,
    pub evolves_from: Vec<String>,
    pub is_promo: bool,
}

impl Card {
    pub fn kind(&self) -> CardKind {
        CardKind::from_type(&self.card_type)
    }
}

/// A card set from the catalog.
///
/// `cards` stays `None` until every card of the set has been extracted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Set {
    pub name: String,
    pub code: String,
    pub release_date: String,
    pub url: String,
    pub cards: Option<Vec<Card>>,
}

impl Set {
    /// Attaches the fully extracted card list.
    pub fn with_cards(mut self, cards: Vec<Card>) -> Self {
        self.cards = Some(cards);
        self
    }

    /// Parses the free-text release date, if it follows the catalog format.
    pub fn release_date_parsed(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.release_date.trim(), RELEASE_DATE_FORMAT).ok()
    }
}
