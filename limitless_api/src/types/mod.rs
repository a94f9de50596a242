mod card;
pub use self::card::{Card, CardKind, Set, BASIC_STAGE, RELEASE_DATE_FORMAT};

mod tournament;
pub use self::tournament::{DeckListItem, Match, MatchResult, Player, Tournament};
