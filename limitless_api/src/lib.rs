mod client;
mod errors;
mod query;
pub mod types;
mod user_agent;
pub use self::client::{Client, CARDS_BASE_URL, TOURNAMENTS_BASE_URL};
pub use self::errors::Error;
pub use self::query::{
    decklist_path, pairings_path, standings_path, TournamentListQuery, SETS_PATH,
};
