//! Domain layer: pure game logic, no transport or timing.

pub mod bot;
pub mod cards;
pub mod deck;
pub mod matches;
pub mod scoring;
pub mod session;
pub mod tricks;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_cards;
#[cfg(test)]
mod tests_matches;
#[cfg(test)]
mod tests_props;
#[cfg(test)]
mod tests_session;

// Re-exports for ergonomics
pub use cards::{full_deck, Card, Rank, Suit};
pub use deck::Deck;
pub use matches::MatchState;
pub use session::{GameSession, Seat, SessionResult, SessionStatus};
pub use tricks::{legal_cards, trick_winner};
