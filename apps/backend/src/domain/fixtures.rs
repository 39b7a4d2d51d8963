#![cfg(test)]

//! Test helpers for building rigged sessions and parsing card tokens.

use crate::domain::cards::Card;
use crate::domain::deck::Deck;
use crate::domain::session::{GameSession, Seat};

pub fn card(token: &str) -> Card {
    token.parse().unwrap()
}

pub fn cards(tokens: &[&str]) -> Vec<Card> {
    tokens.iter().map(|t| card(t)).collect()
}

/// Deal a session from an explicit deck order: seat One's hand off the
/// top, then seat Two's, then the undealt middle, with the trump last.
pub fn rigged_session(
    hand1: &[&str],
    hand2: &[&str],
    middle: &[&str],
    trump: &str,
    first: Seat,
) -> GameSession {
    let mut stock = cards(hand1);
    stock.extend(cards(hand2));
    stock.extend(cards(middle));
    stock.push(card(trump));
    GameSession::deal_from_deck(Deck::from_cards(stock), hand1.len(), first)
}
