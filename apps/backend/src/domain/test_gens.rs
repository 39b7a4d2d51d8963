#![cfg(test)]

// Proptest generators for domain types. Unique-card generators draw from
// the canonical 40-card set so rigged states stay valid.

use proptest::prelude::*;
use rand::Rng as _;

use crate::domain::cards::{full_deck, Card, Rank, Suit};
use crate::domain::session::Seat;

pub fn suit() -> impl Strategy<Value = Suit> {
    prop_oneof![
        Just(Suit::Hearts),
        Just(Suit::Diamonds),
        Just(Suit::Clubs),
        Just(Suit::Spades),
    ]
}

pub fn rank() -> impl Strategy<Value = Rank> {
    prop_oneof![
        Just(Rank::Ace),
        Just(Rank::Seven),
        Just(Rank::King),
        Just(Rank::Jack),
        Just(Rank::Queen),
        Just(Rank::Six),
        Just(Rank::Five),
        Just(Rank::Four),
        Just(Rank::Three),
        Just(Rank::Two),
    ]
}

pub fn card() -> impl Strategy<Value = Card> {
    (suit(), rank()).prop_map(|(suit, rank)| Card { suit, rank })
}

pub fn seat() -> impl Strategy<Value = Seat> {
    prop_oneof![Just(Seat::One), Just(Seat::Two)]
}

/// A shuffled subset of N unique cards from the full deck.
pub fn unique_cards(count: usize) -> impl Strategy<Value = Vec<Card>> {
    Just(()).prop_perturb(move |_, mut rng| {
        let mut cards = full_deck();
        for i in 0..count.min(cards.len()) {
            let j = rng.random_range(i..cards.len());
            cards.swap(i, j);
        }
        cards.truncate(count);
        cards
    })
}

/// A hand of 1 to 9 unique cards.
pub fn hand() -> impl Strategy<Value = Vec<Card>> {
    (1usize..=9).prop_flat_map(unique_cards)
}

/// Two distinct cards (a complete trick).
pub fn two_distinct_cards() -> impl Strategy<Value = (Card, Card)> {
    unique_cards(2).prop_map(|cards| (cards[0], cards[1]))
}
