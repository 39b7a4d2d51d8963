#![cfg(test)]

use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::cards::{full_deck, Card, Rank, Suit, RANKS};
use crate::domain::deck::Deck;
use crate::domain::fixtures::card;

#[test]
fn full_deck_is_forty_unique_cards_worth_120() {
    let deck = full_deck();
    assert_eq!(deck.len(), 40);

    let unique: HashSet<Card> = deck.iter().copied().collect();
    assert_eq!(unique.len(), 40);

    let total: u32 = deck.iter().map(|c| u32::from(c.points())).sum();
    assert_eq!(total, 120);
}

#[test]
fn rank_points_follow_the_bisca_table() {
    assert_eq!(Rank::Ace.points(), 11);
    assert_eq!(Rank::Seven.points(), 10);
    assert_eq!(Rank::King.points(), 4);
    assert_eq!(Rank::Jack.points(), 3);
    assert_eq!(Rank::Queen.points(), 2);
    for rank in [Rank::Six, Rank::Five, Rank::Four, Rank::Three, Rank::Two] {
        assert_eq!(rank.points(), 0);
    }
}

#[test]
fn rank_order_is_strictly_decreasing_strength() {
    // RANKS is listed strongest-first; order() must agree.
    for pair in RANKS.windows(2) {
        assert!(pair[0].order() < pair[1].order());
    }
    assert_eq!(Rank::Ace.order(), 0);
    assert_eq!(Rank::Seven.order(), 1);
    assert_eq!(Rank::Two.order(), 9);
}

#[test]
fn card_tokens_round_trip() {
    for original in full_deck() {
        let token = original.to_string();
        assert_eq!(token.len(), 2);
        let parsed: Card = token.parse().unwrap();
        assert_eq!(parsed, original);
    }
    assert_eq!(card("7H").to_string(), "7H");
    assert_eq!(card("AS").rank, Rank::Ace);
    assert_eq!(card("AS").suit, Suit::Spades);
}

#[test]
fn malformed_tokens_are_rejected() {
    for bad in ["", "7", "7X", "XH", "10H", "7HH", "h7"] {
        assert!(bad.parse::<Card>().is_err(), "accepted {bad:?}");
    }
}

#[test]
fn card_and_suit_wire_forms() {
    assert_eq!(serde_json::to_string(&card("7H")).unwrap(), r#""7H""#);
    assert_eq!(
        serde_json::from_str::<Card>(r#""AS""#).unwrap(),
        card("AS")
    );
    assert!(serde_json::from_str::<Card>(r#""8H""#).is_err());

    assert_eq!(serde_json::to_string(&Suit::Hearts).unwrap(), r#""hearts""#);
    assert_eq!(
        serde_json::from_str::<Suit>(r#""spades""#).unwrap(),
        Suit::Spades
    );
}

#[test]
fn trump_is_the_last_card_drawn() {
    let mut deck = Deck::shuffled(&mut ChaCha20Rng::seed_from_u64(3));
    let trump = deck.trump_card();

    let mut last = None;
    while let Some(drawn) = deck.draw() {
        last = Some(drawn);
    }
    assert_eq!(last, Some(trump));
    assert!(deck.is_exhausted());
    assert_eq!(deck.undealt_points(), 0);
    // The trump stays readable after the stock is exhausted.
    assert_eq!(deck.trump_card(), trump);
}

#[test]
fn shuffle_is_a_permutation_and_seed_deterministic() {
    let mut deck_a = Deck::shuffled(&mut ChaCha20Rng::seed_from_u64(9));
    let mut deck_b = Deck::shuffled(&mut ChaCha20Rng::seed_from_u64(9));

    let mut drawn = Vec::new();
    while let (Some(a), Some(b)) = (deck_a.draw(), deck_b.draw()) {
        assert_eq!(a, b);
        drawn.push(a);
    }
    assert_eq!(drawn.len(), 40);

    let mut sorted = drawn.clone();
    sorted.sort();
    let mut reference = full_deck();
    reference.sort();
    assert_eq!(sorted, reference);
}
