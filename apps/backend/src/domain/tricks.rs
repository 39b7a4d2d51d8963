//! Trick resolution and suit-following legality.
//!
//! This is the single authoritative rule engine; anything a client shows
//! as a prediction is re-validated here.

use crate::domain::cards::{Card, Suit};
use crate::domain::session::Seat;

/// Decide the winner of a completed trick.
///
/// `card1` was played by seat One, `card2` by seat Two. Same suit: the
/// stronger rank (lower order) wins. Different suits: trump wins; with no
/// trump involved the round starter wins on lead dominance, not on rank.
pub fn trick_winner(card1: Card, card2: Card, trump: Suit, round_starter: Seat) -> Seat {
    if card1.suit == card2.suit {
        return if card1.rank.order() < card2.rank.order() {
            Seat::One
        } else {
            Seat::Two
        };
    }
    if card1.suit == trump {
        return Seat::One;
    }
    if card2.suit == trump {
        return Seat::Two;
    }
    round_starter
}

/// Compute the playable subset of a hand.
///
/// While the stock still has undealt cards, or before a lead card is on the
/// table, every card is legal. Once the stock is exhausted the hand must
/// follow the lead suit whenever it can. The switch happens exactly once
/// per session, when the trump (last stock card) is drawn.
pub fn legal_cards(hand: &[Card], lead: Option<Card>, deck_exhausted: bool) -> Vec<Card> {
    let Some(lead) = lead else {
        return hand.to_vec();
    };
    if !deck_exhausted {
        return hand.to_vec();
    }
    let same_suit: Vec<Card> = hand
        .iter()
        .copied()
        .filter(|c| c.suit == lead.suit)
        .collect();
    if same_suit.is_empty() {
        hand.to_vec()
    } else {
        same_suit
    }
}
