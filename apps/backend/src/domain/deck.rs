//! Shuffled stock of undealt cards with a draw cursor.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::cards::{full_deck, Card};

/// The 40 cards of a session in shuffled order. Cards at or after `next`
/// are face-down and undealt; the last card of the stock is the trump.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    next: usize,
}

impl Deck {
    /// Fisher-Yates shuffle of the full 40-card set.
    pub fn shuffled(rng: &mut impl Rng) -> Self {
        let mut cards = full_deck();
        cards.shuffle(rng);
        Self { cards, next: 0 }
    }

    /// Build a deck from an explicit card order (rigged decks in tests).
    /// The stock must not be empty: its last card is the trump.
    pub(crate) fn from_cards(cards: Vec<Card>) -> Self {
        debug_assert!(!cards.is_empty(), "a stock carries at least the trump");
        Self { cards, next: 0 }
    }

    /// The trump card: last card of the stock, drawn last. Both
    /// constructors guarantee a non-empty stock.
    pub fn trump_card(&self) -> Card {
        self.cards[self.cards.len() - 1]
    }

    /// Next undealt card, advancing the cursor.
    pub fn draw(&mut self) -> Option<Card> {
        let card = self.cards.get(self.next).copied()?;
        self.next += 1;
        Some(card)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.next
    }

    pub fn is_exhausted(&self) -> bool {
        self.next >= self.cards.len()
    }

    /// Face value still sitting in the stock (resignation accounting).
    pub fn undealt_points(&self) -> u8 {
        self.cards[self.next..].iter().map(|c| c.points()).sum()
    }

    /// Advance the cursor past every remaining card (resignation cleanup).
    pub fn exhaust(&mut self) {
        self.next = self.cards.len();
    }
}
