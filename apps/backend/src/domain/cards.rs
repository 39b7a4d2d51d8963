//! Core card types for the Bisca deck: Suit, Rank, Card.
//!
//! A Bisca deck has 40 cards (no 8/9/10). Point values over the full deck
//! sum to 120; in-suit strength is A > 7 > K > J > Q > 6 > 5 > 4 > 3 > 2.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::domain::{DomainError, InvalidActionKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

pub const SUITS: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

/// Ranks listed strongest-first, matching Bisca's in-suit order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Rank {
    Ace,
    Seven,
    King,
    Jack,
    Queen,
    Six,
    Five,
    Four,
    Three,
    Two,
}

pub const RANKS: [Rank; 10] = [
    Rank::Ace,
    Rank::Seven,
    Rank::King,
    Rank::Jack,
    Rank::Queen,
    Rank::Six,
    Rank::Five,
    Rank::Four,
    Rank::Three,
    Rank::Two,
];

impl Rank {
    /// Trick points the card is worth when captured.
    pub fn points(self) -> u8 {
        match self {
            Rank::Ace => 11,
            Rank::Seven => 10,
            Rank::King => 4,
            Rank::Jack => 3,
            Rank::Queen => 2,
            Rank::Six | Rank::Five | Rank::Four | Rank::Three | Rank::Two => 0,
        }
    }

    /// In-suit strength order; lower is stronger (Ace = 0 .. Two = 9).
    pub fn order(self) -> u8 {
        match self {
            Rank::Ace => 0,
            Rank::Seven => 1,
            Rank::King => 2,
            Rank::Jack => 3,
            Rank::Queen => 4,
            Rank::Six => 5,
            Rank::Five => 6,
            Rank::Four => 7,
            Rank::Three => 8,
            Rank::Two => 9,
        }
    }

    fn token(self) -> char {
        match self {
            Rank::Ace => 'A',
            Rank::Seven => '7',
            Rank::King => 'K',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::Six => '6',
            Rank::Five => '5',
            Rank::Four => '4',
            Rank::Three => '3',
            Rank::Two => '2',
        }
    }
}

impl Suit {
    fn token(self) -> char {
        match self {
            Suit::Hearts => 'H',
            Suit::Diamonds => 'D',
            Suit::Clubs => 'C',
            Suit::Spades => 'S',
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub fn points(self) -> u8 {
        self.rank.points()
    }
}

// Note: Ord on Card is only for stable sorting (suit then strength order).
// Trick resolution goes through tricks::trick_winner, never through Ord.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.suit.cmp(&other.suit) {
            std::cmp::Ordering::Equal => self.rank.order().cmp(&other.rank.order()),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// The canonical 40-card set, one card per (suit, rank) pair.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(40);
    for suit in SUITS {
        for rank in RANKS {
            deck.push(Card { suit, rank });
        }
    }
    deck
}

// Suit serde (lowercase, matching the wire format)
impl Serialize for Suit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        };
        serializer.serialize_str(s)
    }
}

impl<'de> Deserialize<'de> for Suit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "hearts" => Ok(Suit::Hearts),
            "diamonds" => Ok(Suit::Diamonds),
            "clubs" => Ok(Suit::Clubs),
            "spades" => Ok(Suit::Spades),
            _ => Err(serde::de::Error::custom(format!("Invalid suit: {s}"))),
        }
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}{}", self.rank.token(), self.suit.token())
    }
}

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || {
            DomainError::invalid_action(
                InvalidActionKind::Other("ParseCard".into()),
                format!("Parse card: {s}"),
            )
        };
        let mut chars = s.chars();
        let rank_ch = chars.next().ok_or_else(parse_err)?;
        let suit_ch = chars.next().ok_or_else(parse_err)?;
        if chars.next().is_some() {
            return Err(parse_err());
        }
        let rank = match rank_ch {
            'A' => Rank::Ace,
            '7' => Rank::Seven,
            'K' => Rank::King,
            'J' => Rank::Jack,
            'Q' => Rank::Queen,
            '6' => Rank::Six,
            '5' => Rank::Five,
            '4' => Rank::Four,
            '3' => Rank::Three,
            '2' => Rank::Two,
            _ => return Err(parse_err()),
        };
        let suit = match suit_ch {
            'H' => Suit::Hearts,
            'D' => Suit::Diamonds,
            'C' => Suit::Clubs,
            'S' => Suit::Spades,
            _ => return Err(parse_err()),
        };
        Ok(Card { suit, rank })
    }
}

// Card serde (compact 2-character format like "AS", "7H")
impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<Card>()
            .map_err(|e| serde::de::Error::custom(e.to_string()))
    }
}
