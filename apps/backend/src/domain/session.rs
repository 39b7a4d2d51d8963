//! Authoritative per-game state machine.
//!
//! One `GameSession` is one hand of Bisca: deal, alternating card plays,
//! inline round resolution, a settle step (table clear + replacement
//! draws), and either a normal end or a resignation. Every mutation either
//! completes or returns a `DomainError` with zero state change.
//!
//! The session never sleeps: resolving a round leaves it in
//! `RoundResolving` and the transport decides when to call
//! `settle_round`, so tests drive transitions without wall clocks.

use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};

use crate::domain::cards::{Card, Suit};
use crate::domain::deck::Deck;
use crate::domain::tricks::{legal_cards, trick_winner};
use crate::errors::domain::{DomainError, IllegalMoveKind};

/// Player position within a session. All per-player state is seat-indexed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    pub fn other(self) -> Seat {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }
}

// Seats travel on the wire as 1 / 2.
impl Serialize for Seat {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(match self {
            Seat::One => 1,
            Seat::Two => 2,
        })
    }
}

impl<'de> Deserialize<'de> for Seat {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match u8::deserialize(deserializer)? {
            1 => Ok(Seat::One),
            2 => Ok(Seat::Two),
            n => Err(serde::de::Error::custom(format!("Invalid seat: {n}"))),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionStatus {
    InProgress,
    RoundResolving,
    Ended,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    Win(Seat),
    Draw,
    Resigned(Seat),
}

/// Terminal record of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResult {
    pub outcome: Outcome,
    pub scores: [u8; 2],
}

impl SessionResult {
    /// Winning seat, if any (the opponent for a resignation).
    pub fn winner(&self) -> Option<Seat> {
        match self.outcome {
            Outcome::Win(seat) => Some(seat),
            Outcome::Draw => None,
            Outcome::Resigned(seat) => Some(seat.other()),
        }
    }
}

/// What a successful `play_card` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// First card of the round is down; the other seat is on turn.
    Played { next_turn: Seat },
    /// Both cards are down; the round was scored and the session is in
    /// `RoundResolving` until `settle_round` is called.
    RoundResolved { winner: Seat, round_points: u8 },
}

/// What `settle_round` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Table cleared, replacements drawn; the round winner leads.
    NextRound { leader: Seat },
    /// Both hands ran out; the session ended normally.
    GameEnded(SessionResult),
}

#[derive(Debug, Clone)]
pub struct GameSession {
    hands: [Vec<Card>; 2],
    table: [Option<Card>; 2],
    turn: Seat,
    round_starter: Seat,
    deck: Deck,
    trump_card: Card,
    scores: [u8; 2],
    rounds_completed: u32,
    status: SessionStatus,
    /// Winner of the round currently resolving; present only while
    /// status is `RoundResolving`.
    round_winner: Option<Seat>,
    result: Option<SessionResult>,
}

impl GameSession {
    /// Shuffle and deal a fresh session. The last stock card is the trump;
    /// `hand_size` cards go to each seat (3 or 9, the two variants); the
    /// opening turn is a fair coin flip.
    pub fn deal(rng: &mut impl Rng, hand_size: usize) -> Self {
        let deck = Deck::shuffled(rng);
        let first = if rng.random_bool(0.5) {
            Seat::One
        } else {
            Seat::Two
        };
        Self::deal_from_deck(deck, hand_size, first)
    }

    /// Deal from a prepared deck. Seat One's hand comes off the top,
    /// then seat Two's.
    pub(crate) fn deal_from_deck(mut deck: Deck, hand_size: usize, first: Seat) -> Self {
        let trump_card = deck.trump_card();
        let mut hands: [Vec<Card>; 2] = [Vec::with_capacity(9), Vec::with_capacity(9)];
        for hand in hands.iter_mut() {
            for _ in 0..hand_size {
                if let Some(card) = deck.draw() {
                    hand.push(card);
                }
            }
        }
        Self {
            hands,
            table: [None, None],
            turn: first,
            round_starter: first,
            deck,
            trump_card,
            scores: [0, 0],
            rounds_completed: 0,
            status: SessionStatus::InProgress,
            round_winner: None,
            result: None,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn turn(&self) -> Seat {
        self.turn
    }

    pub fn round_starter(&self) -> Seat {
        self.round_starter
    }

    pub fn trump_card(&self) -> Card {
        self.trump_card
    }

    pub fn trump_suit(&self) -> Suit {
        self.trump_card.suit
    }

    pub fn hand(&self, seat: Seat) -> &[Card] {
        &self.hands[seat.index()]
    }

    pub fn table(&self, seat: Seat) -> Option<Card> {
        self.table[seat.index()]
    }

    pub fn scores(&self) -> [u8; 2] {
        self.scores
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// Card led this round: whatever the round starter has on the table.
    pub fn lead_card(&self) -> Option<Card> {
        self.table[self.round_starter.index()]
    }

    /// Playable subset of a seat's hand right now.
    pub fn legal_for(&self, seat: Seat) -> Vec<Card> {
        legal_cards(
            &self.hands[seat.index()],
            self.lead_card(),
            self.deck.is_exhausted(),
        )
    }

    /// Commit a card to the table.
    ///
    /// Rejected with no state change when the session is over, a round is
    /// resolving, it is not `seat`'s turn, the card is not in hand, or
    /// suit-following forbids it. When the second card lands the round is
    /// scored inline and the session parks in `RoundResolving`.
    pub fn play_card(&mut self, seat: Seat, card: Card) -> Result<PlayOutcome, DomainError> {
        match self.status {
            SessionStatus::Ended => {
                return Err(DomainError::illegal_move(
                    IllegalMoveKind::GameOver,
                    "Game is over",
                ))
            }
            SessionStatus::RoundResolving => {
                return Err(DomainError::illegal_move(
                    IllegalMoveKind::RoundResolving,
                    "Round is resolving",
                ))
            }
            SessionStatus::InProgress => {}
        }
        if self.turn != seat {
            return Err(DomainError::illegal_move(
                IllegalMoveKind::OutOfTurn,
                "Out of turn",
            ));
        }
        let hand = &self.hands[seat.index()];
        let Some(pos) = hand.iter().position(|&c| c == card) else {
            return Err(DomainError::illegal_move(
                IllegalMoveKind::CardNotInHand,
                format!("Card {card} not in hand"),
            ));
        };
        if !self.legal_for(seat).contains(&card) {
            return Err(DomainError::illegal_move(
                IllegalMoveKind::MustFollowSuit,
                "Must follow suit",
            ));
        }

        let played = self.hands[seat.index()].remove(pos);
        self.table[seat.index()] = Some(played);

        let (Some(c1), Some(c2)) = (self.table[0], self.table[1]) else {
            self.turn = seat.other();
            return Ok(PlayOutcome::Played {
                next_turn: self.turn,
            });
        };

        // Both cards down: score the round inline, clear the table later.
        let winner = trick_winner(c1, c2, self.trump_suit(), self.round_starter);
        let round_points = c1.points() + c2.points();
        self.scores[winner.index()] += round_points;
        self.rounds_completed += 1;
        self.status = SessionStatus::RoundResolving;
        self.round_winner = Some(winner);
        Ok(PlayOutcome::RoundResolved {
            winner,
            round_points,
        })
    }

    /// Finish a resolved round: clear the table, draw replacements (winner
    /// first, then loser, while the stock lasts) and hand the lead to the
    /// winner. Ends the session when both hands are empty.
    pub fn settle_round(&mut self) -> Result<SettleOutcome, DomainError> {
        if self.status != SessionStatus::RoundResolving {
            return Err(DomainError::illegal_move(
                IllegalMoveKind::RoundResolving,
                "No round to settle",
            ));
        }
        let winner = self.round_winner.take().ok_or_else(|| {
            DomainError::illegal_move(IllegalMoveKind::RoundResolving, "No round winner recorded")
        })?;

        self.table = [None, None];
        for seat in [winner, winner.other()] {
            if let Some(card) = self.deck.draw() {
                self.hands[seat.index()].push(card);
            }
        }
        self.turn = winner;
        self.round_starter = winner;

        if self.hands[0].is_empty() && self.hands[1].is_empty() {
            let result = self.end_normal();
            return Ok(SettleOutcome::GameEnded(result));
        }
        self.status = SessionStatus::InProgress;
        Ok(SettleOutcome::NextRound { leader: winner })
    }

    fn end_normal(&mut self) -> SessionResult {
        let outcome = match self.scores[0].cmp(&self.scores[1]) {
            std::cmp::Ordering::Greater => Outcome::Win(Seat::One),
            std::cmp::Ordering::Less => Outcome::Win(Seat::Two),
            std::cmp::Ordering::Equal => Outcome::Draw,
        };
        let result = SessionResult {
            outcome,
            scores: self.scores,
        };
        self.status = SessionStatus::Ended;
        self.result = Some(result.clone());
        result
    }

    /// Forfeit the session. Every point still held in both hands plus the
    /// undealt stock goes to the opponent; a card already committed to an
    /// unresolved trick counts for neither side.
    pub fn resign(&mut self, seat: Seat) -> Result<SessionResult, DomainError> {
        if self.status == SessionStatus::Ended {
            return Err(DomainError::illegal_move(
                IllegalMoveKind::GameOver,
                "Game is over",
            ));
        }
        let forfeited: u8 = self
            .hands
            .iter()
            .flatten()
            .map(|c| c.points())
            .sum::<u8>()
            + self.deck.undealt_points();
        let opponent = seat.other();
        self.scores[opponent.index()] += forfeited;

        self.hands = [Vec::new(), Vec::new()];
        self.table = [None, None];
        self.deck.exhaust();
        self.round_winner = None;
        self.status = SessionStatus::Ended;
        let result = SessionResult {
            outcome: Outcome::Resigned(seat),
            scores: self.scores,
        };
        self.result = Some(result.clone());
        Ok(result)
    }
}
