#![cfg(test)]

//! Property-based tests over shuffling, trick resolution, legality and
//! whole-session score conservation.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::cards::full_deck;
use crate::domain::deck::Deck;
use crate::domain::scoring::marks_for_points;
use crate::domain::session::{GameSession, Seat, SessionStatus};
use crate::domain::test_gens;
use crate::domain::tricks::{legal_cards, trick_winner};

/// Drive a dealt session to its end, always playing the first legal card.
fn play_out(session: &mut GameSession) {
    while session.status() != SessionStatus::Ended {
        match session.status() {
            SessionStatus::InProgress => {
                let seat = session.turn();
                let card = session.legal_for(seat)[0];
                session.play_card(seat, card).unwrap();
            }
            SessionStatus::RoundResolving => {
                session.settle_round().unwrap();
            }
            SessionStatus::Ended => unreachable!(),
        }
    }
}

proptest! {
    /// Shuffling never loses, duplicates or invents cards.
    #[test]
    fn prop_shuffle_is_a_permutation(seed in any::<u64>()) {
        let mut deck = Deck::shuffled(&mut ChaCha20Rng::seed_from_u64(seed));
        let mut drawn = Vec::new();
        while let Some(card) = deck.draw() {
            drawn.push(card);
        }
        drawn.sort();
        let mut reference = full_deck();
        reference.sort();
        prop_assert_eq!(drawn, reference);
    }

    /// Swapping the two plays of a trick always flips the winner.
    #[test]
    fn prop_trick_winner_flips_with_the_seats(
        (c1, c2) in test_gens::two_distinct_cards(),
        trump in test_gens::suit(),
        starter in test_gens::seat(),
    ) {
        let forward = trick_winner(c1, c2, trump, starter);
        let swapped = trick_winner(c2, c1, trump, starter.other());
        prop_assert_eq!(forward, swapped.other());
    }

    /// A trump card never loses a trick to a non-trump card.
    #[test]
    fn prop_trump_never_loses_off_suit(
        (c1, c2) in test_gens::two_distinct_cards(),
        starter in test_gens::seat(),
    ) {
        prop_assume!(c1.suit != c2.suit);
        prop_assert_eq!(trick_winner(c1, c2, c1.suit, starter), Seat::One);
        prop_assert_eq!(trick_winner(c1, c2, c2.suit, starter), Seat::Two);
    }

    /// The legal subset is never empty, always drawn from the hand, and
    /// in-suit whenever suit-following binds.
    #[test]
    fn prop_legal_cards_is_a_valid_subset(
        hand in test_gens::hand(),
        lead in test_gens::card(),
        exhausted in any::<bool>(),
    ) {
        let legal = legal_cards(&hand, Some(lead), exhausted);
        prop_assert!(!legal.is_empty());
        for card in &legal {
            prop_assert!(hand.contains(card));
        }
        if exhausted && hand.iter().any(|c| c.suit == lead.suit) {
            for card in &legal {
                prop_assert_eq!(card.suit, lead.suit);
            }
        }
    }

    /// Any fully played session accounts for exactly the 120 deck points
    /// across exactly 20 rounds, in both variants.
    #[test]
    fn prop_playout_conserves_every_point(seed in any::<u64>(), nine in any::<bool>()) {
        let hand_size = if nine { 9 } else { 3 };
        let mut session = GameSession::deal(&mut ChaCha20Rng::seed_from_u64(seed), hand_size);
        play_out(&mut session);

        let result = session.result().unwrap();
        prop_assert_eq!(
            u32::from(result.scores[0]) + u32::from(result.scores[1]),
            120
        );
        prop_assert_eq!(session.rounds_completed(), 20);
        prop_assert_eq!(session.deck_remaining(), 0);
    }

    /// Resigning at any point never creates points out of thin air: the
    /// sum stays at most 120, and exactly 120 when no card was stranded
    /// on the table.
    #[test]
    fn prop_resignation_never_inflates_the_score(
        seed in any::<u64>(),
        moves in 0usize..30,
        resigner in test_gens::seat(),
    ) {
        let mut session = GameSession::deal(&mut ChaCha20Rng::seed_from_u64(seed), 3);
        for _ in 0..moves {
            match session.status() {
                SessionStatus::InProgress => {
                    let seat = session.turn();
                    let card = session.legal_for(seat)[0];
                    session.play_card(seat, card).unwrap();
                }
                SessionStatus::RoundResolving => {
                    session.settle_round().unwrap();
                }
                SessionStatus::Ended => break,
            }
        }
        prop_assume!(session.status() != SessionStatus::Ended);

        let stranded = session.table(Seat::One).is_some() || session.table(Seat::Two).is_some();
        let result = session.resign(resigner).unwrap();
        let sum = u32::from(result.scores[0]) + u32::from(result.scores[1]);
        if stranded {
            prop_assert!(sum < 120);
        } else {
            prop_assert_eq!(sum, 120);
        }
    }

    /// Marks are always one of 0, 1, 2 or 4, and never decrease as the
    /// winning margin grows.
    #[test]
    fn prop_marks_scale_monotonically(points in 0u8..=120) {
        let marks = marks_for_points(points);
        prop_assert!(matches!(marks, 0 | 1 | 2 | 4));
        if points < 120 {
            prop_assert!(marks_for_points(points + 1) >= marks);
        }
    }
}
