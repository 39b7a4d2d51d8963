//! Practice-opponent card choice.
//!
//! Pure strategy over the session state: leading, play the lowest-point
//! non-trump legal card; following, play the weakest legal card that still
//! wins the trick, otherwise dump the lowest-point legal card.

use crate::domain::cards::Card;
use crate::domain::session::{GameSession, Seat};
use crate::domain::tricks::trick_winner;

pub fn choose_card(session: &GameSession, seat: Seat) -> Option<Card> {
    let legal = session.legal_for(seat);
    if legal.is_empty() {
        return None;
    }

    let Some(lead) = session.lead_card() else {
        // Leading: cheapest non-trump if one exists.
        let trump = session.trump_suit();
        let non_trump: Vec<Card> = legal
            .iter()
            .copied()
            .filter(|c| c.suit != trump)
            .collect();
        let pool = if non_trump.is_empty() { &legal } else { &non_trump };
        return lowest_points(pool);
    };

    let wins = |candidate: Card| {
        let winner = match seat {
            Seat::One => trick_winner(
                candidate,
                lead,
                session.trump_suit(),
                session.round_starter(),
            ),
            Seat::Two => trick_winner(
                lead,
                candidate,
                session.trump_suit(),
                session.round_starter(),
            ),
        };
        winner == seat
    };

    let winning: Vec<Card> = legal.iter().copied().filter(|&c| wins(c)).collect();
    if winning.is_empty() {
        lowest_points(&legal)
    } else {
        // Weakest card that still takes the trick.
        winning.into_iter().max_by_key(|c| c.rank.order())
    }
}

fn lowest_points(cards: &[Card]) -> Option<Card> {
    cards
        .iter()
        .copied()
        .min_by_key(|c| (c.points(), c.rank.order()))
}
