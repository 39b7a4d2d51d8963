#![cfg(test)]

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::domain::fixtures::{card, rigged_session};
use crate::domain::session::{
    GameSession, Outcome, PlayOutcome, Seat, SessionStatus, SettleOutcome,
};
use crate::errors::domain::{DomainError, IllegalMoveKind};

fn assert_illegal(result: Result<PlayOutcome, DomainError>, kind: IllegalMoveKind) {
    match result {
        Err(DomainError::IllegalMove(k, _)) => assert_eq!(k, kind),
        other => panic!("expected IllegalMove({kind:?}), got {other:?}"),
    }
}

#[test]
fn deal_invariants_for_both_variants() {
    for (hand_size, remaining) in [(3, 34), (9, 22)] {
        let session = GameSession::deal(&mut ChaCha20Rng::seed_from_u64(11), hand_size);
        assert_eq!(session.hand(Seat::One).len(), hand_size);
        assert_eq!(session.hand(Seat::Two).len(), hand_size);
        assert_eq!(session.deck_remaining(), remaining);
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.scores(), [0, 0]);
        assert_eq!(session.turn(), session.round_starter());
        assert_eq!(session.trump_suit(), session.trump_card().suit);
    }
}

#[test]
fn opening_turn_is_a_coin_flip() {
    let mut seen = [false, false];
    for seed in 0..64 {
        let session = GameSession::deal(&mut ChaCha20Rng::seed_from_u64(seed), 3);
        seen[session.turn().index()] = true;
    }
    assert_eq!(seen, [true, true]);
}

#[test]
fn out_of_turn_and_foreign_cards_are_rejected() {
    let mut session = rigged_session(
        &["AH", "2C", "3C"],
        &["KH", "2D", "3D"],
        &["4C", "5C", "6C"],
        "2S",
        Seat::One,
    );
    assert_illegal(
        session.play_card(Seat::Two, card("KH")),
        IllegalMoveKind::OutOfTurn,
    );
    // A card from the opponent's hand.
    assert_illegal(
        session.play_card(Seat::One, card("KH")),
        IllegalMoveKind::CardNotInHand,
    );
    // Nothing changed.
    assert_eq!(session.hand(Seat::One).len(), 3);
    assert_eq!(session.turn(), Seat::One);
}

#[test]
fn round_resolves_inline_and_settles_winner_first() {
    let mut session = rigged_session(
        &["AH", "2C", "3C"],
        &["KH", "2D", "3D"],
        &["4C", "5C", "6C"],
        "2S",
        Seat::One,
    );

    let outcome = session.play_card(Seat::One, card("AH")).unwrap();
    assert_eq!(
        outcome,
        PlayOutcome::Played {
            next_turn: Seat::Two
        }
    );
    assert_eq!(session.lead_card(), Some(card("AH")));

    let outcome = session.play_card(Seat::Two, card("KH")).unwrap();
    assert_eq!(
        outcome,
        PlayOutcome::RoundResolved {
            winner: Seat::One,
            round_points: 15,
        }
    );
    // Scored inline; the session parks until the settle step.
    assert_eq!(session.scores(), [15, 0]);
    assert_eq!(session.status(), SessionStatus::RoundResolving);
    assert_eq!(session.rounds_completed(), 1);
    assert_illegal(
        session.play_card(Seat::One, card("2C")),
        IllegalMoveKind::RoundResolving,
    );

    let outcome = session.settle_round().unwrap();
    assert_eq!(outcome, SettleOutcome::NextRound { leader: Seat::One });
    // Winner draws first: 4C to seat One, 5C to seat Two.
    assert!(session.hand(Seat::One).contains(&card("4C")));
    assert!(session.hand(Seat::Two).contains(&card("5C")));
    assert_eq!(session.turn(), Seat::One);
    assert_eq!(session.table(Seat::One), None);
    assert_eq!(session.table(Seat::Two), None);

    // No second settle for the same round.
    assert!(session.settle_round().is_err());
}

#[test]
fn trump_takes_a_led_seven_for_twenty_one_points() {
    let mut session = rigged_session(
        &["7H", "2D", "3D"],
        &["AS", "2C", "3C"],
        &["4C", "5C", "6C"],
        "KS",
        Seat::One,
    );

    session.play_card(Seat::One, card("7H")).unwrap();
    let outcome = session.play_card(Seat::Two, card("AS")).unwrap();
    assert_eq!(
        outcome,
        PlayOutcome::RoundResolved {
            winner: Seat::Two,
            round_points: 21,
        }
    );
    assert_eq!(session.scores(), [0, 21]);
}

#[test]
fn suit_following_binds_only_after_the_stock_runs_out() {
    // Two-card hands, no middle: the trump is the only undealt card.
    let mut session = rigged_session(&["AH", "2D"], &["7H", "KD"], &[], "4S", Seat::One);

    // Stock not exhausted: seat Two may answer AH with an off-suit card,
    // but plays 7H here to keep the example deterministic.
    session.play_card(Seat::One, card("AH")).unwrap();
    session.play_card(Seat::Two, card("7H")).unwrap();
    session.settle_round().unwrap();

    // Seat One won 21 points and drew the trump; the stock is now empty.
    assert_eq!(session.scores(), [21, 0]);
    assert_eq!(session.deck_remaining(), 0);
    assert_eq!(session.hand(Seat::One).len(), 2);
    assert_eq!(session.hand(Seat::Two).len(), 1);

    session.play_card(Seat::One, card("2D")).unwrap();
    // Seat Two holds KD and must follow diamonds.
    assert_eq!(session.legal_for(Seat::Two), vec![card("KD")]);
}

#[test]
fn full_playout_accounts_for_every_point() {
    for seed in [1u64, 42, 1234] {
        let mut session = GameSession::deal(&mut ChaCha20Rng::seed_from_u64(seed), 3);
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
        let result = session.result().unwrap();
        assert_eq!(
            u32::from(result.scores[0]) + u32::from(result.scores[1]),
            120
        );
        assert_eq!(session.rounds_completed(), 20);
        assert_eq!(session.deck_remaining(), 0);
        match result.outcome {
            Outcome::Win(seat) => {
                assert!(result.scores[seat.index()] > result.scores[seat.other().index()]);
            }
            Outcome::Draw => assert_eq!(result.scores, [60, 60]),
            Outcome::Resigned(_) => panic!("nobody resigned"),
        }
    }
}

#[test]
fn resignation_awards_hands_and_stock_to_the_opponent() {
    let mut session = rigged_session(
        &["AH", "7D", "KC"],
        &["2H", "2D", "2C"],
        &["7H"],
        "AS",
        Seat::One,
    );

    // Hands hold 25 + 0 points; the stock holds 7H + AS = 21.
    let result = session.resign(Seat::One).unwrap();
    assert_eq!(result.outcome, Outcome::Resigned(Seat::One));
    assert_eq!(result.scores, [0, 46]);
    assert_eq!(session.status(), SessionStatus::Ended);
    assert!(session.hand(Seat::One).is_empty());
    assert_eq!(session.deck_remaining(), 0);

    assert_illegal(
        session.play_card(Seat::Two, card("2H")),
        IllegalMoveKind::GameOver,
    );
    assert!(session.resign(Seat::Two).is_err());
}

#[test]
fn card_committed_to_an_unresolved_trick_is_lost_on_resignation() {
    let mut session = rigged_session(
        &["AH", "7D", "KC"],
        &["2H", "2D", "2C"],
        &["7H"],
        "AS",
        Seat::One,
    );
    session.play_card(Seat::One, card("AH")).unwrap();

    // AH is on the table and counts for neither side.
    let result = session.resign(Seat::One).unwrap();
    assert_eq!(result.scores, [0, 35]);
}
