#![cfg(test)]

use crate::domain::matches::{MatchState, MatchStatus, MARKS_TO_WIN};
use crate::domain::scoring::{marks_for_points, payout, WinKind};
use crate::domain::session::{Outcome, Seat, SessionResult};

fn win(scores: [u8; 2]) -> SessionResult {
    let outcome = match scores[0].cmp(&scores[1]) {
        std::cmp::Ordering::Greater => Outcome::Win(Seat::One),
        std::cmp::Ordering::Less => Outcome::Win(Seat::Two),
        std::cmp::Ordering::Equal => Outcome::Draw,
    };
    SessionResult { outcome, scores }
}

#[test]
fn stake_bounds_are_inclusive() {
    assert!(MatchState::new(2).is_err());
    assert!(MatchState::new(3).is_ok());
    assert!(MatchState::new(100).is_ok());
    assert!(MatchState::new(101).is_err());
}

#[test]
fn marks_scale_with_the_margin_of_victory() {
    assert_eq!(marks_for_points(60), 0);
    assert_eq!(marks_for_points(61), 1);
    assert_eq!(marks_for_points(90), 1);
    assert_eq!(marks_for_points(91), 2);
    assert_eq!(marks_for_points(119), 2);
    assert_eq!(marks_for_points(120), 4);

    assert_eq!(WinKind::classify(120), WinKind::Bandeira);
    assert_eq!(WinKind::classify(100), WinKind::Capote);
    assert_eq!(WinKind::classify(65), WinKind::Plain);
}

#[test]
fn games_accumulate_marks_points_and_history() {
    let mut m = MatchState::new(10).unwrap();
    m.begin().unwrap();
    assert_eq!(m.status(), MatchStatus::Playing);

    let record = m.record_game(1, &win([65, 55])).unwrap();
    assert_eq!(record.marks_awarded, 1);
    assert_eq!(record.winner, Some(Seat::One));
    assert_eq!(m.marks(), [1, 0]);

    m.record_game(2, &win([25, 95])).unwrap();
    assert_eq!(m.marks(), [1, 2]);
    assert_eq!(m.total_points(), [90, 150]);
    assert_eq!(m.history().len(), 2);
    assert!(!m.is_over());

    // 61 is the narrowest possible win, worth a single mark.
    let record = m.record_game(3, &win([59, 61])).unwrap();
    assert_eq!(record.marks_awarded, 1);
    assert_eq!(m.marks(), [1, 3]);
}

#[test]
fn draws_award_nothing() {
    let mut m = MatchState::new(5).unwrap();
    m.begin().unwrap();
    let record = m.record_game(1, &win([60, 60])).unwrap();
    assert!(record.is_draw);
    assert_eq!(record.marks_awarded, 0);
    assert_eq!(m.marks(), [0, 0]);
    assert_eq!(m.total_points(), [60, 60]);
}

#[test]
fn bandeira_ends_the_match_from_zero() {
    let mut m = MatchState::new(7).unwrap();
    m.begin().unwrap();
    m.record_game(1, &win([120, 0])).unwrap();
    assert!(m.is_over());
    assert_eq!(m.marks(), [MARKS_TO_WIN, 0]);
    assert_eq!(m.winner(), Some(Seat::One));
    assert_eq!(m.loser(), Some(Seat::Two));
    assert_eq!(m.payout(), Some(13));

    // No further games and no second payout.
    assert!(m.record_game(2, &win([65, 55])).is_err());
    assert!(m.begin().is_err());
    assert_eq!(m.payout(), Some(13));
}

#[test]
fn marks_cap_at_four_even_on_a_capote_finish() {
    let mut m = MatchState::new(5).unwrap();
    m.begin().unwrap();
    m.record_game(1, &win([25, 95])).unwrap();
    m.record_game(2, &win([10, 110])).unwrap();
    assert!(m.is_over());
    assert_eq!(m.marks(), [0, MARKS_TO_WIN]);
    assert_eq!(m.winner(), Some(Seat::Two));
}

#[test]
fn resigned_session_credits_the_opponent() {
    let mut m = MatchState::new(5).unwrap();
    m.begin().unwrap();
    let result = SessionResult {
        outcome: Outcome::Resigned(Seat::One),
        scores: [10, 110],
    };
    let record = m.record_game(1, &result).unwrap();
    assert_eq!(record.winner, Some(Seat::Two));
    assert_eq!(record.marks_awarded, 2);
    assert_eq!(m.marks(), [0, 2]);
}

#[test]
fn forfeit_is_an_instant_four_nil() {
    let mut m = MatchState::new(5).unwrap();
    m.begin().unwrap();
    m.record_game(1, &win([65, 55])).unwrap();
    m.record_game(2, &win([25, 95])).unwrap();
    assert_eq!(m.marks(), [1, 2]);

    m.forfeit(Seat::One).unwrap();
    assert!(m.is_over());
    assert_eq!(m.marks(), [0, MARKS_TO_WIN]);
    assert_eq!(m.winner(), Some(Seat::Two));
    assert_eq!(m.payout(), Some(9));

    assert!(m.forfeit(Seat::Two).is_err());
    assert_eq!(m.winner(), Some(Seat::Two));
}

#[test]
fn payout_is_both_stakes_minus_commission() {
    assert_eq!(payout(3), 5);
    assert_eq!(payout(5), 9);
    assert_eq!(payout(100), 199);
}
