//! Stake-bearing match orchestration over a sequence of game sessions.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::scoring::{marks_for_points, payout};
use crate::domain::session::{Outcome, Seat, SessionResult};
use crate::errors::domain::{DomainError, InvalidActionKind};

pub const MIN_STAKE: u32 = 3;
pub const MAX_STAKE: u32 = 100;

/// Marks needed to take the match.
pub const MARKS_TO_WIN: u8 = 4;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStatus {
    Pending,
    Playing,
    Ended,
}

/// Append-only record of one constituent game.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub game_number: u32,
    pub winner: Option<Seat>,
    pub points: [u8; 2],
    pub is_draw: bool,
    pub marks_awarded: u8,
    #[serde(with = "time::serde::timestamp")]
    pub ended_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct MatchState {
    stake: u32,
    marks: [u8; 2],
    total_points: [u32; 2],
    history: Vec<GameRecord>,
    status: MatchStatus,
    winner: Option<Seat>,
    payout: Option<u32>,
}

impl MatchState {
    /// Validates the stake bounds before any state exists.
    pub fn new(stake: u32) -> Result<Self, DomainError> {
        if !(MIN_STAKE..=MAX_STAKE).contains(&stake) {
            return Err(DomainError::invalid_action(
                InvalidActionKind::StakeOutOfBounds,
                format!("Stake must be within {MIN_STAKE}..={MAX_STAKE}, got {stake}"),
            ));
        }
        Ok(Self {
            stake,
            marks: [0, 0],
            total_points: [0, 0],
            history: Vec::new(),
            status: MatchStatus::Pending,
            winner: None,
            payout: None,
        })
    }

    pub fn stake(&self) -> u32 {
        self.stake
    }

    pub fn marks(&self) -> [u8; 2] {
        self.marks
    }

    pub fn total_points(&self) -> [u32; 2] {
        self.total_points
    }

    pub fn history(&self) -> &[GameRecord] {
        &self.history
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn winner(&self) -> Option<Seat> {
        self.winner
    }

    pub fn loser(&self) -> Option<Seat> {
        self.winner.map(Seat::other)
    }

    pub fn payout(&self) -> Option<u32> {
        self.payout
    }

    pub fn is_over(&self) -> bool {
        self.status == MatchStatus::Ended
    }

    /// Transition to Playing when the first game is dealt. Re-invoking on a
    /// match that already plays is a no-op (duplicate network replay guard).
    pub fn begin(&mut self) -> Result<(), DomainError> {
        match self.status {
            MatchStatus::Pending | MatchStatus::Playing => {
                self.status = MatchStatus::Playing;
                Ok(())
            }
            MatchStatus::Ended => Err(DomainError::invalid_action(
                InvalidActionKind::MatchOver,
                "Match is over",
            )),
        }
    }

    /// Fold a finished game into the match: accumulate both seats' points,
    /// award marks to the winner (none on a draw), append the history
    /// record, and end the match the instant a seat reaches 4 marks.
    pub fn record_game(
        &mut self,
        game_number: u32,
        result: &SessionResult,
    ) -> Result<GameRecord, DomainError> {
        if self.is_over() {
            return Err(DomainError::invalid_action(
                InvalidActionKind::MatchOver,
                "Match is over",
            ));
        }
        self.total_points[0] += u32::from(result.scores[0]);
        self.total_points[1] += u32::from(result.scores[1]);

        let winner = result.winner();
        let marks_awarded = match winner {
            Some(seat) => {
                let marks = marks_for_points(result.scores[seat.index()]);
                self.marks[seat.index()] = (self.marks[seat.index()] + marks).min(MARKS_TO_WIN);
                marks
            }
            None => 0,
        };
        let record = GameRecord {
            game_number,
            winner,
            points: result.scores,
            is_draw: matches!(result.outcome, Outcome::Draw),
            marks_awarded,
            ended_at: OffsetDateTime::now_utc(),
        };
        self.history.push(record.clone());

        if let Some(seat) = winner {
            if self.marks[seat.index()] >= MARKS_TO_WIN {
                self.finish(seat);
            }
        }
        Ok(record)
    }

    /// Instant 4-0 loss for the resigning seat regardless of accumulated
    /// marks; ends the match immediately.
    pub fn forfeit(&mut self, seat: Seat) -> Result<(), DomainError> {
        if self.is_over() {
            return Err(DomainError::invalid_action(
                InvalidActionKind::MatchOver,
                "Match is over",
            ));
        }
        let opponent = seat.other();
        self.marks[seat.index()] = 0;
        self.marks[opponent.index()] = MARKS_TO_WIN;
        self.finish(opponent);
        Ok(())
    }

    // Terminal transition; the payout is computed here and nowhere else.
    fn finish(&mut self, winner: Seat) {
        if self.payout.is_some() {
            return;
        }
        self.winner = Some(winner);
        self.payout = Some(payout(self.stake));
        self.status = MatchStatus::Ended;
    }
}
