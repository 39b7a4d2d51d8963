//! Persistence-collaborator seam.
//!
//! The REST/economy side of the platform is an external collaborator; the
//! engine only reports through this trait and never waits on it. Calls are
//! dispatched fire-and-forget with `tokio::spawn`, so a slow or failing
//! recorder cannot stall play. The in-memory session is the authority,
//! not the persisted copy.

use async_trait::async_trait;
use tracing::info;

use crate::domain::matches::GameRecord;
use crate::domain::scoring::WinKind;
use crate::domain::session::{Seat, SessionResult};
use crate::services::registry::{GameId, GameVariant, UserId};

#[async_trait]
pub trait HistoryRecorder: Send + Sync {
    /// A session was dealt. May return a durable id, which the engine
    /// stores on the entry for the follow-up reports.
    async fn game_started(
        &self,
        game_id: GameId,
        variant: GameVariant,
        players: [UserId; 2],
        is_match: bool,
        stake: u32,
    ) -> Option<i64>;

    /// Final scores, winner and resignation flag of one session.
    async fn game_finished(
        &self,
        game_id: GameId,
        db_id: Option<i64>,
        result: SessionResult,
        win_kind: Option<WinKind>,
    );

    /// Updated marks/points after every constituent match game.
    async fn match_game_recorded(
        &self,
        game_id: GameId,
        db_id: Option<i64>,
        record: GameRecord,
        marks: [u8; 2],
        total_points: [u32; 2],
    );

    /// Terminal match report: winner and the exactly-once payout.
    async fn match_finished(&self, game_id: GameId, db_id: Option<i64>, winner: Seat, payout: u32);
}

/// Default recorder: structured log lines only.
#[derive(Debug, Default)]
pub struct LogRecorder;

#[async_trait]
impl HistoryRecorder for LogRecorder {
    async fn game_started(
        &self,
        game_id: GameId,
        variant: GameVariant,
        players: [UserId; 2],
        is_match: bool,
        stake: u32,
    ) -> Option<i64> {
        info!(
            game_id,
            hand_size = variant.hand_size(),
            player1 = players[0],
            player2 = players[1],
            is_match,
            stake,
            "[HISTORY] game started"
        );
        None
    }

    async fn game_finished(
        &self,
        game_id: GameId,
        db_id: Option<i64>,
        result: SessionResult,
        win_kind: Option<WinKind>,
    ) {
        info!(
            game_id,
            ?db_id,
            outcome = ?result.outcome,
            score1 = result.scores[0],
            score2 = result.scores[1],
            ?win_kind,
            "[HISTORY] game finished"
        );
    }

    async fn match_game_recorded(
        &self,
        game_id: GameId,
        db_id: Option<i64>,
        record: GameRecord,
        marks: [u8; 2],
        total_points: [u32; 2],
    ) {
        info!(
            game_id,
            ?db_id,
            game_number = record.game_number,
            marks_awarded = record.marks_awarded,
            marks1 = marks[0],
            marks2 = marks[1],
            points1 = total_points[0],
            points2 = total_points[1],
            "[HISTORY] match game recorded"
        );
    }

    async fn match_finished(&self, game_id: GameId, db_id: Option<i64>, winner: Seat, payout: u32) {
        info!(
            game_id,
            ?db_id,
            ?winner,
            payout,
            "[HISTORY] match finished"
        );
    }
}
