//! Domain-level error type used across the game engine and registry.
//!
//! This error type is transport-agnostic. The websocket layer converts it
//! into an `action-rejected` message for the acting connection; nothing in
//! here maps to a fatal failure.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Ways a card play can be refused without touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum IllegalMoveKind {
    OutOfTurn,
    CardNotInHand,
    MustFollowSuit,
    RoundResolving,
    GameOver,
}

/// Lobby/orchestration rule violations, rejected before any mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidActionKind {
    StakeOutOfBounds,
    AlreadyStarted,
    NotStarted,
    NotCreator,
    SeatTaken,
    NoOpponent,
    SelfJoin,
    OfferNotPending,
    NotPendingCandidate,
    OfferNotAccepted,
    BotMatch,
    NotParticipant,
    MatchOver,
    GameStillRunning,
    NotAMatch,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A move that the rules refuse; the session is left untouched
    IllegalMove(IllegalMoveKind, String),
    /// Operation referenced a game id the registry does not know
    GameNotFound(u64),
    /// Business-rule violation at the orchestration boundary
    InvalidAction(InvalidActionKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::IllegalMove(kind, d) => write!(f, "illegal move {kind:?}: {d}"),
            DomainError::GameNotFound(id) => write!(f, "game {id} not found"),
            DomainError::InvalidAction(kind, d) => write!(f, "invalid action {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn illegal_move(kind: IllegalMoveKind, detail: impl Into<String>) -> Self {
        Self::IllegalMove(kind, detail.into())
    }
    pub fn game_not_found(id: u64) -> Self {
        Self::GameNotFound(id)
    }
    pub fn invalid_action(kind: InvalidActionKind, detail: impl Into<String>) -> Self {
        Self::InvalidAction(kind, detail.into())
    }
}
