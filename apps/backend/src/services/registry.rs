//! In-memory catalogue of lobby entries and their live sessions.
//!
//! Owned by the engine actor and injected into it; there is no ambient
//! global map. Every operation on an unknown id returns
//! `DomainError::GameNotFound` instead of panicking, so callers check
//! before broadcasting.

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::OffsetDateTime;

use crate::domain::matches::MatchState;
use crate::domain::session::{GameSession, Seat, SessionStatus};
use crate::errors::domain::{DomainError, InvalidActionKind};

pub type GameId = u64;
pub type UserId = i64;

/// Reserved identity the practice bot plays under.
pub const BOT_USER_ID: UserId = -1;

/// Initial hand size variant.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GameVariant {
    Bisca3,
    Bisca9,
}

impl GameVariant {
    pub fn hand_size(self) -> usize {
        match self {
            GameVariant::Bisca3 => 3,
            GameVariant::Bisca9 => 9,
        }
    }
}

// Variants travel on the wire as the hand size, 3 / 9.
impl Serialize for GameVariant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.hand_size() as u8)
    }
}

impl<'de> Deserialize<'de> for GameVariant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match u8::deserialize(deserializer)? {
            3 => Ok(GameVariant::Bisca3),
            9 => Ok(GameVariant::Bisca9),
            n => Err(serde::de::Error::custom(format!("Invalid variant: {n}"))),
        }
    }
}

/// Join-offer state for stake matches. Plain games auto-accept.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OfferStatus {
    Open,
    Pending,
    Accepted,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub id: u64,
    pub user_id: UserId,
    pub user_name: String,
    pub message: String,
    #[serde(with = "time::serde::timestamp")]
    pub sent_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct CreateConfig {
    pub variant: GameVariant,
    pub is_match: bool,
    pub stake: u32,
    pub vs_bot: bool,
}

/// One registry row: lobby state plus the live session and match state.
#[derive(Debug)]
pub struct GameEntry {
    pub id: GameId,
    pub variant: GameVariant,
    pub creator: UserId,
    pub players: [Option<UserId>; 2],
    pub pending_joiner: Option<UserId>,
    pub offer: OfferStatus,
    pub vs_bot: bool,
    /// None until the creator starts the first game.
    pub session: Option<GameSession>,
    pub match_state: Option<MatchState>,
    pub game_number: u32,
    pub chat: Vec<ChatMessage>,
    /// Durable id reported back by the persistence collaborator.
    pub db_id: Option<i64>,
    pub ended_at: Option<OffsetDateTime>,
}

impl GameEntry {
    pub fn is_match(&self) -> bool {
        self.match_state.is_some()
    }

    pub fn stake(&self) -> u32 {
        self.match_state.as_ref().map_or(0, |m| m.stake())
    }

    pub fn started(&self) -> bool {
        self.session.is_some()
    }

    /// Seat a user occupies in this entry, if any.
    pub fn seat_of(&self, user: UserId) -> Option<Seat> {
        if self.players[0] == Some(user) {
            Some(Seat::One)
        } else if self.players[1] == Some(user) {
            Some(Seat::Two)
        } else {
            None
        }
    }

    /// Whether the current session has ended (resigned or played out).
    pub fn session_ended(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.status() == SessionStatus::Ended)
    }
}

#[derive(Debug, Default)]
pub struct GameRegistry {
    entries: HashMap<GameId, GameEntry>,
    next_id: GameId,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: GameId) -> Result<&GameEntry, DomainError> {
        self.entries.get(&id).ok_or(DomainError::GameNotFound(id))
    }

    pub fn get_mut(&mut self, id: GameId) -> Result<&mut GameEntry, DomainError> {
        self.entries
            .get_mut(&id)
            .ok_or(DomainError::GameNotFound(id))
    }

    pub fn entries(&self) -> impl Iterator<Item = &GameEntry> {
        self.entries.values()
    }

    /// Create a lobby entry under a fresh monotonic id. Matches validate
    /// the stake up front and cannot be played against the bot.
    pub fn create(&mut self, config: CreateConfig, creator: UserId) -> Result<GameId, DomainError> {
        let match_state = if config.is_match {
            if config.vs_bot {
                return Err(DomainError::invalid_action(
                    InvalidActionKind::BotMatch,
                    "Stake matches cannot be played against the bot",
                ));
            }
            Some(MatchState::new(config.stake)?)
        } else {
            None
        };

        self.next_id += 1;
        let id = self.next_id;
        let (player2, offer) = if config.vs_bot {
            (Some(BOT_USER_ID), OfferStatus::Accepted)
        } else {
            (None, OfferStatus::Open)
        };
        self.entries.insert(
            id,
            GameEntry {
                id,
                variant: config.variant,
                creator,
                players: [Some(creator), player2],
                pending_joiner: None,
                offer,
                vs_bot: config.vs_bot,
                session: None,
                match_state,
                game_number: 1,
                chat: Vec::new(),
                db_id: None,
                ended_at: None,
            },
        );
        Ok(id)
    }

    /// Join a lobby entry. Plain games seat the candidate immediately
    /// (auto-accept); matches park them as a pending offer that the
    /// creator must accept before the seat is taken.
    pub fn join(&mut self, id: GameId, user: UserId) -> Result<OfferStatus, DomainError> {
        let entry = self.get_mut(id)?;
        if entry.started() {
            return Err(DomainError::invalid_action(
                InvalidActionKind::AlreadyStarted,
                "Game already started",
            ));
        }
        if entry.creator == user {
            return Err(DomainError::invalid_action(
                InvalidActionKind::SelfJoin,
                "Cannot join own game",
            ));
        }
        if entry.players[1].is_some() {
            return Err(DomainError::invalid_action(
                InvalidActionKind::SeatTaken,
                "Seat already taken",
            ));
        }
        if entry.is_match() {
            if entry.pending_joiner.is_some() {
                return Err(DomainError::invalid_action(
                    InvalidActionKind::SeatTaken,
                    "A join offer is already pending",
                ));
            }
            entry.pending_joiner = Some(user);
            entry.offer = OfferStatus::Pending;
            Ok(OfferStatus::Pending)
        } else {
            entry.players[1] = Some(user);
            entry.offer = OfferStatus::Accepted;
            Ok(OfferStatus::Accepted)
        }
    }

    /// Creator accepts the pending candidate, promoting them to seat Two.
    pub fn accept_offer(
        &mut self,
        id: GameId,
        caller: UserId,
        candidate: UserId,
    ) -> Result<(), DomainError> {
        let entry = self.get_mut(id)?;
        if entry.creator != caller {
            return Err(DomainError::invalid_action(
                InvalidActionKind::NotCreator,
                "Only the creator may accept an offer",
            ));
        }
        Self::take_pending(entry, candidate)?;
        entry.players[1] = Some(candidate);
        entry.offer = OfferStatus::Accepted;
        Ok(())
    }

    /// Creator rejects the pending candidate, reopening the entry so a new
    /// join attempt (same or different candidate) can proceed.
    pub fn reject_offer(
        &mut self,
        id: GameId,
        caller: UserId,
        candidate: UserId,
    ) -> Result<(), DomainError> {
        let entry = self.get_mut(id)?;
        if entry.creator != caller {
            return Err(DomainError::invalid_action(
                InvalidActionKind::NotCreator,
                "Only the creator may reject an offer",
            ));
        }
        Self::take_pending(entry, candidate)?;
        entry.offer = OfferStatus::Open;
        Ok(())
    }

    fn take_pending(entry: &mut GameEntry, candidate: UserId) -> Result<(), DomainError> {
        if entry.offer != OfferStatus::Pending {
            return Err(DomainError::invalid_action(
                InvalidActionKind::OfferNotPending,
                "No pending offer",
            ));
        }
        if entry.pending_joiner != Some(candidate) {
            return Err(DomainError::invalid_action(
                InvalidActionKind::NotPendingCandidate,
                "Not the pending candidate",
            ));
        }
        entry.pending_joiner = None;
        Ok(())
    }

    /// Deal the first session. Creator-only; requires seat Two filled and,
    /// for matches, an accepted offer.
    pub fn start(
        &mut self,
        id: GameId,
        caller: UserId,
        rng: &mut impl Rng,
    ) -> Result<(), DomainError> {
        let entry = self.get_mut(id)?;
        if entry.creator != caller {
            return Err(DomainError::invalid_action(
                InvalidActionKind::NotCreator,
                "Only the creator may start the game",
            ));
        }
        if entry.started() {
            return Err(DomainError::invalid_action(
                InvalidActionKind::AlreadyStarted,
                "Game already started",
            ));
        }
        if entry.players[1].is_none() {
            return Err(DomainError::invalid_action(
                InvalidActionKind::NoOpponent,
                "No second player",
            ));
        }
        if let Some(match_state) = entry.match_state.as_mut() {
            if entry.offer != OfferStatus::Accepted {
                return Err(DomainError::invalid_action(
                    InvalidActionKind::OfferNotAccepted,
                    "Offer not accepted",
                ));
            }
            match_state.begin()?;
        }
        entry.session = Some(GameSession::deal(rng, entry.variant.hand_size()));
        Ok(())
    }

    /// Deal the next constituent game of a non-terminal match. A no-op
    /// error when the match is over or the current game still runs.
    pub fn continue_match(&mut self, id: GameId, rng: &mut impl Rng) -> Result<u32, DomainError> {
        let entry = self.get_mut(id)?;
        let Some(match_state) = entry.match_state.as_ref() else {
            return Err(DomainError::invalid_action(
                InvalidActionKind::NotAMatch,
                "Not a match",
            ));
        };
        if match_state.is_over() {
            return Err(DomainError::invalid_action(
                InvalidActionKind::MatchOver,
                "Match is over",
            ));
        }
        if !entry.started() {
            return Err(DomainError::invalid_action(
                InvalidActionKind::NotStarted,
                "Match not started",
            ));
        }
        if !entry.session_ended() {
            return Err(DomainError::invalid_action(
                InvalidActionKind::GameStillRunning,
                "Current game still running",
            ));
        }
        entry.game_number += 1;
        entry.session = Some(GameSession::deal(rng, entry.variant.hand_size()));
        Ok(entry.game_number)
    }

    /// Idle-lobby cleanup: drop every not-yet-started entry this user
    /// created. Returns the removed ids so callers can tear down rooms.
    pub fn cancel_by_user(&mut self, user: UserId) -> Vec<GameId> {
        let removed: Vec<GameId> = self
            .entries
            .values()
            .filter(|entry| entry.creator == user && !entry.started())
            .map(|entry| entry.id)
            .collect();
        for id in &removed {
            self.entries.remove(id);
        }
        removed
    }

    /// Delete a completed entry after its display grace period.
    pub fn remove(&mut self, id: GameId) -> bool {
        self.entries.remove(&id).is_some()
    }
}
