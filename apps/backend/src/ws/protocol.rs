//! Typed wire protocol.
//!
//! Every inbound frame is one tagged `ClientMsg` variant, validated at the
//! transport boundary before anything reaches the engine; every outbound
//! frame is a `ServerMsg`. Tags are the kebab-case event names of §7.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, Suit};
use crate::domain::matches::{GameRecord, MatchStatus};
use crate::domain::scoring::WinKind;
use crate::domain::session::{GameSession, Outcome, Seat, SessionStatus};
use crate::services::registry::{
    ChatMessage, GameEntry, GameId, GameVariant, OfferStatus, UserId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Game,
    Match,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMsg {
    /// Must be the first frame on a connection; binds the identity.
    Hello {
        user_id: UserId,
        name: String,
    },
    CreateGame {
        variant: GameVariant,
        mode: GameMode,
        #[serde(default)]
        stake: u32,
        #[serde(default)]
        vs_bot: bool,
    },
    GetGames,
    JoinGame {
        game_id: GameId,
        user_id: UserId,
    },
    AcceptOffer {
        game_id: GameId,
        user_id: UserId,
    },
    RejectOffer {
        game_id: GameId,
        user_id: UserId,
    },
    StartGame {
        game_id: GameId,
    },
    CancelGame {
        user_id: UserId,
    },
    PlayCard {
        game_id: GameId,
        card: Card,
        user_id: UserId,
    },
    ResignGame {
        game_id: GameId,
        user_id: UserId,
    },
    ContinueMatch {
        game_id: GameId,
    },
    SendChatMessage {
        game_id: GameId,
        message: String,
        user_id: UserId,
    },
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMsg {
    HelloAck {
        user_id: UserId,
    },
    /// Full lobby snapshot.
    Games {
        games: Vec<LobbyGame>,
    },
    /// Full session/match state snapshot for one entry.
    GameChange {
        game: GameSnapshot,
    },
    GameStarted {
        game_id: GameId,
    },
    PlayerJoinRequest {
        game_id: GameId,
        user_id: UserId,
        stake: u32,
        variant: GameVariant,
    },
    OfferAccepted {
        game_id: GameId,
        user_id: UserId,
    },
    OfferRejected {
        game_id: GameId,
        user_id: UserId,
    },
    ChatMessage {
        game_id: GameId,
        message: ChatMessage,
    },
    /// Explicit rejection acknowledgment, sent to the acting connection
    /// only (a refused action never broadcasts).
    ActionRejected {
        reason: String,
    },
}

/// Session status as reported on the wire; `NotStarted` covers entries
/// whose first deal has not happened yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotStatus {
    NotStarted,
    InProgress,
    RoundResolving,
    Ended,
}

impl SnapshotStatus {
    fn of(session: Option<&GameSession>) -> Self {
        match session.map(|s| s.status()) {
            None => SnapshotStatus::NotStarted,
            Some(SessionStatus::InProgress) => SnapshotStatus::InProgress,
            Some(SessionStatus::RoundResolving) => SnapshotStatus::RoundResolving,
            Some(SessionStatus::Ended) => SnapshotStatus::Ended,
        }
    }
}

/// Lobby listing row.
#[derive(Debug, Clone, Serialize)]
pub struct LobbyGame {
    pub id: GameId,
    pub variant: GameVariant,
    pub is_match: bool,
    pub stake: u32,
    pub creator: UserId,
    pub players: [Option<UserId>; 2],
    pub pending_joiner: Option<UserId>,
    pub offer: OfferStatus,
    pub vs_bot: bool,
    pub status: SnapshotStatus,
}

impl LobbyGame {
    pub fn from_entry(entry: &GameEntry) -> Self {
        Self {
            id: entry.id,
            variant: entry.variant,
            is_match: entry.is_match(),
            stake: entry.stake(),
            creator: entry.creator,
            players: entry.players,
            pending_joiner: entry.pending_joiner,
            offer: entry.offer,
            vs_bot: entry.vs_bot,
            status: SnapshotStatus::of(entry.session.as_ref()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultSnapshot {
    pub outcome: Outcome,
    pub scores: [u8; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_kind: Option<WinKind>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchSnapshot {
    pub stake: u32,
    pub marks: [u8; 2],
    pub total_points: [u32; 2],
    pub status: MatchStatus,
    pub winner: Option<Seat>,
    pub payout: Option<u32>,
    pub history: Vec<GameRecord>,
}

/// Full authoritative state for one entry, broadcast to its room.
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot {
    pub id: GameId,
    pub variant: GameVariant,
    pub creator: UserId,
    pub players: [Option<UserId>; 2],
    pub offer: OfferStatus,
    pub status: SnapshotStatus,
    pub game_number: u32,
    pub hands: [Vec<Card>; 2],
    pub table: [Option<Card>; 2],
    pub turn: Option<Seat>,
    pub round_starter: Option<Seat>,
    pub trump_card: Option<Card>,
    pub trump_suit: Option<Suit>,
    pub scores: [u8; 2],
    pub rounds_completed: u32,
    pub deck_remaining: usize,
    pub result: Option<ResultSnapshot>,
    #[serde(rename = "match")]
    pub match_state: Option<MatchSnapshot>,
    pub chat: Vec<ChatMessage>,
}

impl GameSnapshot {
    pub fn from_entry(entry: &GameEntry) -> Self {
        let session = entry.session.as_ref();
        let result = session.and_then(|s| s.result()).map(|r| ResultSnapshot {
            outcome: r.outcome,
            scores: r.scores,
            win_kind: r
                .winner()
                .filter(|_| matches!(r.outcome, Outcome::Win(_)))
                .map(|seat| WinKind::classify(r.scores[seat.index()])),
        });
        Self {
            id: entry.id,
            variant: entry.variant,
            creator: entry.creator,
            players: entry.players,
            offer: entry.offer,
            status: SnapshotStatus::of(session),
            game_number: entry.game_number,
            hands: session.map_or([Vec::new(), Vec::new()], |s| {
                [s.hand(Seat::One).to_vec(), s.hand(Seat::Two).to_vec()]
            }),
            table: session.map_or([None, None], |s| [s.table(Seat::One), s.table(Seat::Two)]),
            turn: session.map(|s| s.turn()),
            round_starter: session.map(|s| s.round_starter()),
            trump_card: session.map(|s| s.trump_card()),
            trump_suit: session.map(|s| s.trump_suit()),
            scores: session.map_or([0, 0], |s| s.scores()),
            rounds_completed: session.map_or(0, |s| s.rounds_completed()),
            deck_remaining: session.map_or(0, |s| s.deck_remaining()),
            result,
            match_state: entry.match_state.as_ref().map(|m| MatchSnapshot {
                stake: m.stake(),
                marks: m.marks(),
                total_points: m.total_points(),
                status: m.status(),
                winner: m.winner(),
                payout: m.payout(),
                history: m.history().to_vec(),
            }),
            chat: entry.chat.clone(),
        }
    }
}
