//! The engine actor: single thread of control for all game mutations.
//!
//! Every inbound intent and every timer callback runs to completion inside
//! this actor's mailbox, so per-session events are serialized by
//! construction (a card play cannot race a resignation) and the registry
//! needs no locks. Timer callbacks re-validate the entry's state before
//! acting and no-op when stale; that is the whole cancellation model.

use std::sync::Arc;

use actix::{Actor, Addr, AsyncContext, Context, Handler, Message};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Timings;
use crate::domain::bot;
use crate::domain::cards::Card;
use crate::domain::scoring::WinKind;
use crate::domain::session::{Outcome, PlayOutcome, Seat, SessionResult, SessionStatus, SettleOutcome};
use crate::errors::domain::{DomainError, InvalidActionKind};
use crate::services::history::HistoryRecorder;
use crate::services::registry::{
    ChatMessage, CreateConfig, GameId, GameRegistry, OfferStatus, UserId, BOT_USER_ID,
};
use crate::ws::hub::WsHub;
use crate::ws::protocol::{ClientMsg, GameMode, GameSnapshot, LobbyGame, ServerMsg};

/// An authenticated intent forwarded by a session actor. `user_id` and
/// `user_name` are the connection's bound identity, not the payload's.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Intent {
    pub conn_id: Uuid,
    pub user_id: UserId,
    pub user_name: String,
    pub msg: ClientMsg,
}

/// Durable id reported back by the history recorder.
#[derive(Message)]
#[rtype(result = "()")]
pub struct DbIdAssigned {
    pub game_id: GameId,
    pub db_id: i64,
}

pub struct Engine {
    registry: GameRegistry,
    hub: Arc<WsHub>,
    recorder: Arc<dyn HistoryRecorder>,
    timings: Timings,
    rng: StdRng,
}

impl Engine {
    pub fn new(hub: Arc<WsHub>, recorder: Arc<dyn HistoryRecorder>, timings: Timings) -> Self {
        Self {
            registry: GameRegistry::new(),
            hub,
            recorder,
            timings,
            rng: StdRng::from_os_rng(),
        }
    }

    fn lobby_msg(&self) -> ServerMsg {
        let mut games: Vec<LobbyGame> = self.registry.entries().map(LobbyGame::from_entry).collect();
        games.sort_by_key(|g| g.id);
        ServerMsg::Games { games }
    }

    fn broadcast_lobby(&self) {
        self.hub.broadcast_all(self.lobby_msg());
    }

    fn broadcast_game(&self, game_id: GameId) {
        if let Ok(entry) = self.registry.get(game_id) {
            self.hub.broadcast_room(
                game_id,
                ServerMsg::GameChange {
                    game: GameSnapshot::from_entry(entry),
                },
            );
        }
    }

    fn reject(&self, conn_id: Uuid, reason: impl Into<String>) {
        self.hub.send_to(
            conn_id,
            ServerMsg::ActionRejected {
                reason: reason.into(),
            },
        );
    }

    /// Payload user ids must match the connection's bound identity;
    /// mismatches are rejected before any state is touched.
    fn verify_identity(&self, intent_user: UserId, payload_user: UserId, conn_id: Uuid) -> bool {
        if intent_user == payload_user {
            return true;
        }
        warn!(
            bound = intent_user,
            claimed = payload_user,
            "[ENGINE] identity mismatch"
        );
        self.reject(conn_id, "user id does not match connection identity");
        false
    }

    fn report_game_started(&self, game_id: GameId, addr: Addr<Engine>) {
        let Ok(entry) = self.registry.get(game_id) else {
            return;
        };
        let recorder = Arc::clone(&self.recorder);
        let variant = entry.variant;
        let players = [
            entry.players[0].unwrap_or_default(),
            entry.players[1].unwrap_or_default(),
        ];
        let is_match = entry.is_match();
        let stake = entry.stake();
        tokio::spawn(async move {
            if let Some(db_id) = recorder
                .game_started(game_id, variant, players, is_match, stake)
                .await
            {
                addr.do_send(DbIdAssigned { game_id, db_id });
            }
        });
    }

    fn report_game_finished(&self, game_id: GameId, result: SessionResult) {
        let Ok(entry) = self.registry.get(game_id) else {
            return;
        };
        let recorder = Arc::clone(&self.recorder);
        let db_id = entry.db_id;
        let win_kind = match result.outcome {
            Outcome::Win(seat) => Some(WinKind::classify(result.scores[seat.index()])),
            _ => None,
        };
        tokio::spawn(async move {
            recorder
                .game_finished(game_id, db_id, result, win_kind)
                .await;
        });
    }

    fn handle_intent(&mut self, intent: Intent, ctx: &mut Context<Self>) {
        let Intent {
            conn_id,
            user_id,
            user_name,
            msg,
        } = intent;

        match msg {
            ClientMsg::Hello { .. } => {
                // Identity binding happens in the session actor.
            }

            ClientMsg::CreateGame {
                variant,
                mode,
                stake,
                vs_bot,
            } => {
                let config = CreateConfig {
                    variant,
                    is_match: mode == GameMode::Match,
                    stake,
                    vs_bot,
                };
                match self.registry.create(config, user_id) {
                    Ok(game_id) => {
                        info!(game_id, user_id, "[ENGINE] game created");
                        self.hub.join_room(game_id, conn_id, user_id);
                        self.broadcast_lobby();
                    }
                    Err(err) => self.reject(conn_id, err.to_string()),
                }
            }

            ClientMsg::GetGames => {
                self.hub.send_to(conn_id, self.lobby_msg());
            }

            ClientMsg::JoinGame {
                game_id,
                user_id: payload_user,
            } => {
                if !self.verify_identity(user_id, payload_user, conn_id) {
                    return;
                }
                match self.registry.join(game_id, user_id) {
                    Ok(OfferStatus::Pending) => {
                        self.hub.join_room(game_id, conn_id, user_id);
                        self.broadcast_lobby();
                        if let Ok(entry) = self.registry.get(game_id) {
                            self.hub.broadcast_room(
                                game_id,
                                ServerMsg::PlayerJoinRequest {
                                    game_id,
                                    user_id,
                                    stake: entry.stake(),
                                    variant: entry.variant,
                                },
                            );
                        }
                    }
                    Ok(_) => {
                        self.hub.join_room(game_id, conn_id, user_id);
                        self.broadcast_lobby();
                        self.hub.broadcast_room(
                            game_id,
                            ServerMsg::OfferAccepted { game_id, user_id },
                        );
                    }
                    Err(err) => self.reject(conn_id, err.to_string()),
                }
            }

            ClientMsg::AcceptOffer {
                game_id,
                user_id: candidate,
            } => match self.registry.accept_offer(game_id, user_id, candidate) {
                Ok(()) => {
                    self.broadcast_lobby();
                    self.hub.broadcast_room(
                        game_id,
                        ServerMsg::OfferAccepted {
                            game_id,
                            user_id: candidate,
                        },
                    );
                }
                Err(err) => self.reject(conn_id, err.to_string()),
            },

            ClientMsg::RejectOffer {
                game_id,
                user_id: candidate,
            } => match self.registry.reject_offer(game_id, user_id, candidate) {
                Ok(()) => {
                    self.broadcast_lobby();
                    self.hub.broadcast_room(
                        game_id,
                        ServerMsg::OfferRejected {
                            game_id,
                            user_id: candidate,
                        },
                    );
                    self.hub.evict_user(game_id, candidate);
                }
                Err(err) => self.reject(conn_id, err.to_string()),
            },

            ClientMsg::StartGame { game_id } => {
                match self.registry.start(game_id, user_id, &mut self.rng) {
                    Ok(()) => {
                        info!(game_id, "[ENGINE] game started");
                        self.report_game_started(game_id, ctx.address());
                        self.hub
                            .broadcast_room(game_id, ServerMsg::GameStarted { game_id });
                        self.broadcast_game(game_id);
                        self.broadcast_lobby();
                        self.schedule_bot(game_id, ctx);
                    }
                    Err(err) => self.reject(conn_id, err.to_string()),
                }
            }

            ClientMsg::CancelGame {
                user_id: payload_user,
            } => {
                if !self.verify_identity(user_id, payload_user, conn_id) {
                    return;
                }
                let removed = self.registry.cancel_by_user(user_id);
                if !removed.is_empty() {
                    info!(user_id, count = removed.len(), "[ENGINE] games canceled");
                    for game_id in removed {
                        self.hub.drop_room(game_id);
                    }
                    self.broadcast_lobby();
                }
            }

            ClientMsg::PlayCard {
                game_id,
                card,
                user_id: payload_user,
            } => {
                if !self.verify_identity(user_id, payload_user, conn_id) {
                    return;
                }
                let seat = match self.registry.get(game_id).map(|e| e.seat_of(user_id)) {
                    Ok(Some(seat)) => seat,
                    Ok(None) => {
                        return self.reject(
                            conn_id,
                            DomainError::invalid_action(
                                InvalidActionKind::NotParticipant,
                                "Not a participant",
                            )
                            .to_string(),
                        )
                    }
                    Err(err) => return self.reject(conn_id, err.to_string()),
                };
                self.apply_play(game_id, seat, card, Some(conn_id), ctx);
            }

            ClientMsg::ResignGame {
                game_id,
                user_id: payload_user,
            } => {
                if !self.verify_identity(user_id, payload_user, conn_id) {
                    return;
                }
                if let Err(err) = self.resign(game_id, user_id, ctx) {
                    self.reject(conn_id, err.to_string());
                }
            }

            ClientMsg::ContinueMatch { game_id } => {
                if let Ok(entry) = self.registry.get(game_id) {
                    if entry.seat_of(user_id).is_none() {
                        return self.reject(conn_id, "Not a participant");
                    }
                }
                if let Err(err) = self.continue_match(game_id, ctx) {
                    self.reject(conn_id, err.to_string());
                }
            }

            ClientMsg::SendChatMessage {
                game_id,
                message,
                user_id: payload_user,
            } => {
                if !self.verify_identity(user_id, payload_user, conn_id) {
                    return;
                }
                let chat_msg = match self.registry.get_mut(game_id) {
                    Ok(entry) => {
                        let chat_msg = ChatMessage {
                            id: entry.chat.len() as u64 + 1,
                            user_id,
                            user_name,
                            message,
                            sent_at: time::OffsetDateTime::now_utc(),
                        };
                        entry.chat.push(chat_msg.clone());
                        chat_msg
                    }
                    Err(err) => return self.reject(conn_id, err.to_string()),
                };
                self.hub.broadcast_room(
                    game_id,
                    ServerMsg::ChatMessage {
                        game_id,
                        message: chat_msg,
                    },
                );
            }
        }
    }

    /// Shared play path for humans and the bot. `reply_to` is None for
    /// bot moves; a bot move failing is an engine bug worth a warning,
    /// never a broadcast.
    fn apply_play(
        &mut self,
        game_id: GameId,
        seat: Seat,
        card: Card,
        reply_to: Option<Uuid>,
        ctx: &mut Context<Self>,
    ) {
        let outcome = match self.registry.get_mut(game_id) {
            Ok(entry) => match entry.session.as_mut() {
                Some(session) => session.play_card(seat, card),
                None => Err(DomainError::invalid_action(
                    InvalidActionKind::NotStarted,
                    "Game not started",
                )),
            },
            Err(err) => Err(err),
        };

        match outcome {
            Ok(PlayOutcome::Played { next_turn: _ }) => {
                self.broadcast_game(game_id);
                self.schedule_bot(game_id, ctx);
            }
            Ok(PlayOutcome::RoundResolved {
                winner,
                round_points,
            }) => {
                info!(
                    game_id,
                    winner = ?winner,
                    round_points,
                    "[ENGINE] round resolved"
                );
                self.broadcast_game(game_id);
                self.schedule_settle(game_id, ctx);
            }
            Err(err) => match reply_to {
                Some(conn_id) => self.reject(conn_id, err.to_string()),
                None => warn!(game_id, error = %err, "[ENGINE] bot move rejected"),
            },
        }
    }

    /// Queue the settle step for the round that just resolved. The
    /// callback is keyed to (game number, round counter) so it no-ops if
    /// the session was resigned, removed or recycled in the meantime.
    fn schedule_settle(&mut self, game_id: GameId, ctx: &mut Context<Self>) {
        let Ok(entry) = self.registry.get(game_id) else {
            return;
        };
        let Some(session) = entry.session.as_ref() else {
            return;
        };
        let game_number = entry.game_number;
        let rounds = session.rounds_completed();
        ctx.run_later(self.timings.round_settle, move |act, ctx| {
            act.settle(game_id, game_number, rounds, ctx);
        });
    }

    fn settle(&mut self, game_id: GameId, game_number: u32, rounds: u32, ctx: &mut Context<Self>) {
        let outcome = {
            let Ok(entry) = self.registry.get_mut(game_id) else {
                return;
            };
            if entry.game_number != game_number {
                return;
            }
            let Some(session) = entry.session.as_mut() else {
                return;
            };
            if session.status() != SessionStatus::RoundResolving
                || session.rounds_completed() != rounds
            {
                return;
            }
            session.settle_round()
        };

        match outcome {
            Ok(SettleOutcome::NextRound { leader: _ }) => {
                self.broadcast_game(game_id);
                self.schedule_bot(game_id, ctx);
            }
            Ok(SettleOutcome::GameEnded(result)) => {
                self.on_session_ended(game_id, result, ctx);
            }
            Err(err) => {
                warn!(game_id, error = %err, "[ENGINE] stale settle callback");
            }
        }
    }

    /// A session ran out of cards. Report it, fold it into the match if
    /// there is one, and schedule either the automatic continuation or
    /// the post-completion removal.
    fn on_session_ended(
        &mut self,
        game_id: GameId,
        result: SessionResult,
        ctx: &mut Context<Self>,
    ) {
        self.report_game_finished(game_id, result.clone());

        let match_report = {
            let Ok(entry) = self.registry.get_mut(game_id) else {
                return;
            };
            match entry.match_state.as_mut() {
                Some(match_state) => {
                    match match_state.record_game(entry.game_number, &result) {
                        Ok(record) => {
                            let marks = match_state.marks();
                            let totals = match_state.total_points();
                            let terminal = match_state
                                .winner()
                                .zip(match_state.payout())
                                .filter(|_| match_state.is_over());
                            Some((record, marks, totals, terminal))
                        }
                        Err(err) => {
                            warn!(game_id, error = %err, "[ENGINE] match record failed");
                            None
                        }
                    }
                }
                None => {
                    entry.ended_at = Some(time::OffsetDateTime::now_utc());
                    None
                }
            }
        };

        match match_report {
            Some((record, marks, totals, terminal)) => {
                let db_id = self.registry.get(game_id).ok().and_then(|e| e.db_id);
                let recorder = Arc::clone(&self.recorder);
                tokio::spawn(async move {
                    recorder
                        .match_game_recorded(game_id, db_id, record, marks, totals)
                        .await;
                });

                match terminal {
                    Some((winner, payout)) => {
                        info!(game_id, ?winner, payout, "[ENGINE] match over");
                        if let Ok(entry) = self.registry.get_mut(game_id) {
                            entry.ended_at = Some(time::OffsetDateTime::now_utc());
                        }
                        let recorder = Arc::clone(&self.recorder);
                        tokio::spawn(async move {
                            recorder.match_finished(game_id, db_id, winner, payout).await;
                        });
                        self.broadcast_game(game_id);
                        self.broadcast_lobby();
                        self.schedule_removal(game_id, self.timings.remove_after_end, ctx);
                    }
                    None => {
                        self.broadcast_game(game_id);
                        self.schedule_continue(game_id, ctx);
                    }
                }
            }
            None => {
                self.broadcast_game(game_id);
                self.broadcast_lobby();
                self.schedule_removal(game_id, self.timings.remove_after_end, ctx);
            }
        }
    }

    fn resign(
        &mut self,
        game_id: GameId,
        user_id: UserId,
        ctx: &mut Context<Self>,
    ) -> Result<(), DomainError> {
        let (result, match_end) = {
            let entry = self.registry.get_mut(game_id)?;
            let seat = entry.seat_of(user_id).ok_or_else(|| {
                DomainError::invalid_action(InvalidActionKind::NotParticipant, "Not a participant")
            })?;
            // Checked before the session mutates: a failed forfeit after a
            // successful resign would leave the entry half-updated.
            if entry.match_state.as_ref().is_some_and(|m| m.is_over()) {
                return Err(DomainError::invalid_action(
                    InvalidActionKind::MatchOver,
                    "Match is over",
                ));
            }
            let Some(session) = entry.session.as_mut() else {
                return Err(DomainError::invalid_action(
                    InvalidActionKind::NotStarted,
                    "Game not started",
                ));
            };
            let result = session.resign(seat)?;
            let match_end = match entry.match_state.as_mut() {
                Some(match_state) => {
                    match_state.forfeit(seat)?;
                    match_state.winner().zip(match_state.payout())
                }
                None => None,
            };
            entry.ended_at = Some(time::OffsetDateTime::now_utc());
            (result, match_end)
        };

        info!(game_id, user_id, "[ENGINE] player resigned");
        self.report_game_finished(game_id, result);
        if let Some((winner, payout)) = match_end {
            let db_id = self.registry.get(game_id).ok().and_then(|e| e.db_id);
            let recorder = Arc::clone(&self.recorder);
            tokio::spawn(async move {
                recorder.match_finished(game_id, db_id, winner, payout).await;
            });
        }
        self.broadcast_game(game_id);
        self.broadcast_lobby();
        self.schedule_removal(game_id, self.timings.remove_after_resign, ctx);
        Ok(())
    }

    fn continue_match(
        &mut self,
        game_id: GameId,
        ctx: &mut Context<Self>,
    ) -> Result<(), DomainError> {
        let game_number = self.registry.continue_match(game_id, &mut self.rng)?;
        info!(game_id, game_number, "[ENGINE] next match game dealt");
        self.report_game_started(game_id, ctx.address());
        self.broadcast_game(game_id);
        self.broadcast_lobby();
        Ok(())
    }

    /// Automatic continuation after the result display window. No-ops if
    /// the match moved on (explicit continue, resignation, removal).
    fn schedule_continue(&mut self, game_id: GameId, ctx: &mut Context<Self>) {
        let Ok(entry) = self.registry.get(game_id) else {
            return;
        };
        let game_number = entry.game_number;
        ctx.run_later(self.timings.match_continue, move |act, ctx| {
            let still_due = act.registry.get(game_id).is_ok_and(|entry| {
                entry.game_number == game_number
                    && entry.session_ended()
                    && entry.match_state.as_ref().is_some_and(|m| !m.is_over())
            });
            if !still_due {
                return;
            }
            if let Err(err) = act.continue_match(game_id, ctx) {
                warn!(game_id, error = %err, "[ENGINE] auto-continue failed");
            }
        });
    }

    /// Queue the bot's move if the entry is a bot game and the bot is on
    /// turn. The callback re-validates everything; a human resignation in
    /// the meantime makes it a no-op.
    fn schedule_bot(&mut self, game_id: GameId, ctx: &mut Context<Self>) {
        let due = self.registry.get(game_id).is_ok_and(|entry| {
            entry.vs_bot
                && entry.players[1] == Some(BOT_USER_ID)
                && entry.session.as_ref().is_some_and(|s| {
                    s.status() == SessionStatus::InProgress && s.turn() == Seat::Two
                })
        });
        if !due {
            return;
        }
        ctx.run_later(self.timings.bot_move, move |act, ctx| {
            act.bot_move(game_id, ctx);
        });
    }

    fn bot_move(&mut self, game_id: GameId, ctx: &mut Context<Self>) {
        let card = {
            let Ok(entry) = self.registry.get(game_id) else {
                return;
            };
            if !entry.vs_bot {
                return;
            }
            let Some(session) = entry.session.as_ref() else {
                return;
            };
            if session.status() != SessionStatus::InProgress || session.turn() != Seat::Two {
                return;
            }
            bot::choose_card(session, Seat::Two)
        };
        if let Some(card) = card {
            self.apply_play(game_id, Seat::Two, card, None, ctx);
        }
    }

    /// Remove a completed entry after its display grace period, so
    /// clients can render the final state before it leaves the listings.
    fn schedule_removal(
        &mut self,
        game_id: GameId,
        delay: std::time::Duration,
        ctx: &mut Context<Self>,
    ) {
        ctx.run_later(delay, move |act, _ctx| {
            let completed = act
                .registry
                .get(game_id)
                .is_ok_and(|entry| entry.ended_at.is_some());
            if !completed {
                return;
            }
            if act.registry.remove(game_id) {
                info!(game_id, "[ENGINE] removed completed game");
                act.hub.drop_room(game_id);
                act.broadcast_lobby();
            }
        });
    }
}

impl Actor for Engine {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("[ENGINE] started");
    }
}

impl Handler<Intent> for Engine {
    type Result = ();

    fn handle(&mut self, intent: Intent, ctx: &mut Self::Context) -> Self::Result {
        self.handle_intent(intent, ctx);
    }
}

impl Handler<DbIdAssigned> for Engine {
    type Result = ();

    fn handle(&mut self, msg: DbIdAssigned, _ctx: &mut Self::Context) -> Self::Result {
        if let Ok(entry) = self.registry.get_mut(msg.game_id) {
            entry.db_id = Some(msg.db_id);
        }
    }
}
