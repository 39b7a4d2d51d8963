//! Connection hub: recipients and per-game rooms for fan-out.
//!
//! Session actors register themselves on connect; the engine only reads
//! recipients to push `ServerMsg` frames. This is the single structure
//! shared across threads, hence the `DashMap`s.

use actix::{Message, Recipient};
use dashmap::DashMap;
use uuid::Uuid;

use crate::services::registry::{GameId, UserId};
use crate::ws::protocol::ServerMsg;

#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Push(pub ServerMsg);

#[derive(Default)]
pub struct WsHub {
    connections: DashMap<Uuid, Recipient<Push>>,
    rooms: DashMap<GameId, DashMap<Uuid, UserId>>,
}

impl WsHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, conn_id: Uuid, recipient: Recipient<Push>) {
        self.connections.insert(conn_id, recipient);
    }

    pub fn unregister(&self, conn_id: Uuid) {
        self.connections.remove(&conn_id);
        for room in self.rooms.iter() {
            room.value().remove(&conn_id);
        }
    }

    pub fn join_room(&self, game_id: GameId, conn_id: Uuid, user_id: UserId) {
        self.rooms
            .entry(game_id)
            .or_default()
            .insert(conn_id, user_id);
    }

    /// Evict every connection a user holds in one room (rejected join
    /// candidates leave the room).
    pub fn evict_user(&self, game_id: GameId, user_id: UserId) {
        if let Some(room) = self.rooms.get(&game_id) {
            room.retain(|_, member| *member != user_id);
        }
    }

    pub fn drop_room(&self, game_id: GameId) {
        self.rooms.remove(&game_id);
    }

    pub fn send_to(&self, conn_id: Uuid, msg: ServerMsg) {
        if let Some(recipient) = self.connections.get(&conn_id) {
            recipient.do_send(Push(msg));
        }
    }

    /// Lobby-wide broadcast to every live connection.
    pub fn broadcast_all(&self, msg: ServerMsg) {
        for recipient in self.connections.iter() {
            recipient.value().do_send(Push(msg.clone()));
        }
    }

    /// Broadcast to the subscriber set of one game.
    pub fn broadcast_room(&self, game_id: GameId, msg: ServerMsg) {
        let Some(room) = self.rooms.get(&game_id) else {
            return;
        };
        for member in room.iter() {
            if let Some(recipient) = self.connections.get(member.key()) {
                recipient.do_send(Push(msg.clone()));
            }
        }
    }
}
