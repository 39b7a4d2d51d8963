//! Per-connection WebSocket actor.
//!
//! One `WsSession` per socket: it owns the heartbeat, parses inbound
//! frames into `ClientMsg`, and gates everything behind the hello
//! handshake before forwarding intents to the engine. A malformed frame
//! earns an `action-rejected` reply; the connection stays open.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix::{Actor, ActorContext, Addr, AsyncContext, Handler, StreamHandler};
use actix_web::{web, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::services::registry::UserId;
use crate::state::AppState;
use crate::ws::engine::{Engine, Intent};
use crate::ws::hub::{Push, WsHub};
use crate::ws::protocol::{ClientMsg, ServerMsg};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub struct WsSession {
    conn_id: Uuid,
    hub: Arc<WsHub>,
    engine: Addr<Engine>,
    /// Bound by the hello frame; every later intent carries it.
    identity: Option<(UserId, String)>,
    last_heartbeat: Instant,
}

impl WsSession {
    pub fn new(hub: Arc<WsHub>, engine: Addr<Engine>) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            hub,
            engine,
            identity: None,
            last_heartbeat: Instant::now(),
        }
    }

    fn heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.last_heartbeat) > CLIENT_TIMEOUT {
                info!(conn_id = %act.conn_id, "[WS SESSION] client heartbeat timed out");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn send_msg(&self, msg: &ServerMsg, ctx: &mut ws::WebsocketContext<Self>) {
        match serde_json::to_string(msg) {
            Ok(text) => ctx.text(text),
            Err(err) => warn!(conn_id = %self.conn_id, error = %err, "[WS SESSION] serialize failed"),
        }
    }

    fn reject(&self, reason: impl Into<String>, ctx: &mut ws::WebsocketContext<Self>) {
        self.send_msg(
            &ServerMsg::ActionRejected {
                reason: reason.into(),
            },
            ctx,
        );
    }

    fn handle_text(&mut self, text: &str, ctx: &mut ws::WebsocketContext<Self>) {
        let msg: ClientMsg = match serde_json::from_str(text) {
            Ok(msg) => msg,
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "[WS SESSION] malformed frame");
                return self.reject("Malformed message", ctx);
            }
        };

        if let ClientMsg::Hello { user_id, name } = msg {
            if self.identity.is_some() {
                return self.reject("Identity already bound", ctx);
            }
            let name: String = name.trim().nfc().collect();
            if name.is_empty() {
                return self.reject("Display name must not be empty", ctx);
            }
            info!(conn_id = %self.conn_id, user_id, "[WS SESSION] identity bound");
            self.identity = Some((user_id, name));
            self.send_msg(&ServerMsg::HelloAck { user_id }, ctx);
            return;
        }

        // Everything except hello requires a bound identity.
        let Some((user_id, user_name)) = self.identity.clone() else {
            return self.reject("Hello required before any other message", ctx);
        };
        self.engine.do_send(Intent {
            conn_id: self.conn_id,
            user_id,
            user_name,
            msg,
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] connected");
        self.hub.register(self.conn_id, ctx.address().recipient());
        self.heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] disconnected");
        self.hub.unregister(self.conn_id);
    }
}

impl Handler<Push> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Push, ctx: &mut Self::Context) -> Self::Result {
        self.send_msg(&msg.0, ctx);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        let msg = match msg {
            Ok(msg) => msg,
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "[WS SESSION] protocol error");
                ctx.stop();
                return;
            }
        };
        match msg {
            ws::Message::Ping(payload) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            ws::Message::Pong(_) => {
                self.last_heartbeat = Instant::now();
            }
            ws::Message::Text(text) => {
                self.last_heartbeat = Instant::now();
                self.handle_text(&text, ctx);
            }
            ws::Message::Binary(_) => {
                self.reject("Binary frames are not supported", ctx);
            }
            ws::Message::Close(reason) => {
                ctx.close(reason);
                ctx.stop();
            }
            ws::Message::Continuation(_) => {
                ctx.stop();
            }
            ws::Message::Nop => {}
        }
    }
}

/// `GET /ws` upgrade handler.
pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, actix_web::Error> {
    ws::start(
        WsSession::new(Arc::clone(&state.hub), state.engine.clone()),
        &req,
        stream,
    )
}
