//! Shared application state handed to every route.

use std::sync::Arc;

use actix::Addr;

use crate::ws::engine::Engine;
use crate::ws::hub::WsHub;

#[derive(Clone)]
pub struct AppState {
    pub engine: Addr<Engine>,
    pub hub: Arc<WsHub>,
}

impl AppState {
    pub fn new(engine: Addr<Engine>, hub: Arc<WsHub>) -> Self {
        Self { engine, hub }
    }
}
