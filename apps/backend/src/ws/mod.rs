//! Realtime transport: protocol types, connection hub, the per-socket
//! session actor and the engine actor.

pub mod engine;
pub mod hub;
pub mod protocol;
pub mod session;
