//! Environment-driven configuration.

pub mod timings;

pub use timings::Timings;

use crate::error::AppError;

/// Listen address for the HTTP/websocket server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Read `BISCA_HOST` / `BISCA_PORT` from the environment.
    ///
    /// Environment variables must be set by the runtime environment
    /// (docker env_file, or sourced manually for local dev).
    pub fn from_env() -> Result<Self, AppError> {
        let host = std::env::var("BISCA_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("BISCA_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| AppError::config("BISCA_PORT must be a valid port number"))?;
        Ok(Self { host, port })
    }
}
