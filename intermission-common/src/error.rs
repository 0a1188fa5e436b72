// ================================================================
// File: intermission-common/src/error.rs
// ================================================================

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A REST call came back with a non-2xx status. The body has already been logged.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// The event stream sent something the handshake does not allow.
    #[error("Protocol violation: {0}")]
    Protocol(String),

    #[error("No valid channels to subscribe to")]
    NoChannels,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid command name: {0:?}")]
    InvalidCommandName(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Platform error: {0}")]
    Platform(String),
}
