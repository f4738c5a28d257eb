//! Unified error type for the Gamegate server.

use gamegate_protocol::{ProtocolError, Reply};
use gamegate_session::SessionError;
use hyper::StatusCode;

use crate::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts layer errors automatically. At the HTTP
/// boundary every variant becomes a status code plus a reply envelope.
#[derive(Debug, thiserror::Error)]
pub enum GamegateError {
    /// The request body was unusable (bad JSON, missing session ID).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Authentication, lookup, state, or store failure.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Startup configuration was missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Binding the listener failed.
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GamegateError {
    /// Returns `true` for the "already over" soft reject.
    pub fn is_game_over(&self) -> bool {
        matches!(self, Self::Session(e) if e.is_game_over())
    }

    /// The HTTP status for this error: 400 for "already over", 500 for
    /// everything else.
    pub fn status_code(&self) -> StatusCode {
        if self.is_game_over() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    /// The reply envelope: the soft reject is a `{ "message": ... }`,
    /// every real failure an `{ "error": ... }`.
    pub fn to_reply(&self) -> Reply {
        if self.is_game_over() {
            Reply::message(self.to_string())
        } else {
            Reply::error(self.to_string())
        }
    }
}
