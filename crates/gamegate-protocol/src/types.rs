//! Core protocol types for Gamegate's wire format.
//!
//! Request bodies use the camelCase field names the game client sends
//! (`gameSessionId`, `isConnecting`); replies are a one-field JSON object,
//! either `{ "message": ... }` or `{ "error": ... }`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The identity of an authenticated user, as issued by the identity
/// provider (a UUID string on the managed platform).
///
/// A newtype so a `PlayerId` can't be passed where a `GameSessionId` is
/// expected. `#[serde(transparent)]` keeps it a bare string in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Creates a `PlayerId` from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The primary key of a game session row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameSessionId(pub String);

impl GameSessionId {
    /// Creates a `GameSessionId` from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejects absent and empty session IDs with the same error.
fn require_session_id(
    raw: Option<&str>,
) -> Result<GameSessionId, ProtocolError> {
    match raw {
        Some(id) if !id.is_empty() => Ok(GameSessionId::new(id)),
        _ => Err(ProtocolError::MissingSessionId),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body of a forfeit request: `{ "gameSessionId": "..." }`.
///
/// The field is optional at the serde level so that a missing ID produces
/// [`ProtocolError::MissingSessionId`] instead of a generic decode error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForfeitRequest {
    #[serde(rename = "gameSessionId", default)]
    pub game_session_id: Option<String>,
}

impl ForfeitRequest {
    /// Creates a request for the given session.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            game_session_id: Some(id.into()),
        }
    }

    /// Returns the validated session ID.
    ///
    /// # Errors
    /// [`ProtocolError::MissingSessionId`] if the ID is absent or empty.
    pub fn session_id(&self) -> Result<GameSessionId, ProtocolError> {
        require_session_id(self.game_session_id.as_deref())
    }
}

/// Body of a disconnection request:
/// `{ "gameSessionId": "...", "isConnecting": true | false }`.
///
/// `isConnecting = true` is a join event (the caller is back);
/// `false` is a leave event. An absent or `null` flag counts as a leave.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisconnectionRequest {
    #[serde(rename = "gameSessionId", default)]
    pub game_session_id: Option<String>,

    #[serde(rename = "isConnecting", default)]
    pub is_connecting: Option<bool>,
}

impl DisconnectionRequest {
    /// Creates a request for the given session and event.
    pub fn new(id: impl Into<String>, is_connecting: bool) -> Self {
        Self {
            game_session_id: Some(id.into()),
            is_connecting: Some(is_connecting),
        }
    }

    /// Returns the validated session ID.
    ///
    /// # Errors
    /// [`ProtocolError::MissingSessionId`] if the ID is absent or empty.
    pub fn session_id(&self) -> Result<GameSessionId, ProtocolError> {
        require_session_id(self.game_session_id.as_deref())
    }

    /// `true` for a join event, `false` for a leave event.
    pub fn is_connecting(&self) -> bool {
        self.is_connecting.unwrap_or(false)
    }
}

// ---------------------------------------------------------------------------
// Reply
// ---------------------------------------------------------------------------

/// The JSON envelope every endpoint answers with.
///
/// `#[serde(untagged)]` drops the variant name, so the two shapes are:
///
/// ```text
/// { "message": "Game forfeited successfully." }
/// { "error": "Game session not found." }
/// ```
///
/// `Message` is used for success and for the "already over" soft reject;
/// `Error` for every failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Message { message: String },
    Error { error: String },
}

impl Reply {
    /// Builds a `{ "message": ... }` reply.
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message {
            message: text.into(),
        }
    }

    /// Builds an `{ "error": ... }` reply.
    pub fn error(text: impl Into<String>) -> Self {
        Self::Error { error: text.into() }
    }

    /// Returns `true` for the error shape.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// The human-readable text of either shape.
    pub fn text(&self) -> &str {
        match self {
            Self::Message { message } => message,
            Self::Error { error } => error,
        }
    }
}
