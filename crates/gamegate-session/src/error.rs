//! Error types for the session layer.

use gamegate_protocol::{GameSessionId, PlayerId};

/// Errors that can occur while resolving a caller or touching a session.
///
/// The `Display` strings double as the client-facing text of the reply
/// envelope, so keep them stable.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The request carried no `Authorization` header.
    #[error("User not authenticated.")]
    NotAuthenticated,

    /// The bearer token was empty, invalid, or expired, or the identity
    /// provider could not be reached. The inner string is for logs only.
    #[error("Authentication failed.")]
    AuthFailed(String),

    /// No row exists for the given session ID.
    #[error("Game session not found.")]
    NotFound(GameSessionId),

    /// The session is no longer `in_progress`.
    ///
    /// This is the soft reject: the request was well-formed but the game
    /// has already ended (possibly a moment ago, by a concurrent request).
    #[error("Game is already over.")]
    GameOver(GameSessionId),

    /// The caller is neither `player1_id` nor `player2_id`.
    #[error("User is not a participant in this game session.")]
    NotParticipant {
        session_id: GameSessionId,
        player_id: PlayerId,
    },

    /// The backing store rejected a read or write. Carries the store's
    /// own message so it can be propagated to the client unchanged.
    #[error("{0}")]
    Store(String),
}

impl SessionError {
    /// Returns `true` for the "already over" soft reject.
    pub fn is_game_over(&self) -> bool {
        matches!(self, Self::GameOver(_))
    }
}
