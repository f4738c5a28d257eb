//! Session types: the game row and the parts of it the handlers read.
//!
//! A "game session" is one match between two participants. The row is
//! created and driven through most of its lifecycle by collaborators
//! outside this workspace; Gamegate only ever performs two writes on it
//! (see [`SessionUpdate`](crate::SessionUpdate)).

use std::fmt;

use chrono::{DateTime, Utc};
use gamegate_protocol::{GameSessionId, PlayerId};
use serde::{Deserialize, Serialize};

use crate::SessionUpdate;

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a game session, as stored in the `status` column.
///
/// ```text
/// waiting ──→ in_progress ──→ completed
///                  │
///                  └──(forfeit)──→ forfeited
/// ```
///
/// Only `in_progress` lets a handler act. `Other` absorbs statuses owned
/// by other services so an unfamiliar value never fails a read; it is
/// treated like any terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Waiting,
    InProgress,
    Completed,
    Forfeited,
    #[serde(other)]
    Other,
}

impl SessionStatus {
    /// Returns `true` if the handlers may act on the session.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }

    /// The column value, as written by the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Forfeited => "forfeited",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SessionSnapshot
// ---------------------------------------------------------------------------

/// The columns a handler selects before deciding what to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: GameSessionId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub status: SessionStatus,
}

impl SessionSnapshot {
    /// Returns the participant who is not `caller`.
    ///
    /// Both handlers target this player: the opponent wins on a forfeit,
    /// and the opponent is marked disconnected on a leave event.
    /// Returns `None` if `caller` is not in the game at all.
    pub fn opponent_of(&self, caller: &PlayerId) -> Option<&PlayerId> {
        if &self.player1_id == caller {
            Some(&self.player2_id)
        } else if &self.player2_id == caller {
            Some(&self.player1_id)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// GameSession
// ---------------------------------------------------------------------------

/// A full game session row.
///
/// `disconnected_player_id` and `player_disconnected_at` are always both
/// set or both `None`; the only way to change them is through a
/// [`DisconnectionPatch`](crate::DisconnectionPatch), which keeps them
/// paired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub id: GameSessionId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub status: SessionStatus,
    pub winner_id: Option<PlayerId>,
    pub is_game_over: bool,
    pub player1_ready: bool,
    pub player2_ready: bool,
    pub disconnected_player_id: Option<PlayerId>,
    pub player_disconnected_at: Option<DateTime<Utc>>,
}

impl GameSession {
    /// Creates an in-progress session between two ready players.
    pub fn new(
        id: GameSessionId,
        player1_id: PlayerId,
        player2_id: PlayerId,
    ) -> Self {
        Self {
            id,
            player1_id,
            player2_id,
            status: SessionStatus::InProgress,
            winner_id: None,
            is_game_over: false,
            player1_ready: true,
            player2_ready: true,
            disconnected_player_id: None,
            player_disconnected_at: None,
        }
    }

    /// Returns a copy with a different status.
    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = status;
        self
    }

    /// The columns a handler reads.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            player1_id: self.player1_id.clone(),
            player2_id: self.player2_id.clone(),
            status: self.status,
        }
    }

    /// Writes every column of `update` into the row.
    ///
    /// Does not check the status; guarding is the store's job.
    pub fn apply(&mut self, update: &SessionUpdate) {
        match update {
            SessionUpdate::Forfeit(patch) => {
                self.status = patch.status;
                self.winner_id = Some(patch.winner_id.clone());
                self.is_game_over = patch.is_game_over;
                self.player1_ready = patch.player1_ready;
                self.player2_ready = patch.player2_ready;
            }
            SessionUpdate::Disconnection(patch) => {
                self.disconnected_player_id =
                    patch.disconnected_player_id().cloned();
                self.player_disconnected_at = patch.player_disconnected_at();
            }
        }
    }
}
