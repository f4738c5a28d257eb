//! Column patches written by the handlers.
//!
//! A [`SessionUpdate`] serializes to exactly the JSON object sent to the
//! store, e.g.
//!
//! ```text
//! {"status":"forfeited","winner_id":"B","is_game_over":true,
//!  "player1_ready":false,"player2_ready":false}
//! {"disconnected_player_id":"A","player_disconnected_at":"2026-10-19T12:00:00Z"}
//! {"disconnected_player_id":null,"player_disconnected_at":null}
//! ```

use chrono::{DateTime, Utc};
use gamegate_protocol::PlayerId;
use serde::Serialize;

use crate::SessionStatus;

/// One of the two writes Gamegate performs on a session row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SessionUpdate {
    Forfeit(ForfeitPatch),
    Disconnection(DisconnectionPatch),
}

impl SessionUpdate {
    /// Ends the game as a forfeit won by `winner_id`.
    pub fn forfeit(winner_id: PlayerId) -> Self {
        Self::Forfeit(ForfeitPatch {
            status: SessionStatus::Forfeited,
            winner_id,
            is_game_over: true,
            player1_ready: false,
            player2_ready: false,
        })
    }

    /// Records `player_id` as disconnected since `at`.
    pub fn disconnected(player_id: PlayerId, at: DateTime<Utc>) -> Self {
        Self::Disconnection(DisconnectionPatch {
            disconnected_player_id: Some(player_id),
            player_disconnected_at: Some(at),
        })
    }

    /// Clears any outstanding disconnection record.
    pub fn reconnected() -> Self {
        Self::Disconnection(DisconnectionPatch {
            disconnected_player_id: None,
            player_disconnected_at: None,
        })
    }
}

/// Columns written when a player concedes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForfeitPatch {
    pub status: SessionStatus,
    pub winner_id: PlayerId,
    pub is_game_over: bool,
    pub player1_ready: bool,
    pub player2_ready: bool,
}

/// Columns written on a join/leave event.
///
/// Fields are private so the pair can only be built set-together or
/// cleared-together through [`SessionUpdate`]. `None` serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisconnectionPatch {
    disconnected_player_id: Option<PlayerId>,
    player_disconnected_at: Option<DateTime<Utc>>,
}

impl DisconnectionPatch {
    pub fn disconnected_player_id(&self) -> Option<&PlayerId> {
        self.disconnected_player_id.as_ref()
    }

    pub fn player_disconnected_at(&self) -> Option<DateTime<Utc>> {
        self.player_disconnected_at
    }

    /// `true` if this patch clears the record.
    pub fn is_clear(&self) -> bool {
        self.disconnected_player_id.is_none()
    }
}
