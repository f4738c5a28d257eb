//! The two session handlers.
//!
//! Each request runs the same short pipeline, stopping at the first
//! failure:
//!   1. Decode the body → validate `gameSessionId`
//!   2. Resolve the bearer token → caller `PlayerId`
//!   3. Fetch the session → must exist and be `in_progress`
//!   4. Find the caller's opponent
//!   5. Write the patch, guarded on `in_progress`
//!
//! Steps 3–5 are the public [`forfeit`] and [`set_disconnection`]
//! functions; the `handle_*` wrappers add steps 1–2 for the HTTP layer.

use chrono::{DateTime, Utc};
use gamegate_protocol::{
    Codec, DisconnectionRequest, ForfeitRequest, GameSessionId, PlayerId,
};
use gamegate_session::{
    IdentityResolver, SessionError, SessionStore, SessionUpdate,
    UpdateOutcome, bearer_token,
};

use crate::GamegateError;
use crate::server::ServerState;

/// Reply text for a successful forfeit.
pub const FORFEIT_MESSAGE: &str = "Game forfeited successfully.";

/// Reply text for a successful join/leave update.
pub const DISCONNECTION_MESSAGE: &str = "Disconnection status update.";

/// Resolves the caller from the raw `Authorization` header value.
///
/// # Errors
/// - [`SessionError::NotAuthenticated`] — no header
/// - [`SessionError::AuthFailed`] — empty or rejected token
pub async fn resolve_caller<R: IdentityResolver>(
    resolver: &R,
    authorization: Option<&str>,
) -> Result<PlayerId, SessionError> {
    let token = bearer_token(authorization)?;
    resolver.resolve(token).await
}

/// Loads the session, checks it's still running, and returns the
/// caller's opponent.
async fn opponent_in_progress<S: SessionStore>(
    store: &S,
    session_id: &GameSessionId,
    caller: &PlayerId,
) -> Result<PlayerId, SessionError> {
    let snapshot = store
        .fetch(session_id)
        .await?
        .ok_or_else(|| SessionError::NotFound(session_id.clone()))?;

    if !snapshot.status.is_in_progress() {
        tracing::debug!(
            %session_id, status = %snapshot.status, "session already over"
        );
        return Err(SessionError::GameOver(session_id.clone()));
    }

    snapshot.opponent_of(caller).cloned().ok_or_else(|| {
        SessionError::NotParticipant {
            session_id: session_id.clone(),
            player_id: caller.clone(),
        }
    })
}

/// Writes `update` if the session is still running.
///
/// A guard miss here means another request ended the game between our
/// read and our write, which is reported the same way as a game that was
/// already over when read.
async fn commit<S: SessionStore>(
    store: &S,
    session_id: &GameSessionId,
    update: &SessionUpdate,
) -> Result<(), SessionError> {
    match store.update_in_progress(session_id, update).await? {
        UpdateOutcome::Applied => Ok(()),
        UpdateOutcome::NotInProgress => {
            tracing::debug!(%session_id, "session ended before write");
            Err(SessionError::GameOver(session_id.clone()))
        }
    }
}

/// Ends an in-progress game as a win for the caller's opponent.
///
/// Sets `status = forfeited`, `winner_id`, `is_game_over = true`, and
/// clears both readiness flags in a single guarded write. Returns the
/// winner.
///
/// # Errors
/// - [`SessionError::NotFound`] — no such session
/// - [`SessionError::GameOver`] — not `in_progress` (soft reject)
/// - [`SessionError::NotParticipant`] — caller isn't in this game
/// - [`SessionError::Store`] — the read or write failed
pub async fn forfeit<S: SessionStore>(
    store: &S,
    session_id: &GameSessionId,
    caller: &PlayerId,
) -> Result<PlayerId, SessionError> {
    let winner = opponent_in_progress(store, session_id, caller).await?;
    commit(store, session_id, &SessionUpdate::forfeit(winner.clone())).await?;

    tracing::info!(%session_id, %caller, %winner, "game forfeited");
    Ok(winner)
}

/// Records or clears disconnection metadata for an in-progress game.
///
/// - `is_connecting = true`: clears `disconnected_player_id` and
///   `player_disconnected_at`, whatever they held.
/// - `is_connecting = false`: marks the caller's **opponent** as
///   disconnected since `at`.
///
/// Returns the player now marked disconnected, if any.
///
/// # Errors
/// Same as [`forfeit`].
pub async fn set_disconnection<S: SessionStore>(
    store: &S,
    session_id: &GameSessionId,
    is_connecting: bool,
    caller: &PlayerId,
    at: DateTime<Utc>,
) -> Result<Option<PlayerId>, SessionError> {
    let opponent = opponent_in_progress(store, session_id, caller).await?;

    if is_connecting {
        commit(store, session_id, &SessionUpdate::reconnected()).await?;
        tracing::info!(%session_id, %caller, "disconnection record cleared");
        Ok(None)
    } else {
        let update = SessionUpdate::disconnected(opponent.clone(), at);
        commit(store, session_id, &update).await?;
        tracing::info!(
            %session_id, %caller, disconnected = %opponent, %at,
            "disconnection recorded"
        );
        Ok(Some(opponent))
    }
}

// ---------------------------------------------------------------------------
// Request-level wrappers
// ---------------------------------------------------------------------------

pub(crate) async fn handle_forfeit<R, S, C>(
    state: &ServerState<R, S, C>,
    authorization: Option<&str>,
    body: &[u8],
) -> Result<&'static str, GamegateError>
where
    R: IdentityResolver,
    S: SessionStore,
    C: Codec,
{
    let request: ForfeitRequest = state.codec.decode(body)?;
    let session_id = request.session_id()?;
    let caller = resolve_caller(&state.resolver, authorization).await?;

    forfeit(&state.store, &session_id, &caller).await?;
    Ok(FORFEIT_MESSAGE)
}

pub(crate) async fn handle_disconnection<R, S, C>(
    state: &ServerState<R, S, C>,
    authorization: Option<&str>,
    body: &[u8],
) -> Result<&'static str, GamegateError>
where
    R: IdentityResolver,
    S: SessionStore,
    C: Codec,
{
    let request: DisconnectionRequest = state.codec.decode(body)?;
    let session_id = request.session_id()?;
    let caller = resolve_caller(&state.resolver, authorization).await?;

    set_disconnection(
        &state.store,
        &session_id,
        request.is_connecting(),
        &caller,
        Utc::now(),
    )
    .await?;
    Ok(DISCONNECTION_MESSAGE)
}
