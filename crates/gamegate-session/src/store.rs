//! The storage seam: reading a session and writing a guarded patch.

use std::future::Future;
use std::sync::Arc;

use gamegate_protocol::GameSessionId;

use crate::{SessionError, SessionSnapshot, SessionUpdate};

/// Result of a guarded write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The row was `in_progress` and the patch was written.
    Applied,
    /// The row was not `in_progress` (or no longer exists) at write time;
    /// nothing was written.
    NotInProgress,
}

/// Read and conditional-write access to game session rows.
///
/// The check "is this session still in progress?" and the write happen
/// in a single store operation ([`update_in_progress`](Self::update_in_progress)),
/// so two requests racing on the same row can't both commit.
pub trait SessionStore: Send + Sync + 'static {
    /// Loads the columns a handler needs. `Ok(None)` if no such row.
    fn fetch(
        &self,
        id: &GameSessionId,
    ) -> impl Future<Output = Result<Option<SessionSnapshot>, SessionError>> + Send;

    /// Writes `update` only if the row's status is `in_progress`.
    fn update_in_progress(
        &self,
        id: &GameSessionId,
        update: &SessionUpdate,
    ) -> impl Future<Output = Result<UpdateOutcome, SessionError>> + Send;
}

impl<S: SessionStore> SessionStore for Arc<S> {
    fn fetch(
        &self,
        id: &GameSessionId,
    ) -> impl Future<Output = Result<Option<SessionSnapshot>, SessionError>> + Send
    {
        (**self).fetch(id)
    }

    fn update_in_progress(
        &self,
        id: &GameSessionId,
        update: &SessionUpdate,
    ) -> impl Future<Output = Result<UpdateOutcome, SessionError>> + Send
    {
        (**self).update_in_progress(id, update)
    }
}
