//! Game session model and external collaborators for Gamegate.
//!
//! This crate owns everything the handlers need to know about a match:
//!
//! 1. **The row** — [`GameSession`], its [`SessionStatus`], and the
//!    narrower [`SessionSnapshot`] the handlers read.
//! 2. **The patch** — [`SessionUpdate`], the columns a handler writes.
//! 3. **Identity** — the [`IdentityResolver`] trait that turns a bearer
//!    token into a [`PlayerId`](gamegate_protocol::PlayerId).
//! 4. **Storage** — the [`SessionStore`] trait with a guarded
//!    "update while in progress" write, plus [`MemorySessionStore`].
//!
//! # How it fits in the stack
//!
//! ```text
//! Handlers (above)  ← fetch, check, compute the opponent, write
//!     ↕
//! Session Layer (this crate)  ← row model, resolver and store traits
//!     ↕
//! Protocol Layer (below)  ← provides PlayerId, GameSessionId
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod memory;
mod session;
mod store;
mod update;

pub use auth::{IdentityResolver, bearer_token};
pub use error::SessionError;
pub use memory::MemorySessionStore;
pub use session::{GameSession, SessionSnapshot, SessionStatus};
pub use store::{SessionStore, UpdateOutcome};
pub use update::{DisconnectionPatch, ForfeitPatch, SessionUpdate};
