//! Supabase adapter for Gamegate.
//!
//! A single [`SupabaseClient`] implements both collaborator traits from
//! `gamegate-session`:
//!
//! - [`IdentityResolver`](gamegate_session::IdentityResolver) via the auth
//!   API (`GET /auth/v1/user`), which validates a user's access token.
//! - [`SessionStore`](gamegate_session::SessionStore) via the REST API
//!   (`/rest/v1/game_sessions`), using the service-role key.
//!
//! The guarded write is a `PATCH` filtered on both the ID and
//! `status=eq.in_progress`, with `Prefer: return=representation` so an
//! empty result tells us the guard didn't match.

mod client;
mod config;
mod error;

pub use client::SupabaseClient;
pub use config::SupabaseConfig;
pub use error::SupabaseError;
