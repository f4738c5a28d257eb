//! Error types for building the Supabase client.
//!
//! Per-request failures are reported as
//! [`SessionError`](gamegate_session::SessionError) because that is what
//! the collaborator traits return; this enum only covers setup.

#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    /// The project URL is empty or not an http(s) URL.
    #[error("invalid Supabase URL: {0:?}")]
    InvalidUrl(String),

    /// The service-role key is empty.
    #[error("missing Supabase service role key")]
    MissingServiceKey,

    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
