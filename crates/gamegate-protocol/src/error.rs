//! Error types for the protocol layer.
//!
//! Each crate in Gamegate defines its own error enum. A `ProtocolError`
//! always means the request itself was unusable: bad JSON, a missing
//! field, or a reply that could not be serialized.

/// Errors that can occur in the protocol layer.
///
/// The `Display` strings of the request-validation variants are sent to
/// clients verbatim inside the `{ "error": ... }` envelope, so they read
/// as sentences rather than log fragments.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serializing a reply failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The request body was not valid JSON for the endpoint.
    ///
    /// Common causes: an empty body, a non-object body, or a field with
    /// the wrong type (e.g. `"isConnecting": "yes"`).
    #[cfg(feature = "json")]
    #[error("Invalid request body: {0}")]
    Decode(serde_json::Error),

    /// `gameSessionId` was absent, `null`, or an empty string.
    #[error("Game session ID is required.")]
    MissingSessionId,

    /// The request could not be read or violates a protocol rule that
    /// isn't covered by deserialization (e.g. an oversized body).
    #[error("Invalid request: {0}")]
    InvalidMessage(String),
}
