//! Identity resolution for incoming requests.
//!
//! Gamegate doesn't verify tokens itself — that's the identity provider's
//! job. Instead it defines the [`IdentityResolver`] trait: a single async
//! method that takes a bearer token and returns a `PlayerId` or an error.
//! Production wires in the managed platform's auth API; tests use a
//! fixed token table.

use gamegate_protocol::PlayerId;

use crate::SessionError;

/// Verifies a bearer token and returns the caller's identity.
///
/// # Example
///
/// ```rust
/// use gamegate_protocol::PlayerId;
/// use gamegate_session::{IdentityResolver, SessionError};
///
/// /// Treats the token itself as the user ID. Development only.
/// struct EchoResolver;
///
/// impl IdentityResolver for EchoResolver {
///     async fn resolve(&self, token: &str) -> Result<PlayerId, SessionError> {
///         if token.is_empty() {
///             return Err(SessionError::AuthFailed("empty token".into()));
///         }
///         Ok(PlayerId::new(token))
///     }
/// }
/// ```
pub trait IdentityResolver: Send + Sync + 'static {
    /// Validates the token and returns who it belongs to.
    ///
    /// # Returns
    /// - `Ok(PlayerId)` — the token is valid
    /// - `Err(SessionError::AuthFailed)` — invalid, expired, or the
    ///   provider could not be reached
    fn resolve(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<PlayerId, SessionError>> + Send;
}

impl<R: IdentityResolver> IdentityResolver for std::sync::Arc<R> {
    fn resolve(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<PlayerId, SessionError>> + Send
    {
        (**self).resolve(token)
    }
}

/// Extracts the token from an `Authorization` header value.
///
/// A leading `Bearer ` is stripped when present; any other value is taken
/// as the raw token.
///
/// # Errors
/// - [`SessionError::NotAuthenticated`] — no header at all
/// - [`SessionError::AuthFailed`] — the header carries an empty token
pub fn bearer_token(header: Option<&str>) -> Result<&str, SessionError> {
    let header = header.ok_or(SessionError::NotAuthenticated)?;
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    if token.is_empty() {
        return Err(SessionError::AuthFailed("empty bearer token".into()));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_strips_prefix() {
        assert_eq!(bearer_token(Some("Bearer abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn test_bearer_token_accepts_raw_token() {
        assert_eq!(bearer_token(Some("abc.def")).unwrap(), "abc.def");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let err = bearer_token(None).unwrap_err();
        assert!(matches!(err, SessionError::NotAuthenticated));
        assert_eq!(err.to_string(), "User not authenticated.");
    }

    #[test]
    fn test_bearer_token_empty_token() {
        let err = bearer_token(Some("Bearer ")).unwrap_err();
        assert!(matches!(err, SessionError::AuthFailed(_)));
        assert_eq!(err.to_string(), "Authentication failed.");
    }
}
