//! Codec trait and implementations for request and reply bodies.
//!
//! A "codec" (coder/decoder) converts between Rust types and raw bytes.
//! The HTTP layer doesn't care HOW bodies are serialized — it just needs
//! something that implements the [`Codec`] trait. Clients of the game
//! service speak JSON, so [`JsonCodec`] is the only implementation.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` because the codec lives in the shared server
/// state and is used from whichever Tokio worker serves the request.
pub trait Codec: Send + Sync + 'static {
    /// The value of the `Content-Type` header for encoded bodies.
    fn content_type(&self) -> &'static str;

    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use gamegate_protocol::{Codec, ForfeitRequest, JsonCodec, Reply};
///
/// let codec = JsonCodec;
///
/// let request: ForfeitRequest =
///     codec.decode(br#"{"gameSessionId":"s1"}"#).unwrap();
/// assert_eq!(request.session_id().unwrap().as_str(), "s1");
///
/// let bytes = codec.encode(&Reply::message("ok")).unwrap();
/// assert_eq!(bytes, br#"{"message":"ok"}"#);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        data: &[u8],
    ) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{DisconnectionRequest, ForfeitRequest};

    #[test]
    fn test_json_codec_content_type() {
        assert_eq!(JsonCodec.content_type(), "application/json");
    }

    #[test]
    fn test_decode_rejects_empty_body() {
        let result: Result<ForfeitRequest, _> = JsonCodec.decode(b"");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_decode_rejects_wrong_field_type() {
        let result: Result<DisconnectionRequest, _> = JsonCodec
            .decode(br#"{"gameSessionId":"s1","isConnecting":"yes"}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("Invalid request body"));
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let request: ForfeitRequest = JsonCodec
            .decode(br#"{"gameSessionId":"s1","extra":42}"#)
            .unwrap();
        assert_eq!(request.session_id().unwrap().as_str(), "s1");
    }
}
