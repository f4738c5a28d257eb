//! Wire protocol for Gamegate.
//!
//! This crate defines what clients send and what they get back:
//!
//! - **Types** ([`ForfeitRequest`], [`DisconnectionRequest`], [`Reply`],
//!   [`PlayerId`], [`GameSessionId`]) — the JSON bodies on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those bodies are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — malformed or incomplete requests.
//!
//! # Architecture
//!
//! The protocol layer sits between the HTTP plumbing (raw bytes) and the
//! session layer (who is playing which game). It knows nothing about
//! databases or identity providers.
//!
//! ```text
//! HTTP (bytes) → Protocol (request bodies) → Session (game rows)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    DisconnectionRequest, ForfeitRequest, GameSessionId, PlayerId, Reply,
};
