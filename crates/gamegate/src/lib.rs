//! # Gamegate
//!
//! HTTP handlers that end or annotate a two-player game session.
//!
//! Two endpoints, each a single authenticated read-check-write against one
//! session row:
//!
//! - **`POST /request-forfeit`** — the caller concedes; the opponent wins.
//! - **`POST /set-disconnection-time`** — a join/leave event records or
//!   clears which participant is disconnected and since when.
//!
//! Identity and storage are external collaborators behind the
//! [`IdentityResolver`] and [`SessionStore`] traits. The server is generic
//! over both, so the same handlers run against the managed platform in
//! production and an in-memory store in tests.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gamegate::prelude::*;
//!
//! # async fn start(resolver: impl IdentityResolver) -> Result<(), GamegateError> {
//! let server = GamegateServer::builder()
//!     .bind("0.0.0.0:8000")
//!     .build(resolver, MemorySessionStore::new())
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod http;
mod server;

pub use config::{ConfigError, ServerConfig};
pub use error::GamegateError;
pub use handler::{
    DISCONNECTION_MESSAGE, FORFEIT_MESSAGE, forfeit, resolve_caller,
    set_disconnection,
};
pub use http::{ALLOWED_HEADERS, Endpoint};
pub use server::{GamegateServer, GamegateServerBuilder};

pub mod prelude {
    //! Everything needed to assemble and run a server.

    pub use crate::{
        ConfigError, Endpoint, GamegateError, GamegateServer,
        GamegateServerBuilder, ServerConfig,
    };
    pub use gamegate_protocol::{
        DisconnectionRequest, ForfeitRequest, GameSessionId, PlayerId, Reply,
    };
    pub use gamegate_session::{
        GameSession, IdentityResolver, MemorySessionStore, SessionError,
        SessionSnapshot, SessionStatus, SessionStore, SessionUpdate,
        UpdateOutcome,
    };
}
