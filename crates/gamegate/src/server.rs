//! `GamegateServer` builder and accept loop.
//!
//! One Tokio task per TCP connection; each request on it runs the handler
//! pipeline to completion with no state shared between requests beyond
//! the read-only collaborators in [`ServerState`].

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use gamegate_protocol::{Codec, JsonCodec};
use gamegate_session::{IdentityResolver, SessionStore};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use crate::config::{DEFAULT_BIND, DEFAULT_MAX_BODY_BYTES};
use crate::http::route;
use crate::{GamegateError, ServerConfig};

/// Shared server state passed to each connection task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. Nothing in
/// here is mutated after startup.
pub(crate) struct ServerState<R, S, C> {
    pub(crate) resolver: R,
    pub(crate) store: S,
    pub(crate) codec: C,
    pub(crate) max_body_bytes: usize,
}

/// Builder for configuring and starting a Gamegate server.
///
/// # Example
///
/// ```rust,ignore
/// let server = GamegateServer::builder()
///     .bind("0.0.0.0:8000")
///     .build(resolver, store)
///     .await?;
/// server.run().await
/// ```
#[derive(Debug, Clone)]
pub struct GamegateServerBuilder {
    bind_addr: String,
    max_body_bytes: usize,
}

impl GamegateServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: DEFAULT_BIND.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Creates a builder from the listener settings of `config`.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            bind_addr: config.bind_addr.clone(),
            max_body_bytes: config.max_body_bytes,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Caps the size of a request body.
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Binds the listener and assembles the server with the given
    /// collaborators, using [`JsonCodec`] for bodies.
    pub async fn build<R, S>(
        self,
        resolver: R,
        store: S,
    ) -> Result<GamegateServer<R, S, JsonCodec>, GamegateError>
    where
        R: IdentityResolver,
        S: SessionStore,
    {
        let listener = TcpListener::bind(&self.bind_addr).await?;
        tracing::info!(addr = %self.bind_addr, "HTTP listener bound");

        let state = Arc::new(ServerState {
            resolver,
            store,
            codec: JsonCodec,
            max_body_bytes: self.max_body_bytes,
        });

        Ok(GamegateServer { listener, state })
    }
}

impl Default for GamegateServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Gamegate server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct GamegateServer<R, S, C> {
    listener: TcpListener,
    state: Arc<ServerState<R, S, C>>,
}

impl GamegateServer<(), (), ()> {
    /// Creates a new builder.
    pub fn builder() -> GamegateServerBuilder {
        GamegateServerBuilder::new()
    }
}

impl<R, S, C> GamegateServer<R, S, C>
where
    R: IdentityResolver,
    S: SessionStore,
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves connections until the process is terminated.
    pub async fn run(self) -> Result<(), GamegateError> {
        self.run_until(std::future::pending()).await
    }

    /// Serves connections until `shutdown` resolves.
    ///
    /// Stops accepting at that point; connections already accepted run
    /// to completion on their own tasks.
    pub async fn run_until(
        self,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), GamegateError> {
        tokio::pin!(shutdown);
        tracing::info!("Gamegate server running");

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown requested, no longer accepting");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let state = Arc::clone(&self.state);
                        tokio::spawn(async move {
                            let service = service_fn(move |req| {
                                route(req, Arc::clone(&state))
                            });
                            if let Err(e) = http1::Builder::new()
                                .serve_connection(TokioIo::new(stream), service)
                                .await
                            {
                                tracing::debug!(
                                    %peer, error = %e,
                                    "connection ended with error"
                                );
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept failed");
                    }
                },
            }
        }
    }
}
