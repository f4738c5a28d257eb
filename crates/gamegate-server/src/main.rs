//! Runs the Gamegate handlers against a Supabase project.
//!
//! ```text
//! SUPABASE_URL=https://<project>.supabase.co \
//! SUPABASE_SERVICE_ROLE_KEY=... \
//! RUST_LOG=gamegate=debug \
//! gamegate
//! ```

use std::future::Future;
use std::sync::Arc;

use gamegate::prelude::*;
use gamegate_supabase::{SupabaseClient, SupabaseConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");

    // One client serves as both the identity resolver and the store.
    let client = Arc::new(SupabaseClient::new(SupabaseConfig::new(
        config.supabase_url.clone(),
        config.service_role_key.clone(),
    ))?);

    let server = GamegateServerBuilder::from_config(&config)
        .build(Arc::clone(&client), client)
        .await?;
    tracing::info!(addr = %server.local_addr()?, "starting gamegate");

    server
        .run_until(shutdown_on(tokio::signal::ctrl_c()))
        .await?;

    tracing::info!("gamegate stopped");
    Ok(())
}

/// Resolves once `signal` fires.
///
/// If the handler can't be installed the server keeps running instead of
/// stopping before it has served anything.
async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "failed to listen for shutdown signal, running until killed"
            );
            std::future::pending::<()>().await;
        }
    }
}
