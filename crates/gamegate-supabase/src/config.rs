//! Connection settings for a Supabase project.

use std::time::Duration;

use crate::SupabaseError;

/// Where the project lives and how to authenticate against it.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`.
    pub url: String,

    /// Service-role key. Bypasses row-level security, so it stays on the
    /// server and is never echoed to clients.
    pub service_role_key: String,

    /// Table holding the game session rows.
    pub table: String,

    /// Per-request timeout for both the auth and REST APIs.
    pub timeout: Duration,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("service_role_key", &"<redacted>")
            .field("table", &self.table)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SupabaseConfig {
    /// Creates a config with the default table and timeout.
    pub fn new(url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            service_role_key: service_role_key.into(),
            table: "game_sessions".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Overrides the table name.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Overrides the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The project URL without a trailing slash.
    pub(crate) fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    pub(crate) fn validate(&self) -> Result<(), SupabaseError> {
        let url = self.base_url();
        if url.is_empty()
            || !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(SupabaseError::InvalidUrl(self.url.clone()));
        }
        if self.service_role_key.is_empty() {
            return Err(SupabaseError::MissingServiceKey);
        }
        Ok(())
    }
}
