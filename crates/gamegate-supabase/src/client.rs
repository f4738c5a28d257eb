//! HTTP client for the Supabase auth and REST APIs.

use gamegate_protocol::{GameSessionId, PlayerId};
use gamegate_session::{
    IdentityResolver, SessionError, SessionSnapshot, SessionStore,
    SessionUpdate, UpdateOutcome,
};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;

use crate::{SupabaseConfig, SupabaseError};

/// Columns selected when reading a session.
const SNAPSHOT_COLUMNS: &str = "id,player1_id,player2_id,status";

/// The user object returned by `GET /auth/v1/user`. Only the ID matters.
#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
}

/// Error body returned by the REST API.
#[derive(Debug, Deserialize)]
struct RestError {
    #[serde(default)]
    message: String,
}

/// A Supabase project client holding the service-role key.
///
/// Cheap to clone: `reqwest::Client` is reference-counted internally.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    config: SupabaseConfig,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("url", &self.config.url)
            .field("table", &self.config.table)
            .finish_non_exhaustive()
    }
}

impl SupabaseClient {
    /// Validates the config and builds the HTTP client.
    pub fn new(config: SupabaseConfig) -> Result<Self, SupabaseError> {
        config.validate()?;
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    fn auth_url(&self) -> String {
        format!("{}/auth/v1/user", self.config.base_url())
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.base_url(), self.config.table)
    }

    /// Starts a REST request authenticated as the service role.
    fn rest(&self, method: reqwest::Method) -> reqwest::RequestBuilder {
        self.http
            .request(method, self.table_url())
            .header("apikey", &self.config.service_role_key)
            .bearer_auth(&self.config.service_role_key)
            .header(reqwest::header::ACCEPT, "application/json")
    }
}

/// Turns a non-success REST response into a store error, preferring the
/// API's own `message`.
async fn store_error(response: Response) -> SessionError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<RestError>(&body)
        .ok()
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("session store returned {status}"));
    SessionError::Store(message)
}

fn transport_error(err: reqwest::Error) -> SessionError {
    SessionError::Store(format!("session store unreachable: {err}"))
}

impl IdentityResolver for SupabaseClient {
    async fn resolve(&self, token: &str) -> Result<PlayerId, SessionError> {
        let response = self
            .http
            .get(self.auth_url())
            .header("apikey", &self.config.service_role_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SessionError::AuthFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::AuthFailed(format!(
                "identity provider returned {status}"
            )));
        }

        let user: AuthUser = response
            .json()
            .await
            .map_err(|e| SessionError::AuthFailed(e.to_string()))?;
        if user.id.is_empty() {
            return Err(SessionError::AuthFailed("user has no id".into()));
        }
        Ok(PlayerId::new(user.id))
    }
}

impl SessionStore for SupabaseClient {
    async fn fetch(
        &self,
        id: &GameSessionId,
    ) -> Result<Option<SessionSnapshot>, SessionError> {
        let response = self
            .rest(reqwest::Method::GET)
            .query(&[
                ("id", format!("eq.{id}")),
                ("select", SNAPSHOT_COLUMNS.to_string()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        // A malformed ID (e.g. not a UUID) is rejected by the database
        // with 400; no row can match it.
        if response.status() == StatusCode::BAD_REQUEST {
            tracing::debug!(session_id = %id, "session id rejected by store");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(store_error(response).await);
        }

        let mut rows: Vec<SessionSnapshot> =
            response.json().await.map_err(transport_error)?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    async fn update_in_progress(
        &self,
        id: &GameSessionId,
        update: &SessionUpdate,
    ) -> Result<UpdateOutcome, SessionError> {
        let response = self
            .rest(reqwest::Method::PATCH)
            .query(&[
                ("id", format!("eq.{id}")),
                ("status", "eq.in_progress".to_string()),
                ("select", "id".to_string()),
            ])
            .header("Prefer", "return=representation")
            .json(update)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(store_error(response).await);
        }

        // One element per row that matched both filters.
        let rows: Vec<serde_json::Value> =
            response.json().await.map_err(transport_error)?;
        Ok(if rows.is_empty() {
            UpdateOutcome::NotInProgress
        } else {
            UpdateOutcome::Applied
        })
    }
}
