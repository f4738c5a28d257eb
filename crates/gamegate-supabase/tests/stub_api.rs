//! Integration tests for the Supabase client against a local stub API.
//!
//! The stub records every request it receives and answers with whatever
//! the test's responder returns, so each test can check both what was
//! sent and how the reply was interpreted.

use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use gamegate_protocol::{GameSessionId, PlayerId};
use gamegate_session::{
    IdentityResolver, SessionError, SessionStatus, SessionStore,
    SessionUpdate, UpdateOutcome,
};
use gamegate_supabase::{SupabaseClient, SupabaseConfig};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

// =========================================================================
// Stub API
// =========================================================================

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    query: String,
    authorization: Option<String>,
    apikey: Option<String>,
    prefer: Option<String>,
    body: String,
}

type Log = Arc<Mutex<Vec<Recorded>>>;
type Responder = Arc<dyn Fn(&Recorded) -> (u16, String) + Send + Sync>;

/// Starts a stub on a random port. Returns its base URL and request log.
async fn stub(
    responder: impl Fn(&Recorded) -> (u16, String) + Send + Sync + 'static,
) -> (String, Log) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let responder: Responder = Arc::new(responder);

    let task_log = Arc::clone(&log);
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let log = Arc::clone(&task_log);
            let responder = Arc::clone(&responder);
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let log = Arc::clone(&log);
                    let responder = Arc::clone(&responder);
                    async move {
                        let (parts, body) = req.into_parts();
                        let body = body
                            .collect()
                            .await
                            .map(|c| c.to_bytes())
                            .unwrap_or_default();
                        let header = |name: &str| {
                            parts
                                .headers
                                .get(name)
                                .and_then(|v| v.to_str().ok())
                                .map(str::to_owned)
                        };
                        let recorded = Recorded {
                            method: parts.method.to_string(),
                            path: parts.uri.path().to_owned(),
                            query: parts.uri.query().unwrap_or("").to_owned(),
                            authorization: header("authorization"),
                            apikey: header("apikey"),
                            prefer: header("prefer"),
                            body: String::from_utf8_lossy(&body).into_owned(),
                        };
                        let (status, reply) = responder(&recorded);
                        log.lock().unwrap().push(recorded);
                        Ok::<_, Infallible>(
                            Response::builder()
                                .status(status)
                                .header("content-type", "application/json")
                                .body(Full::new(Bytes::from(reply)))
                                .unwrap(),
                        )
                    }
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    (format!("http://{addr}"), log)
}

fn client(url: &str) -> SupabaseClient {
    SupabaseClient::new(SupabaseConfig::new(url, "service-key")).unwrap()
}

fn only_request(log: &Log) -> Recorded {
    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1, "expected exactly one request");
    log[0].clone()
}

fn sid() -> GameSessionId {
    GameSessionId::new("s1")
}

// =========================================================================
// IdentityResolver
// =========================================================================

#[tokio::test]
async fn test_resolve_returns_user_id() {
    let (url, log) =
        stub(|_| (200, r#"{"id":"user-a","email":"a@example.com"}"#.into()))
            .await;

    let player = client(&url).resolve("user-token").await.unwrap();
    assert_eq!(player, PlayerId::new("user-a"));

    let req = only_request(&log);
    assert_eq!(req.method, "GET");
    assert_eq!(req.path, "/auth/v1/user");
    assert_eq!(req.authorization.as_deref(), Some("Bearer user-token"));
    assert_eq!(req.apikey.as_deref(), Some("service-key"));
}

#[tokio::test]
async fn test_resolve_rejected_token_is_auth_failure() {
    let (url, _log) =
        stub(|_| (401, r#"{"msg":"invalid JWT"}"#.into())).await;

    let err = client(&url).resolve("expired").await.unwrap_err();
    assert!(matches!(err, SessionError::AuthFailed(_)));
    assert_eq!(err.to_string(), "Authentication failed.");
}

// =========================================================================
// SessionStore::fetch
// =========================================================================

#[tokio::test]
async fn test_fetch_reads_snapshot_with_service_role() {
    let (url, log) = stub(|_| {
        (
            200,
            r#"[{"id":"s1","player1_id":"A","player2_id":"B","status":"in_progress"}]"#
                .into(),
        )
    })
    .await;

    let snap = client(&url).fetch(&sid()).await.unwrap().unwrap();
    assert_eq!(snap.player1_id, PlayerId::new("A"));
    assert_eq!(snap.player2_id, PlayerId::new("B"));
    assert_eq!(snap.status, SessionStatus::InProgress);

    let req = only_request(&log);
    assert_eq!(req.method, "GET");
    assert_eq!(req.path, "/rest/v1/game_sessions");
    assert!(req.query.contains("id=eq.s1"), "query: {}", req.query);
    assert!(req.query.contains("select="), "query: {}", req.query);
    assert_eq!(req.authorization.as_deref(), Some("Bearer service-key"));
    assert_eq!(req.apikey.as_deref(), Some("service-key"));
}

#[tokio::test]
async fn test_fetch_no_rows_is_none() {
    let (url, _log) = stub(|_| (200, "[]".into())).await;
    assert!(client(&url).fetch(&sid()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_fetch_malformed_id_is_none() {
    let (url, _log) = stub(|_| {
        (
            400,
            r#"{"code":"22P02","message":"invalid input syntax for type uuid"}"#
                .into(),
        )
    })
    .await;
    assert!(client(&url).fetch(&sid()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_fetch_server_error_propagates_message() {
    let (url, _log) =
        stub(|_| (503, r#"{"message":"database is starting up"}"#.into()))
            .await;

    let err = client(&url).fetch(&sid()).await.unwrap_err();
    assert!(matches!(err, SessionError::Store(_)));
    assert_eq!(err.to_string(), "database is starting up");
}

// =========================================================================
// SessionStore::update_in_progress
// =========================================================================

#[tokio::test]
async fn test_update_sends_guarded_patch() {
    let (url, log) = stub(|_| (200, r#"[{"id":"s1"}]"#.into())).await;

    let outcome = client(&url)
        .update_in_progress(&sid(), &SessionUpdate::forfeit(PlayerId::new("B")))
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::Applied);

    let req = only_request(&log);
    assert_eq!(req.method, "PATCH");
    assert_eq!(req.path, "/rest/v1/game_sessions");
    assert!(req.query.contains("id=eq.s1"), "query: {}", req.query);
    assert!(
        req.query.contains("status=eq.in_progress"),
        "query: {}",
        req.query
    );
    assert_eq!(req.prefer.as_deref(), Some("return=representation"));

    let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
    assert_eq!(body["status"], "forfeited");
    assert_eq!(body["winner_id"], "B");
    assert_eq!(body["is_game_over"], true);
    assert_eq!(body["player1_ready"], false);
    assert_eq!(body["player2_ready"], false);
}

#[tokio::test]
async fn test_update_sends_null_pair_on_reconnect() {
    let (url, log) = stub(|_| (200, r#"[{"id":"s1"}]"#.into())).await;

    client(&url)
        .update_in_progress(&sid(), &SessionUpdate::reconnected())
        .await
        .unwrap();

    let body: serde_json::Value =
        serde_json::from_str(&only_request(&log).body).unwrap();
    assert!(body["disconnected_player_id"].is_null());
    assert!(body["player_disconnected_at"].is_null());
    assert_eq!(body.as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_no_matching_row_is_not_in_progress() {
    let (url, _log) = stub(|_| (200, "[]".into())).await;

    let at = chrono::Utc::now();
    let outcome = client(&url)
        .update_in_progress(
            &sid(),
            &SessionUpdate::disconnected(PlayerId::new("A"), at),
        )
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::NotInProgress);
}

#[tokio::test]
async fn test_update_failure_without_body_uses_status() {
    let (url, _log) = stub(|_| (500, String::new())).await;

    let err = client(&url)
        .update_in_progress(&sid(), &SessionUpdate::reconnected())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "session store returned 500 Internal Server Error"
    );
}
