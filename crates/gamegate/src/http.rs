//! HTTP routing, CORS, and reply encoding.

use std::convert::Infallible;
use std::sync::Arc;

use gamegate_protocol::{Codec, ProtocolError, Reply};
use gamegate_session::{IdentityResolver, SessionError, SessionStore};
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::header::{self, HeaderMap, HeaderValue};
use hyper::{Method, Request, Response, StatusCode};

use crate::GamegateError;
use crate::handler::{handle_disconnection, handle_forfeit};
use crate::server::ServerState;

/// Request headers browsers may send cross-origin.
pub const ALLOWED_HEADERS: &str =
    "authorization, x-client-info, apikey, content-type";

/// The managed platform serves functions under this prefix; it's
/// accepted but not required.
const FUNCTIONS_PREFIX: &str = "/functions/v1";

/// The routable endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Forfeit,
    Disconnection,
}

impl Endpoint {
    /// Matches a request path, with or without the functions prefix.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.strip_prefix(FUNCTIONS_PREFIX).unwrap_or(path);
        match path.trim_end_matches('/') {
            "/request-forfeit" => Some(Self::Forfeit),
            "/set-disconnection-time" => Some(Self::Disconnection),
            _ => None,
        }
    }

    /// The canonical path of this endpoint.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Forfeit => "/request-forfeit",
            Self::Disconnection => "/set-disconnection-time",
        }
    }
}

/// hyper service entry point: reads the body, then dispatches.
pub(crate) async fn route<R, S, C>(
    req: Request<Incoming>,
    state: Arc<ServerState<R, S, C>>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    R: IdentityResolver,
    S: SessionStore,
    C: Codec,
{
    let (parts, body) = req.into_parts();

    // Preflight never needs the body.
    if parts.method == Method::OPTIONS {
        return Ok(preflight());
    }

    let body = match Limited::new(body, state.max_body_bytes).collect().await
    {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            let err = GamegateError::from(ProtocolError::InvalidMessage(
                format!("failed to read body: {e}"),
            ));
            tracing::debug!(error = %err, "rejecting unreadable body");
            return Ok(error_reply(&state.codec, &err));
        }
    };

    let response =
        dispatch(&*state, &parts.method, parts.uri.path(), &parts.headers, &body)
            .await;
    Ok(response)
}

/// Routes one request whose body has already been read.
pub(crate) async fn dispatch<R, S, C>(
    state: &ServerState<R, S, C>,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Response<Full<Bytes>>
where
    R: IdentityResolver,
    S: SessionStore,
    C: Codec,
{
    if method == Method::OPTIONS {
        return preflight();
    }

    let Some(endpoint) = Endpoint::from_path(path) else {
        return reply(&state.codec, StatusCode::NOT_FOUND, &Reply::error("Not found."));
    };

    if method != Method::POST {
        let mut response = reply(
            &state.codec,
            StatusCode::METHOD_NOT_ALLOWED,
            &Reply::error("Method not allowed."),
        );
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static("POST, OPTIONS"));
        return response;
    }

    // A non-ASCII header can't be a bearer token; treat it as absent.
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let result = match endpoint {
        Endpoint::Forfeit => handle_forfeit(state, authorization, body).await,
        Endpoint::Disconnection => {
            handle_disconnection(state, authorization, body).await
        }
    };

    match result {
        Ok(message) => {
            reply(&state.codec, StatusCode::OK, &Reply::message(message))
        }
        Err(err) => {
            log_failure(endpoint, &err);
            error_reply(&state.codec, &err)
        }
    }
}

fn log_failure(endpoint: Endpoint, err: &GamegateError) {
    let path = endpoint.path();
    match err {
        GamegateError::Session(SessionError::Store(_)) => {
            tracing::error!(path, error = %err, "session store failure");
        }
        GamegateError::Session(SessionError::AuthFailed(reason)) => {
            tracing::info!(path, %reason, "authentication failed");
        }
        e if e.is_game_over() => {
            tracing::debug!(path, "rejected: game already over");
        }
        _ => {
            tracing::info!(path, error = %err, "request rejected");
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Adds the cross-origin headers every response carries.
fn with_cors(response: &mut Response<Full<Bytes>>) {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
}

/// 200 `ok` for cross-origin preflight.
fn preflight() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(b"ok")));
    with_cors(&mut response);
    response
}

fn error_reply(codec: &impl Codec, err: &GamegateError) -> Response<Full<Bytes>> {
    reply(codec, err.status_code(), &err.to_reply())
}

/// Encodes `body` with the codec and sets status, content type and CORS.
fn reply(
    codec: &impl Codec,
    status: StatusCode,
    body: &Reply,
) -> Response<Full<Bytes>> {
    let mut response = match codec.encode(body) {
        Ok(bytes) => {
            let mut response = Response::new(Full::new(Bytes::from(bytes)));
            *response.status_mut() = status;
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static(codec.content_type()),
            );
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to encode reply");
            let mut response = Response::new(Full::new(Bytes::from_static(
                br#"{"error":"Internal server error."}"#,
            )));
            *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            response
        }
    };
    with_cors(&mut response);
    response
}
