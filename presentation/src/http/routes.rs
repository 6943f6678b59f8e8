//! HTTP routes

use super::multiplexer::{Framing, relay};
use super::request::ChatBody;
use assistant_application::{RunTurnError, RunTurnUseCase};
use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::StreamExt;
use serde_json::{Value, json};
use std::convert::Infallible;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Health endpoint path.
pub const HEALTH_PATH: &str = "/health";
/// Chat endpoint path.
pub const CHAT_PATH: &str = "/api/chat";

/// Errors returned before the response stream starts
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (code, body).into_response()
    }
}

impl From<RunTurnError> for ApiError {
    fn from(e: RunTurnError) -> Self {
        match e {
            RunTurnError::InvalidConversation(inner) => ApiError::BadRequest(inner.to_string()),
        }
    }
}

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    pub use_case: RunTurnUseCase,
    pub framing: Framing,
    /// Cancelled on shutdown; every turn runs under a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(use_case: RunTurnUseCase, framing: Framing) -> Self {
        Self {
            use_case,
            framing,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(CHAT_PATH, post(chat))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn chat(
    State(st): State<AppState>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let input = body.into_input()?;
    debug!(
        messages = input.messages.len(),
        products = input.configurations.len(),
        "Chat request accepted"
    );

    let handle = st.use_case.start(input, st.shutdown.child_token())?;
    info!(turn_id = %handle.turn_id, framing = %st.framing, "Streaming turn");

    // Dropping the body drops the receiver, which the turn observes as a
    // disconnect.
    let events = futures::stream::unfold(handle.events, |mut rx| async move {
        rx.recv().await.map(|event| (event, rx))
    });
    let frames = relay(Box::pin(events), st.framing).map(Ok::<_, Infallible>);

    Ok((stream_headers(st.framing), Body::from_stream(frames)).into_response())
}

fn stream_headers(framing: Framing) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(framing.content_type()),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    if framing == Framing::DataStream {
        headers.insert(
            HeaderName::from_static("x-vercel-ai-data-stream"),
            HeaderValue::from_static("v1"),
        );
    }
    headers
}
