//! Local web gateway.
//!
//! Exposes the session gateway over HTTP for browser clients. Every
//! handler answers with the gateway's `ResponseBody`; the status code is
//! derived from the failure code.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower::timeout::error::Elapsed;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use growatt_core::{ErrorCode, Failure, GatewayError, GatewayResult, Outcome, ResponseBody};

use crate::cli::{GlobalOpts, ServeArgs};
use crate::error::CliError;

use super::Gateway;

/// Slack on top of the upstream timeout: a request may log in and then read.
const REQUEST_TIMEOUT_FACTOR: u32 = 3;

pub async fn handle(
    gateway: Gateway,
    args: ServeArgs,
    bind: &str,
    upstream_timeout: Duration,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let bind = args.bind.as_deref().unwrap_or(bind);
    let addr: SocketAddr = bind.parse().map_err(|e| CliError::Validation {
        field: "bind".into(),
        reason: format!("'{bind}': {e}"),
    })?;

    let request_timeout = upstream_timeout
        .checked_mul(REQUEST_TIMEOUT_FACTOR)
        .ok_or_else(|| CliError::Validation {
            field: "timeout".into(),
            reason: format!("{}s is too large", upstream_timeout.as_secs()),
        })?;

    if !addr.ip().is_loopback() {
        warn!(%addr, "gateway is reachable from the network; it serves data without authentication");
    }

    let app = router(gateway, request_timeout);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "serving Growatt gateway");
    if !global.quiet {
        eprintln!("Listening on http://{addr}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
    }
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router(gateway: Gateway, request_timeout: Duration) -> Router {
    let on_error = gateway.clone();
    Router::new()
        .route("/api/session", get(session))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/plants", get(plants))
        .route("/api/plants/:id", get(plant))
        .route("/api/plants/:id/devices", get(devices))
        .route("/api/plants/:id/weather", get(weather))
        .route("/api/plants/:id/faults", get(faults))
        .with_state(gateway)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(move |err: BoxError| {
                    let gateway = on_error.clone();
                    async move { middleware_failure(&gateway, &err) }
                }))
                .timeout(request_timeout),
        )
        .layer(TraceLayer::new_for_http())
}

/// Failures raised by the middleware stack, in the same body shape as
/// handler failures.
fn middleware_failure(gateway: &Gateway, err: &BoxError) -> Response {
    let (status, message) = if err.is::<Elapsed>() {
        (StatusCode::GATEWAY_TIMEOUT, "request timed out".to_owned())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    };
    warn!(%status, error = %message, "request failed in middleware");
    let failure = Failure::new(&GatewayError::Transport { message }, gateway.is_session_valid());
    let body = ResponseBody::<()>::new(Err(failure), false);
    (status, Json(body)).into_response()
}

/// HTTP status for a failure code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::MissingCredentials | ErrorCode::AuthenticationFailed => StatusCode::UNAUTHORIZED,
        ErrorCode::ParameterError => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::TransportError | ErrorCode::UnexpectedFormat => StatusCode::BAD_GATEWAY,
    }
}

fn respond<T: Serialize>(
    gateway: &Gateway,
    result: GatewayResult<T>,
    message: Option<&str>,
) -> Response {
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(failure) => status_for(failure.code),
    };
    let mut body = ResponseBody::new(result, gateway.is_session_valid());
    if let Some(message) = message {
        body = body.with_message(message);
    }
    (status, Json(body)).into_response()
}

// ── Handlers ────────────────────────────────────────────────────────

async fn session(State(gateway): State<Gateway>) -> Response {
    let snapshot = gateway.session_status();
    let authenticated = snapshot.authenticated;
    (
        StatusCode::OK,
        Json(ResponseBody::new(Ok(Outcome::Data(snapshot)), authenticated)),
    )
        .into_response()
}

async fn login(State(gateway): State<Gateway>) -> Response {
    let result = gateway.login().await;
    let message = result.as_ref().ok().and_then(Outcome::data).map(|s| s.message());
    respond(&gateway, result, message)
}

async fn logout(State(gateway): State<Gateway>) -> Response {
    let result = gateway.logout().await;
    let message = result.as_ref().ok().and_then(Outcome::data).map(|s| s.message());
    respond(&gateway, result, message)
}

async fn plants(State(gateway): State<Gateway>) -> Response {
    let result = gateway.plants().await;
    respond(&gateway, result, None)
}

async fn plant(State(gateway): State<Gateway>, Path(id): Path<String>) -> Response {
    let result = gateway.plant(&id).await;
    respond(&gateway, result, None)
}

async fn weather(State(gateway): State<Gateway>, Path(id): Path<String>) -> Response {
    let result = gateway.weather(&id).await;
    respond(&gateway, result, None)
}

async fn devices(
    State(gateway): State<Gateway>,
    Path(id): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    fetch(&gateway, "devices", id, params).await
}

async fn faults(
    State(gateway): State<Gateway>,
    Path(id): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    fetch(&gateway, "fault_logs", id, params).await
}

/// Generic read with query-string parameters; the path id wins.
async fn fetch(
    gateway: &Gateway,
    resource: &str,
    id: String,
    mut params: BTreeMap<String, String>,
) -> Response {
    params.insert("id".into(), id);
    let result = gateway.fetch_named(resource, &params).await;
    respond(gateway, result, None)
}
