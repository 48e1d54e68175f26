//! Resolution and dispatch of gateway traffic.
//!
//! Two entry points share one dispatcher:
//!
//! - [`execute_handler`] - `GET /?to=<id>`, explicit lookup by id
//! - [`no_route_handler`] - router fallback, implicit lookup by request host
//!
//! A resolved record is handed to [`crate::proxy::ProxyForwarder`], which
//! answers with a `307` or relays the exchange.

use axum::{
    extract::{Query, Request, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, info};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::extract_host::extract_host;

/// Query string of `GET /` as ordered key/value pairs.
pub type ExecuteParams = Vec<(String, String)>;

/// First `to` value, if any. Later repetitions are ignored.
fn first_to(params: ExecuteParams) -> Option<String> {
    params
        .into_iter()
        .find_map(|(key, value)| (key == "to").then_some(value))
}

/// Terminal state of a successful resolution.
///
/// Errors travel separately as `Err(AppError)`.
#[derive(Debug)]
pub enum Resolution {
    /// A record matched and the forwarder produced the response.
    Dispatched(Response),
    /// Implicit lookup found nothing; answered with an empty `404`.
    NoMatch,
}

impl IntoResponse for Resolution {
    fn into_response(self) -> Response {
        match self {
            Resolution::Dispatched(response) => response,
            Resolution::NoMatch => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

/// Explicit resolution by id.
///
/// # Endpoint
///
/// `GET /?to=<id>`
///
/// An absent or empty `to` falls through to implicit resolution. When `to`
/// is repeated, the first occurrence wins.
///
/// # Errors
///
/// Returns 404 with an error body if no record has that id.
/// Returns 500 if the store or the upstream fails.
pub async fn execute_handler(
    State(state): State<AppState>,
    params: Result<Query<ExecuteParams>, QueryRejection>,
    request: Request,
) -> Result<Resolution, AppError> {
    let Query(params) = params?;

    match first_to(params).filter(|id| !id.is_empty()) {
        Some(id) => {
            info!("Executing redirect {}", id);
            let redirect = state.redirect_service.get(&id).await?;
            let response = state.forwarder.forward(&redirect, request).await?;
            Ok(Resolution::Dispatched(response))
        }
        None => resolve_by_host(&state, request).await,
    }
}

/// Implicit resolution by request host for every unmatched method and path.
///
/// # Errors
///
/// A missing record is not an error here: it yields an empty `404`.
/// Returns 500 if the store or the upstream fails.
pub async fn no_route_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Resolution, AppError> {
    resolve_by_host(&state, request).await
}

async fn resolve_by_host(state: &AppState, request: Request) -> Result<Resolution, AppError> {
    let Some(dns) = extract_host(request.headers(), request.uri()) else {
        debug!(uri = %request.uri(), "Request carries no host");
        return Ok(Resolution::NoMatch);
    };

    info!("Searching redirect for [{}]", dns);

    match state.redirect_service.get_by_dns(&dns).await {
        Ok(redirect) => {
            let response = state.forwarder.forward(&redirect, request).await?;
            Ok(Resolution::Dispatched(response))
        }
        Err(e) if e.is_not_found() => {
            debug!(dns = %dns, "No redirect matches host");
            Ok(Resolution::NoMatch)
        }
        Err(e) => Err(e),
    }
}
