//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET {ctx}/health`
///
/// # Response Codes
///
/// - **200 OK**: database reachable (cache failures only mark the status `degraded`)
/// - **503 Service Unavailable**: database unreachable
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected" },
///     "cache": { "status": "ok", "message": "Cache reachable" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (db_healthy, cache_healthy) = tokio::join!(
        state.redirect_service.store_healthy(),
        state.redirect_service.cache_healthy()
    );

    let database = if db_healthy {
        CheckStatus::ok("Connected")
    } else {
        CheckStatus::error("Database connection failed")
    };
    let cache = if cache_healthy {
        CheckStatus::ok("Cache reachable")
    } else {
        CheckStatus::error("Cache unavailable")
    };

    let status = match (database.is_ok(), cache.is_ok()) {
        (true, true) => "healthy",
        (true, false) => "degraded",
        (false, _) => "unhealthy",
    };

    let response = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { database, cache },
    };

    if db_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
