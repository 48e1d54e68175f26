//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /?to=<id>`          - Explicit resolution by id
//! - `GET  {ctx}[/]?to=<id>`   - Same, under the context path
//! - `{ctx}/redirect[/{id}]`   - Redirect administration
//! - `GET  {ctx}/health`       - Store and cache health
//! - everything else           - Implicit resolution by request host
//!
//! `{ctx}` is the configured context path (empty by default).
//!
//! Paths are not normalized: proxied requests must reach the upstream exactly
//! as the client sent them.

use crate::api;
use crate::api::handlers::{execute_handler, no_route_handler};
use crate::api::middleware::{catch_panic, request_id, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `context_path` - mount point for the administration routes; empty or
///   `/segment` without a trailing slash
pub fn app_router(state: AppState, context_path: &str) -> Router {
    let admin = api::routes::admin_routes();

    // Non-GET methods on `/` resolve by host like any other unmatched request.
    let execute = get(execute_handler).fallback(no_route_handler);
    let router = Router::new().route("/", execute.clone());
    let router = if context_path.is_empty() {
        router.merge(admin)
    } else {
        router
            .route(context_path, execute.clone())
            .route(&format!("{context_path}/"), execute)
            .nest(context_path, admin)
    };

    with_middleware(router.fallback(no_route_handler).with_state(state))
}

/// Wraps a router with the request id, tracing and panic recovery layers.
///
/// The request id is assigned outermost so the trace span can record it.
fn with_middleware(router: Router) -> Router {
    router
        .layer(catch_panic::layer())
        .layer(request_id::propagate_layer())
        .layer(tracing::layer())
        .layer(request_id::set_layer())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::RedirectService;
    use crate::error::AppError;
    use crate::domain::repositories::MockRedirectRepository;
    use crate::infrastructure::cache::NullCache;
    use crate::proxy::ProxyForwarder;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn state(repo: MockRedirectRepository) -> AppState {
        let service = RedirectService::new(Arc::new(repo), Arc::new(NullCache::new()), "t:", 60);
        let client = ProxyForwarder::build_client(Duration::from_secs(1)).unwrap();
        AppState::new(Arc::new(service), ProxyForwarder::new(client, 1024))
    }

    #[tokio::test]
    async fn test_health_nested_under_context_path() {
        let mut repo = MockRedirectRepository::new();
        repo.expect_health_check().returning(|| true);
        let app = app_router(state(repo), "/url-management");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/url-management/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_explicit_lookup_under_context_path() {
        let mut repo = MockRedirectRepository::new();
        repo.expect_get_by_id().returning(|id| {
            let mut redirect = crate::domain::entities::Redirect::new(
                "https://example.com",
                None,
                false,
            );
            redirect.id = id.to_string();
            Ok(redirect)
        });
        let app = app_router(state(repo), "/url-management");

        for uri in ["/url-management?to=abc", "/url-management/?to=abc"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_panicking_handler_returns_json_500() {
        async fn broken() -> &'static str {
            panic!("handler bug")
        }
        let app = with_middleware(Router::new().route("/", get(broken)));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let request_id = response.headers()["x-request-id"].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(request_id).is_ok());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "generic_error");
    }

    #[tokio::test]
    async fn test_inbound_request_id_is_echoed() {
        let mut repo = MockRedirectRepository::new();
        repo.expect_health_check().returning(|| true);
        let app = app_router(state(repo), "");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header("x-request-id", "trace-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "trace-42");
    }

    #[tokio::test]
    async fn test_request_without_host_is_soft_miss() {
        let mut repo = MockRedirectRepository::new();
        repo.expect_get_by_dns().never();
        let app = app_router(state(repo), "");

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_store_error_on_implicit_lookup_is_500() {
        let mut repo = MockRedirectRepository::new();
        repo.expect_get_by_dns()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));
        let app = app_router(state(repo), "");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/anything")
                    .header("host", "go.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
