//! Administration route configuration.

use crate::api::handlers::{
    create_redirect_handler, delete_redirect_handler, get_redirect_handler, health_handler,
    list_redirects_handler, update_redirect_handler, upsert_redirect_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

/// Routes mounted under the context path.
///
/// # Endpoints
///
/// - `GET    /redirect`        - List all redirects
/// - `PUT    /redirect`        - Create a redirect with a generated id
/// - `GET    /redirect/{id}`   - Fetch one redirect
/// - `PUT    /redirect/{id}`   - Create or update with the given id
/// - `POST   /redirect/{id}`   - Update an existing redirect
/// - `DELETE /redirect/{id}`   - Delete a redirect
/// - `GET    /health`          - Store and cache health
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/redirect",
            get(list_redirects_handler).put(create_redirect_handler),
        )
        .route(
            "/redirect/{id}",
            put(upsert_redirect_handler)
                .get(get_redirect_handler)
                .post(update_redirect_handler)
                .delete(delete_redirect_handler),
        )
        .route("/health", get(health_handler))
}
