//! Handlers for redirect administration endpoints.
//!
//! Every write goes through [`crate::application::services::RedirectService`],
//! so the cached id and dns entries are invalidated on success.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::redirect::RedirectRequest;
use crate::domain::entities::Redirect;
use crate::error::AppError;
use crate::state::AppState;

fn validated(
    payload: Result<Json<RedirectRequest>, JsonRejection>,
) -> Result<RedirectRequest, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    Ok(payload)
}

/// Lists every stored redirect.
///
/// # Endpoint
///
/// `GET {ctx}/redirect`
pub async fn list_redirects_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Redirect>>, AppError> {
    let redirects = state.redirect_service.get_all().await?;
    Ok(Json(redirects))
}

/// Returns a single redirect.
///
/// # Endpoint
///
/// `GET {ctx}/redirect/{id}`
///
/// # Errors
///
/// Returns 404 if no record has that id.
pub async fn get_redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Redirect>, AppError> {
    let redirect = state.redirect_service.get(&id).await?;
    Ok(Json(redirect))
}

/// Creates a redirect with a generated id.
///
/// # Endpoint
///
/// `PUT {ctx}/redirect`
///
/// # Request Body
///
/// ```json
/// { "dns": "go.example.com", "destination": "https://example.com", "proxy": false }
/// ```
///
/// # Errors
///
/// Returns 400 if the body is malformed, fails validation or lacks `destination`.
pub async fn create_redirect_handler(
    State(state): State<AppState>,
    payload: Result<Json<RedirectRequest>, JsonRejection>,
) -> Result<Json<Redirect>, AppError> {
    let redirect = validated(payload)?.into_new(None)?;
    let saved = state.redirect_service.save(redirect).await?;

    tracing::info!(id = %saved.id, "Redirect created");
    Ok(Json(saved))
}

/// Creates or updates the redirect with the given id.
///
/// # Endpoint
///
/// `PUT {ctx}/redirect/{id}`
///
/// An existing record has the body merged into it. A missing one is created
/// with that id, which then requires `destination`.
///
/// # Errors
///
/// Returns 400 on an invalid body.
/// Returns 500 if the lookup fails for any reason other than a missing record.
pub async fn upsert_redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<RedirectRequest>, JsonRejection>,
) -> Result<Json<Redirect>, AppError> {
    let request = validated(payload)?;

    let redirect = match state.redirect_service.get(&id).await {
        Ok(mut existing) => {
            request.merge_into(&mut existing);
            existing
        }
        Err(e) if e.is_not_found() => request.into_new(Some(id))?,
        Err(e) => return Err(e),
    };

    let saved = state.redirect_service.save(redirect).await?;
    Ok(Json(saved))
}

/// Updates an existing redirect.
///
/// # Endpoint
///
/// `POST {ctx}/redirect/{id}`
///
/// # Errors
///
/// Returns 400 on an invalid body.
/// Returns 404 if no record has that id.
pub async fn update_redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<RedirectRequest>, JsonRejection>,
) -> Result<Json<Redirect>, AppError> {
    let request = validated(payload)?;

    let mut redirect = state.redirect_service.get(&id).await?;
    request.merge_into(&mut redirect);

    let saved = state.redirect_service.save(redirect).await?;
    Ok(Json(saved))
}

/// Deletes a redirect.
///
/// # Endpoint
///
/// `DELETE {ctx}/redirect/{id}`
///
/// # Errors
///
/// Returns 404 if no record has that id.
pub async fn delete_redirect_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    let redirect = state.redirect_service.get(&id).await?;
    state.redirect_service.remove(&redirect).await?;

    tracing::info!(id = %id, "Redirect removed");
    Ok(StatusCode::NO_CONTENT)
}
