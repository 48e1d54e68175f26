//! Repository trait for redirect data access.

use crate::domain::entities::Redirect;
use crate::error::AppError;
use async_trait::async_trait;

/// The authoritative store for redirect records.
///
/// Lookups return [`AppError::NotFound`] on a miss rather than `Ok(None)`:
/// "record not found" is a distinguished outcome that callers branch on.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRedirectRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedirectRepository: Send + Sync {
    /// Finds a redirect by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this id.
    /// Returns [`AppError::Internal`] on database errors.
    async fn get_by_id(&self, id: &str) -> Result<Redirect, AppError>;

    /// Finds a redirect by host name.
    ///
    /// Host names are not unique; when several records share one, the most
    /// recently updated wins.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this host name.
    /// Returns [`AppError::Internal`] on database errors.
    async fn get_by_dns(&self, dns: &str) -> Result<Redirect, AppError>;

    /// Lists every redirect, oldest first.
    async fn list_all(&self) -> Result<Vec<Redirect>, AppError>;

    /// Inserts or updates a redirect and returns the stored record.
    ///
    /// - An empty `id` is replaced by a fresh hyphen-free UUID
    /// - `created_at` is set on first insert and preserved afterwards
    /// - `updated_at` is refreshed on every save
    async fn save(&self, redirect: Redirect) -> Result<Redirect, AppError>;

    /// Deletes a redirect by its id. Removing a missing record is not an error.
    async fn remove(&self, redirect: &Redirect) -> Result<(), AppError>;

    /// Checks if the store is reachable.
    async fn health_check(&self) -> bool;
}
