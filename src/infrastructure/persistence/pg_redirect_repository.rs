//! PostgreSQL implementation of the redirect repository.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::json;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::Redirect;
use crate::domain::repositories::RedirectRepository;
use crate::error::AppError;

const SELECT_COLUMNS: &str = "id, dns, destination, proxy, created_at, updated_at";

#[derive(Debug, FromRow)]
struct RedirectRow {
    id: String,
    dns: Option<String>,
    destination: String,
    proxy: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// PostgreSQL repository for redirect records.
///
/// Timestamps are stored as `TIMESTAMPTZ` and converted to the configured
/// offset on every read, so callers always see one consistent timezone.
pub struct PgRedirectRepository {
    pool: Arc<PgPool>,
    timezone: FixedOffset,
}

impl PgRedirectRepository {
    /// Creates a new repository with a database connection pool.
    ///
    /// `timezone` is the offset applied to `created_at`/`updated_at` on read.
    pub fn new(pool: Arc<PgPool>, timezone: FixedOffset) -> Self {
        Self { pool, timezone }
    }

    fn to_entity(&self, row: RedirectRow) -> Redirect {
        Redirect {
            id: row.id,
            created_at: Some(row.created_at.with_timezone(&self.timezone)),
            updated_at: Some(row.updated_at.with_timezone(&self.timezone)),
            dns: row.dns,
            destination: row.destination,
            proxy: row.proxy,
        }
    }
}

/// Generates a random identifier without hyphens.
pub fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl RedirectRepository for PgRedirectRepository {
    async fn get_by_id(&self, id: &str) -> Result<Redirect, AppError> {
        let row = sqlx::query_as::<_, RedirectRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM redirects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(|r| self.to_entity(r))
            .ok_or_else(|| AppError::not_found("Redirect not found", json!({ "id": id })))
    }

    async fn get_by_dns(&self, dns: &str) -> Result<Redirect, AppError> {
        let row = sqlx::query_as::<_, RedirectRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM redirects WHERE dns = $1 \
             ORDER BY updated_at DESC LIMIT 1"
        ))
        .bind(dns)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(|r| self.to_entity(r))
            .ok_or_else(|| AppError::not_found("Redirect not found", json!({ "dns": dns })))
    }

    async fn list_all(&self) -> Result<Vec<Redirect>, AppError> {
        let rows = sqlx::query_as::<_, RedirectRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM redirects ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(|r| self.to_entity(r)).collect())
    }

    async fn save(&self, redirect: Redirect) -> Result<Redirect, AppError> {
        let now = Utc::now();
        let id = if redirect.id.is_empty() {
            generate_id()
        } else {
            redirect.id
        };
        let created_at = redirect
            .created_at
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or(now);

        let row = sqlx::query_as::<_, RedirectRow>(&format!(
            r#"
            INSERT INTO redirects (id, dns, destination, proxy, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                dns = EXCLUDED.dns,
                destination = EXCLUDED.destination,
                proxy = EXCLUDED.proxy,
                updated_at = EXCLUDED.updated_at
            RETURNING {SELECT_COLUMNS}
            "#
        ))
        .bind(&id)
        .bind(redirect.dns.filter(|d| !d.is_empty()))
        .bind(&redirect.destination)
        .bind(redirect.proxy)
        .bind(created_at)
        .bind(now)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(self.to_entity(row))
    }

    async fn remove(&self, redirect: &Redirect) -> Result<(), AppError> {
        sqlx::query("DELETE FROM redirects WHERE id = $1")
            .bind(&redirect.id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
