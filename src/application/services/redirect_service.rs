//! Cache-aside access to redirect records.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::domain::entities::Redirect;
use crate::domain::repositories::RedirectRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Serves redirect lookups from the cache when possible and keeps the cache
/// consistent with writes.
///
/// # Read path
///
/// 1. Read `prefix + id` (or `prefix + dns`) from the cache
/// 2. On a hit, return the cached record without touching the store
/// 3. On a miss, cache error or undecodable entry, read the store
/// 4. On store success, write the record back under the same key with the TTL
///
/// Store errors (including [`AppError::NotFound`]) are returned unchanged and
/// leave the cache untouched.
///
/// # Write path
///
/// `save` and `remove` go to the store first; only on success are the id and
/// dns keys deleted, so the next read repopulates from current state.
///
/// Cache failures are logged and never fail a call.
pub struct RedirectService {
    repository: Arc<dyn RedirectRepository>,
    cache: Arc<dyn CacheService>,
    key_prefix: String,
    ttl_seconds: u64,
}

impl RedirectService {
    /// Creates a new redirect service.
    ///
    /// - `key_prefix` - namespace shared by the id and dns keyspaces
    /// - `ttl_seconds` - lifetime of entries written on a cache miss
    pub fn new(
        repository: Arc<dyn RedirectRepository>,
        cache: Arc<dyn CacheService>,
        key_prefix: impl Into<String>,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            repository,
            cache,
            key_prefix: key_prefix.into(),
            ttl_seconds,
        }
    }

    /// Looks up a redirect by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the store has no such record.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn get(&self, id: &str) -> Result<Redirect, AppError> {
        let key = self.cache_key(id);
        if let Some(redirect) = self.read_cached(&key).await {
            return Ok(redirect);
        }

        let redirect = self.repository.get_by_id(id).await?;
        self.write_cached(&key, &redirect).await;
        Ok(redirect)
    }

    /// Looks up a redirect by host name.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`].
    pub async fn get_by_dns(&self, dns: &str) -> Result<Redirect, AppError> {
        let key = self.cache_key(dns);
        if let Some(redirect) = self.read_cached(&key).await {
            return Ok(redirect);
        }

        let redirect = self.repository.get_by_dns(dns).await?;
        self.write_cached(&key, &redirect).await;
        Ok(redirect)
    }

    /// Lists every redirect straight from the store. Listings are not cached.
    pub async fn get_all(&self) -> Result<Vec<Redirect>, AppError> {
        self.repository.list_all().await
    }

    /// Persists a redirect and invalidates its cache entries.
    ///
    /// Besides the saved record's id and dns keys, the dns key the record
    /// had before the write is deleted too, so a host moved away from this
    /// record stops resolving to it immediately.
    ///
    /// Returns the stored record with its assigned id and timestamps.
    pub async fn save(&self, redirect: Redirect) -> Result<Redirect, AppError> {
        let previous_dns = self.stored_dns(&redirect.id).await;

        let saved = self.repository.save(redirect).await?;
        self.invalidate(&saved).await;

        if let Some(dns) = previous_dns.filter(|dns| saved.dns() != Some(dns.as_str())) {
            self.delete_cached(&self.cache_key(&dns)).await;
        }
        Ok(saved)
    }

    /// Deletes a redirect and invalidates its cache entries.
    pub async fn remove(&self, redirect: &Redirect) -> Result<(), AppError> {
        self.repository.remove(redirect).await?;
        self.invalidate(redirect).await;
        Ok(())
    }

    /// Checks the primary store.
    pub async fn store_healthy(&self) -> bool {
        self.repository.health_check().await
    }

    /// Checks the cache backend.
    pub async fn cache_healthy(&self) -> bool {
        self.cache.health_check().await
    }

    fn cache_key(&self, suffix: &str) -> String {
        format!("{}{}", self.key_prefix, suffix)
    }

    async fn read_cached(&self, key: &str) -> Option<Redirect> {
        match self.cache.get_json(key).await {
            Ok(Some(json)) => match serde_json::from_str::<Redirect>(&json) {
                Ok(redirect) => {
                    debug!("Cache HIT for {}", key);
                    Some(redirect)
                }
                Err(e) => {
                    warn!(error = %e, key, "Discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => {
                debug!("Cache MISS for {}", key);
                None
            }
            Err(e) => {
                error!(error = %e, key, "Error retrieving redirect from cache");
                None
            }
        }
    }

    async fn write_cached(&self, key: &str, redirect: &Redirect) {
        let json = match serde_json::to_string(redirect) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, key, "Failed to serialize redirect for cache");
                return;
            }
        };

        match self.cache.set_json(key, &json, self.ttl_seconds).await {
            Ok(()) => debug!("Cache SET for {} (TTL: {}s)", key, self.ttl_seconds),
            Err(e) => error!(error = %e, key, "Error adding redirect to cache"),
        }
    }

    /// dns currently stored for `id`, read from the store (never the cache).
    async fn stored_dns(&self, id: &str) -> Option<String> {
        if id.is_empty() {
            return None;
        }

        match self.repository.get_by_id(id).await {
            Ok(current) => current.dns().map(str::to_string),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                warn!(error = %e, id, "Could not read previous redirect before save");
                None
            }
        }
    }

    async fn invalidate(&self, redirect: &Redirect) {
        self.delete_cached(&self.cache_key(&redirect.id)).await;
        if let Some(dns) = redirect.dns() {
            self.delete_cached(&self.cache_key(dns)).await;
        }
    }

    async fn delete_cached(&self, key: &str) {
        match self.cache.delete(key).await {
            Ok(()) => debug!("Cache INVALIDATE for {}", key),
            Err(e) => error!(error = %e, key, "Error removing redirect from cache"),
        }
    }
}
