#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use chrono::{FixedOffset, Utc};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use redirect_gateway::application::services::RedirectService;
use redirect_gateway::domain::entities::Redirect;
use redirect_gateway::domain::repositories::RedirectRepository;
use redirect_gateway::error::AppError;
use redirect_gateway::infrastructure::cache::{CacheError, CacheResult, CacheService};
use redirect_gateway::proxy::ProxyForwarder;
use redirect_gateway::routes::app_router;
use redirect_gateway::state::AppState;

pub const KEY_PREFIX: &str = "url-management:redirect:";
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// In-memory stand-in for the PostgreSQL store.
#[derive(Default)]
pub struct InMemoryRedirectRepository {
    records: Mutex<HashMap<String, Redirect>>,
    next_id: AtomicUsize,
    unhealthy: AtomicBool,
    pub lookups: AtomicUsize,
}

impl InMemoryRedirectRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.unhealthy.store(!healthy, Ordering::SeqCst);
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn stored(&self, id: &str) -> Option<Redirect> {
        self.records.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl RedirectRepository for InMemoryRedirectRepository {
    async fn get_by_id(&self, id: &str) -> Result<Redirect, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Redirect not found", json!({ "id": id })))
    }

    async fn get_by_dns(&self, dns: &str) -> Result<Redirect, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.dns() == Some(dns))
            .max_by_key(|r| r.updated_at)
            .cloned()
            .ok_or_else(|| AppError::not_found("Redirect not found", json!({ "dns": dns })))
    }

    async fn list_all(&self) -> Result<Vec<Redirect>, AppError> {
        let mut all: Vec<Redirect> = self.records.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn save(&self, mut redirect: Redirect) -> Result<Redirect, AppError> {
        let now = Utc::now().with_timezone(&FixedOffset::east_opt(0).unwrap());
        if redirect.id.is_empty() {
            redirect.id = format!("gen{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        }
        if redirect.created_at.is_none() {
            redirect.created_at = Some(now);
        }
        redirect.updated_at = Some(now);

        self.records
            .lock()
            .unwrap()
            .insert(redirect.id.clone(), redirect.clone());
        Ok(redirect)
    }

    async fn remove(&self, redirect: &Redirect) -> Result<(), AppError> {
        self.records.lock().unwrap().remove(&redirect.id);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        !self.unhealthy.load(Ordering::SeqCst)
    }
}

/// Working in-memory cache that records TTLs. Expiry is not simulated.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (String, u64)>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&self, key: &str) -> Option<(String, u64)> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), 3600));
    }
}

#[async_trait]
impl CacheService for InMemoryCache {
    async fn get_json(&self, key: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone()))
    }

    async fn set_json(&self, key: &str, value: &str, ttl_seconds: u64) -> CacheResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl_seconds));
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Cache whose every operation fails, as when Redis goes away mid-flight.
pub struct FailingCache;

#[async_trait]
impl CacheService for FailingCache {
    async fn get_json(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn set_json(&self, _key: &str, _value: &str, _ttl_seconds: u64) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Err(CacheError::ConnectionError("connection refused".to_string()))
    }

    async fn health_check(&self) -> bool {
        false
    }
}

pub fn create_test_state(
    repository: Arc<InMemoryRedirectRepository>,
    cache: Arc<dyn CacheService>,
) -> AppState {
    let service = Arc::new(RedirectService::new(repository, cache, KEY_PREFIX, 3600));
    let client = ProxyForwarder::build_client(Duration::from_secs(5)).unwrap();

    AppState::new(service, ProxyForwarder::new(client, MAX_BODY_BYTES))
}

/// Full application router over in-memory doubles.
pub fn create_test_app(
    repository: Arc<InMemoryRedirectRepository>,
    cache: Arc<dyn CacheService>,
    context_path: &str,
) -> Router {
    app_router(create_test_state(repository, cache), context_path)
}

pub async fn seed(
    repository: &InMemoryRedirectRepository,
    id: &str,
    dns: Option<&str>,
    destination: &str,
    proxy: bool,
) -> Redirect {
    let mut redirect = Redirect::new(destination, dns.map(str::to_string), proxy);
    redirect.id = id.to_string();
    repository.save(redirect).await.unwrap()
}
