//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::RedirectService;
use crate::proxy::ProxyForwarder;

/// Cheap to clone: both members are reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub redirect_service: Arc<RedirectService>,
    pub forwarder: Arc<ProxyForwarder>,
}

impl AppState {
    pub fn new(redirect_service: Arc<RedirectService>, forwarder: ProxyForwarder) -> Self {
        Self {
            redirect_service,
            forwarder: Arc::new(forwarder),
        }
    }
}
