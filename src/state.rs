// src/state.rs
use std::sync::Arc;
use std::time::Duration;

use crate::store::CatalogStore;
use crate::upstream::ProductSource;

/// Shared by every handler; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub source: Arc<dyn ProductSource>,
    pub persist_timeout: Duration,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        source: Arc<dyn ProductSource>,
        persist_timeout: Duration,
    ) -> Self {
        Self {
            store,
            source,
            persist_timeout,
        }
    }
}
