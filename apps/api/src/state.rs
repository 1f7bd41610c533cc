use std::sync::Arc;

use crate::assets::AssetHost;
use crate::cache::ResponseCache;
use crate::config::Config;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL-backed in production, in-memory when no database is configured.
    pub store: Arc<dyn DocumentStore>,
    /// Upload passthrough target. Disabled host when no bucket is configured.
    pub assets: Arc<dyn AssetHost>,
    /// Read cache; every write handler clears it.
    pub cache: Arc<ResponseCache>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, assets: Arc<dyn AssetHost>, config: Config) -> Self {
        AppState {
            store,
            assets,
            cache: Arc::new(ResponseCache::new(config.cache_ttl)),
            config,
        }
    }
}
