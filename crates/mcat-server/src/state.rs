use std::sync::Arc;

use mcat_catalog::CatalogService;

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: Arc<CatalogService>,
    pub cache_max_age_secs: u64,
}

impl AppState {
    pub fn new(service: Arc<CatalogService>, cache_max_age_secs: u64) -> Self {
        Self {
            service,
            cache_max_age_secs,
        }
    }
}
