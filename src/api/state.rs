use std::sync::Arc;

use crate::config::Config;
use crate::db::{CatalogStore, JsonFileSource};
use crate::error::{AppError, AppResult};
use crate::services::query::SearchScope;
use crate::services::recommendations::RecommendationEngine;

/// Shared application state
///
/// The catalog is read-only once loaded, so no lock is needed around it.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub engine: Arc<RecommendationEngine>,
    pub search_scope: SearchScope,
}

impl AppState {
    pub fn new(catalog: CatalogStore, search_scope: SearchScope) -> Self {
        Self {
            catalog: Arc::new(catalog),
            engine: Arc::new(RecommendationEngine::default()),
            search_scope,
        }
    }

    /// Builds state backed by the JSON catalog file named in the config
    ///
    /// The catalog is not read here; call `ensure_catalog` or let the first request do it.
    pub fn from_config(config: &Config) -> Self {
        let source = JsonFileSource::new(&config.catalog_path);
        Self::new(CatalogStore::new(source), config.search_scope)
    }

    /// Loads the catalog on the blocking pool unless a load was already attempted
    pub async fn ensure_catalog(&self) -> AppResult<()> {
        if self.catalog.load_attempted() {
            return Ok(());
        }

        let catalog = Arc::clone(&self.catalog);
        tokio::task::spawn_blocking(move || catalog.load())
            .await
            .map_err(|e| AppError::Internal(format!("Catalog load task failed: {e}")))
    }
}
