use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::session::SessionSigner;
use crate::storage::ResumeStorage;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Resume uploads. Default: S3ResumeStorage.
    pub storage: Arc<dyn ResumeStorage>,
    pub sessions: SessionSigner,
    pub config: Config,
}

#[cfg(test)]
impl AppState {
    /// State backed by a lazy pool and in-memory storage.
    pub fn for_tests() -> Self {
        let config = Config::for_tests();
        AppState {
            db: crate::db::lazy_pool(&config),
            storage: Arc::new(crate::storage::memory::MemoryResumeStorage::default()),
            sessions: SessionSigner::new(&config.session_secret),
            config,
        }
    }
}
