use std::{sync::Arc, time::Instant};

use crate::auth::{rate_limit::RateLimiter, SessionStore};
use crate::config::AppConfig;
use crate::db::{memory::MemoryDataClient, DataClient};
use crate::storage::{LocalStorage, StorageClient, PUBLIC_PREFIX};

/// Shared handles every handler reaches through `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub data: Arc<dyn DataClient>,
    pub storage: Arc<dyn StorageClient>,
    pub sessions: SessionStore,
    pub login_limiter: RateLimiter,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        data: Arc<dyn DataClient>,
        storage: Arc<dyn StorageClient>,
    ) -> Self {
        let login_limiter = RateLimiter::new(config.login_max_attempts, config.login_window_secs);
        Self {
            config: Arc::new(config),
            data,
            storage,
            sessions: SessionStore::new(),
            login_limiter,
            started_at: Instant::now(),
        }
    }

    /// In-memory data with files under `config.storage_dir`.
    pub fn in_memory(config: AppConfig) -> Self {
        let storage = local_storage(&config);
        Self::new(config, Arc::new(MemoryDataClient::new()), Arc::new(storage))
    }
}

pub fn local_storage(config: &AppConfig) -> LocalStorage {
    LocalStorage::new(
        config.storage_dir.clone(),
        format!(
            "{}{}",
            config.public_base_url.trim_end_matches('/'),
            PUBLIC_PREFIX
        ),
    )
}
