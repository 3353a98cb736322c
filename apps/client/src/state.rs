//! Application state.
//!
//! One [`AppState`] is built at process start and threaded through the
//! embedding shell's entry points; it replaces the implicit global
//! singletons the screens would otherwise reach for. Tests inject an
//! in-memory repository and a fixture remote through [`AppState::new`].

use std::sync::{Arc, Mutex};

use crate::db::SqliteRepository;
use crate::remote::{RemoteRepository, SupabaseGateway};
use crate::sync::SyncManager;

/// Shared context for the whole data layer.
pub struct AppState {
    pub repository: Arc<Mutex<SqliteRepository>>,
    pub sync: SyncManager,
}

impl AppState {
    pub fn new(repository: SqliteRepository, remote: Arc<dyn RemoteRepository>) -> Self {
        let repository = Arc::new(Mutex::new(repository));
        let sync = SyncManager::new(repository.clone(), remote);
        Self { repository, sync }
    }

    /// Open the on-device database and wire up the production gateway.
    pub fn open_default(base_url: &str, api_key: &str) -> anyhow::Result<Self> {
        let db_path = crate::get_db_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let repository = SqliteRepository::open(&db_path)?;
        let remote = Arc::new(SupabaseGateway::new(base_url, api_key));
        Ok(Self::new(repository, remote))
    }
}
