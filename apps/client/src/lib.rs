//! Planner data layer: local SQLite store, remote REST gateway, and the
//! synchronizer that keeps them consistent.
//!
//! UI shells embed this crate and talk to it through [`AppState`]: local
//! reads/writes go through the repository, group selection and launch-time
//! refresh go through the sync manager.

pub mod db;
pub mod remote;
pub mod state;
pub mod sync;

pub use db::SqliteRepository;
pub use remote::{RemoteRepository, SupabaseGateway};
pub use state::AppState;
pub use sync::{SyncManager, SyncStats, SyncStatus};

use std::path::PathBuf;

/// Default on-device database location.
pub fn get_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ikbey-planner")
        .join("planner.db")
}
