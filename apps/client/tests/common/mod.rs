//! Common test utilities for sync integration tests.
//!
//! Provides a TestContext wiring an in-memory repository to a fixture
//! remote, so the synchronizer runs its real phases without a network.

pub mod fixtures;

use std::sync::{Arc, MutexGuard};

use planner_client_lib::db::SqliteRepository;
use planner_client_lib::state::AppState;

use self::fixtures::FixtureRemote;

pub struct TestContext {
    pub state: AppState,
    pub remote: Arc<FixtureRemote>,
}

impl TestContext {
    /// In-memory database plus the standard remote fixture.
    pub fn new() -> Self {
        Self::with_remote(FixtureRemote::standard())
    }

    pub fn with_remote(remote: FixtureRemote) -> Self {
        let remote = Arc::new(remote);
        let repository = SqliteRepository::open_in_memory().expect("in-memory database");
        let state = AppState::new(repository, remote.clone());
        Self { state, remote }
    }

    pub fn repo(&self) -> MutexGuard<'_, SqliteRepository> {
        self.state.repository.lock().expect("repository lock")
    }
}
