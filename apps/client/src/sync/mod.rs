//! Synchronizer: one-way replication from the remote gateway into the
//! local store, plus the bookkeeping that decides when replication is due.
//!
//! A full sync fetches faculties, per-faculty groups, calendar events, and
//! the selected group's schedule, in that order, and only then replaces the
//! local tables in a single transaction. A failed fetch therefore leaves the
//! local database exactly as it was, and `last_sync_time` advances only when
//! the whole sync completed.

use std::sync::{Arc, Mutex as StdMutex};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::db::{
    DbError, RestoredFlags, SettingsRepository, SqliteRepository, SyncSnapshot, SyncStore,
};
use crate::remote::{RemoteError, RemoteRepository};
use planner_core::{GROUP_ID_KEY, LAST_SYNC_TIME_KEY};

/// Resync is due once this much time has passed since the last one.
pub const SYNC_INTERVAL_MS: i64 = 24 * 60 * 60 * 1000;

/// Sync errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Database(#[from] DbError),

    #[error("sync already in progress")]
    AlreadyInProgress,
}

/// Sync status for the embedding shell.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SyncStatus {
    Idle,
    Syncing { stage: SyncStage },
    Completed { synced_at: i64, stats: SyncStats },
    Failed { error: String },
}

/// Current sync stage, in the fixed phase order.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "name")]
pub enum SyncStage {
    FetchingFaculties,
    FetchingGroups,
    FetchingCalendarEvents,
    FetchingSchedule,
    Applying,
}

/// Counts from one completed sync.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SyncStats {
    pub faculties: usize,
    pub groups: usize,
    pub calendar_events: usize,
    pub schedule_entries: usize,
    pub restored: RestoredFlags,
}

struct SyncManagerInner {
    repository: Arc<StdMutex<SqliteRepository>>,
    remote: Arc<dyn RemoteRepository>,
    status: Mutex<SyncStatus>,
}

/// Orchestrates replication; owns no durable state of its own, the
/// bookkeeping lives in the settings table.
///
/// Clone-able: all state sits behind an Arc, so clones share one status
/// and one in-progress guard.
#[derive(Clone)]
pub struct SyncManager {
    inner: Arc<SyncManagerInner>,
}

impl SyncManager {
    pub fn new(
        repository: Arc<StdMutex<SqliteRepository>>,
        remote: Arc<dyn RemoteRepository>,
    ) -> Self {
        Self {
            inner: Arc::new(SyncManagerInner {
                repository,
                remote,
                status: Mutex::new(SyncStatus::Idle),
            }),
        }
    }

    /// Current sync status.
    pub async fn status(&self) -> SyncStatus {
        self.inner.status.lock().await.clone()
    }

    // --- bookkeeping, thin over the settings table ---

    /// Epoch-milliseconds of the last completed sync, if any.
    pub fn last_sync_time(&self) -> Option<i64> {
        let repo = self.inner.repository.lock().expect("repository lock");
        repo.get_setting(LAST_SYNC_TIME_KEY)?.parse().ok()
    }

    pub fn set_last_sync_time(&self, timestamp: i64) -> Result<(), SyncError> {
        let repo = self.inner.repository.lock().expect("repository lock");
        repo.set_setting(LAST_SYNC_TIME_KEY, &timestamp.to_string())?;
        Ok(())
    }

    pub fn clear_last_sync_time(&self) -> Result<(), SyncError> {
        let repo = self.inner.repository.lock().expect("repository lock");
        repo.delete_setting(LAST_SYNC_TIME_KEY)?;
        Ok(())
    }

    /// The selected group id as stored (a stringified integer), if set.
    pub fn group_id(&self) -> Option<String> {
        let repo = self.inner.repository.lock().expect("repository lock");
        repo.get_setting(GROUP_ID_KEY)
    }

    fn selected_group_id(&self) -> Option<i32> {
        let raw = self.group_id()?;
        match raw.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!(%raw, "stored group id is not an integer, ignoring");
                None
            }
        }
    }

    /// Persist a new group selection and resync immediately.
    ///
    /// A group change invalidates the locally cached schedule subset, so
    /// this always runs a full sync no matter how recently one finished.
    /// Network-bound and not debounced.
    pub async fn set_group_id(&self, group_id: i32) -> Result<SyncStats, SyncError> {
        {
            let repo = self.inner.repository.lock().expect("repository lock");
            repo.set_setting(GROUP_ID_KEY, &group_id.to_string())?;
        }
        self.force_sync().await
    }

    /// Unconditional full sync; advances `last_sync_time` on success.
    pub async fn force_sync(&self) -> Result<SyncStats, SyncError> {
        {
            let current = self.inner.status.lock().await;
            if matches!(*current, SyncStatus::Syncing { .. }) {
                return Err(SyncError::AlreadyInProgress);
            }
        }

        // Stamping is part of the sync outcome: a failed stamp fails the
        // sync, and every exit settles the status so the in-progress guard
        // can never wedge on an error.
        let outcome = match self.perform_full_sync().await {
            Ok(stats) => {
                let now = Utc::now().timestamp_millis();
                self.set_last_sync_time(now).map(|()| (now, stats))
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok((now, stats)) => {
                self.set_status(SyncStatus::Completed {
                    synced_at: now,
                    stats,
                })
                .await;
                Ok(stats)
            }
            Err(e) => {
                tracing::error!(error = %e, "full sync failed");
                self.set_status(SyncStatus::Failed {
                    error: e.to_string(),
                })
                .await;
                Err(e)
            }
        }
    }

    /// Launch-time entry point: resync only if none is recorded or the
    /// interval has elapsed. Returns whether a sync ran.
    pub async fn sync_if_needed(&self) -> Result<bool, SyncError> {
        let now = Utc::now().timestamp_millis();
        let due = match self.last_sync_time() {
            None => true,
            Some(last) => now - last > SYNC_INTERVAL_MS,
        };
        if !due {
            return Ok(false);
        }

        self.force_sync().await?;
        Ok(true)
    }

    async fn set_status(&self, status: SyncStatus) {
        *self.inner.status.lock().await = status;
    }

    /// Fetch everything, then replace in one transaction. Phases run
    /// sequentially in a fixed order; no fetch holds the repository lock.
    async fn perform_full_sync(&self) -> Result<SyncStats, SyncError> {
        self.set_status(SyncStatus::Syncing {
            stage: SyncStage::FetchingFaculties,
        })
        .await;
        let faculties = self.inner.remote.fetch_faculties().await?;

        self.set_status(SyncStatus::Syncing {
            stage: SyncStage::FetchingGroups,
        })
        .await;
        let mut groups = Vec::new();
        for faculty in &faculties {
            groups.extend(self.inner.remote.fetch_groups(faculty.id).await?);
        }

        self.set_status(SyncStatus::Syncing {
            stage: SyncStage::FetchingCalendarEvents,
        })
        .await;
        let calendar_events = self.inner.remote.fetch_calendar_events().await?;

        self.set_status(SyncStatus::Syncing {
            stage: SyncStage::FetchingSchedule,
        })
        .await;
        let schedule = match self.selected_group_id() {
            Some(group_id) => self.inner.remote.fetch_schedule(group_id).await?,
            None => Vec::new(),
        };

        self.set_status(SyncStatus::Syncing {
            stage: SyncStage::Applying,
        })
        .await;
        let snapshot = SyncSnapshot {
            faculties,
            groups,
            calendar_events,
            schedule,
        };
        let stats = {
            let mut repo = self.inner.repository.lock().expect("repository lock");
            let restored = repo.apply_sync_snapshot(&snapshot)?;
            SyncStats {
                faculties: snapshot.faculties.len(),
                groups: snapshot.groups.len(),
                calendar_events: snapshot.calendar_events.len(),
                schedule_entries: snapshot.schedule.len(),
                restored,
            }
        };

        tracing::info!(
            faculties = stats.faculties,
            groups = stats.groups,
            calendar_events = stats.calendar_events,
            schedule_entries = stats.schedule_entries,
            "full sync applied"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use planner_core::{CalendarEvent, Faculty, Group, ScheduleEntry};

    struct EmptyRemote;

    #[async_trait]
    impl RemoteRepository for EmptyRemote {
        async fn fetch_faculties(&self) -> Result<Vec<Faculty>, RemoteError> {
            Ok(Vec::new())
        }

        async fn fetch_groups(&self, _faculty_id: i32) -> Result<Vec<Group>, RemoteError> {
            Ok(Vec::new())
        }

        async fn fetch_schedule(&self, _group_id: i32) -> Result<Vec<ScheduleEntry>, RemoteError> {
            Ok(Vec::new())
        }

        async fn fetch_calendar_events(&self) -> Result<Vec<CalendarEvent>, RemoteError> {
            Ok(Vec::new())
        }
    }

    fn manager() -> SyncManager {
        let repo = SqliteRepository::open_in_memory().expect("in-memory database");
        SyncManager::new(Arc::new(StdMutex::new(repo)), Arc::new(EmptyRemote))
    }

    #[tokio::test]
    async fn timestamp_write_failure_fails_the_sync_instead_of_wedging_it() {
        let manager = manager();
        {
            let repo = manager.inner.repository.lock().unwrap();
            repo.raw_connection()
                .execute("DROP TABLE settings", [])
                .unwrap();
        }

        let err = manager.force_sync().await.unwrap_err();
        assert!(matches!(err, SyncError::Database(_)));
        assert!(matches!(manager.status().await, SyncStatus::Failed { .. }));

        // Status settled, so the next attempt runs rather than bouncing
        // off the in-progress guard.
        let err = manager.force_sync().await.unwrap_err();
        assert!(!matches!(err, SyncError::AlreadyInProgress));
    }
}
