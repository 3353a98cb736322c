//! Remote REST gateway for the cloud planner database.
//!
//! Four read-only collection fetches, one GET each, with the static API key
//! passed as a query parameter. A failed fetch is a typed [`RemoteError`]
//! rather than a silently empty list, so the synchronizer can tell "remote
//! confirmed empty" apart from "remote unreachable" and refuse to wipe
//! local data on the latter.

use async_trait::async_trait;
use planner_core::{CalendarEvent, Faculty, Group, ScheduleEntry};
use reqwest::Client;
use serde::de::DeserializeOwned;

/// Remote fetch errors.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("network error: {0}")]
    Network(String),

    #[error("remote returned status {status} for {route}")]
    Status { route: &'static str, status: u16 },

    #[error("decode error for {route}: {message}")]
    Decode { route: &'static str, message: String },
}

/// Read-only view of the remote planner database.
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    async fn fetch_faculties(&self) -> Result<Vec<Faculty>, RemoteError>;
    async fn fetch_groups(&self, faculty_id: i32) -> Result<Vec<Group>, RemoteError>;
    async fn fetch_schedule(&self, group_id: i32) -> Result<Vec<ScheduleEntry>, RemoteError>;
    async fn fetch_calendar_events(&self) -> Result<Vec<CalendarEvent>, RemoteError>;
}

/// Gateway to the Supabase REST endpoint backing the planner.
pub struct SupabaseGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseGateway {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// One GET against `{base}/{route}`; no retries, transport-default timeouts.
    async fn fetch<T: DeserializeOwned>(
        &self,
        route: &'static str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, RemoteError> {
        let url = format!("{}/{}", self.base_url, route);
        let mut query: Vec<(&str, String)> = vec![("apikey", self.api_key.clone())];
        query.extend(filters.iter().cloned());

        let resp = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(route, error = %e, "remote fetch failed");
                RemoteError::Network(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(route, status = status.as_u16(), "remote returned error status");
            return Err(RemoteError::Status {
                route,
                status: status.as_u16(),
            });
        }

        resp.json::<Vec<T>>().await.map_err(|e| {
            tracing::warn!(route, error = %e, "remote payload decode failed");
            RemoteError::Decode {
                route,
                message: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl RemoteRepository for SupabaseGateway {
    async fn fetch_faculties(&self) -> Result<Vec<Faculty>, RemoteError> {
        self.fetch("faculties", &[]).await
    }

    async fn fetch_groups(&self, faculty_id: i32) -> Result<Vec<Group>, RemoteError> {
        self.fetch(
            "groups",
            &[
                ("faculty_id", format!("eq.{faculty_id}")),
                ("select", "*".to_string()),
            ],
        )
        .await
    }

    async fn fetch_schedule(&self, group_id: i32) -> Result<Vec<ScheduleEntry>, RemoteError> {
        self.fetch("schedule", &[("group_id", format!("eq.{group_id}"))])
            .await
    }

    async fn fetch_calendar_events(&self) -> Result<Vec<CalendarEvent>, RemoteError> {
        self.fetch("calendar_events", &[]).await
    }
}
