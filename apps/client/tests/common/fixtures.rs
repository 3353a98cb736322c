//! Fixture remote and factory functions for test data.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use planner_client_lib::remote::{RemoteError, RemoteRepository};
use planner_core::{CalendarEvent, Faculty, Group, ScheduleEntry};

/// In-process stand-in for the Supabase endpoint.
///
/// Serves a fixed data set, counts fetches, and can be flipped into a
/// failing state to simulate an outage.
pub struct FixtureRemote {
    pub faculties: Vec<Faculty>,
    pub groups: Vec<Group>,
    pub schedule: Vec<ScheduleEntry>,
    pub calendar_events: Vec<CalendarEvent>,
    failing: AtomicBool,
    failing_route: Mutex<Option<String>>,
    fetches: AtomicUsize,
}

impl FixtureRemote {
    pub fn new(
        faculties: Vec<Faculty>,
        groups: Vec<Group>,
        schedule: Vec<ScheduleEntry>,
        calendar_events: Vec<CalendarEvent>,
    ) -> Self {
        Self {
            faculties,
            groups,
            schedule,
            calendar_events,
            failing: AtomicBool::new(false),
            failing_route: Mutex::new(None),
            fetches: AtomicUsize::new(0),
        }
    }

    /// The data set most tests share: one faculty, two of its groups, a
    /// schedule per group, two campus events.
    pub fn standard() -> Self {
        Self::new(
            vec![faculty(125, "X", "ИКНК")],
            vec![
                group(42799, 125, "3530901/10001"),
                group(42800, 125, "3530901/10002"),
            ],
            vec![
                schedule_entry(1, 42799, "2025-09-01", "Матанализ"),
                schedule_entry(2, 42799, "2025-09-02", "Физика"),
                schedule_entry(3, 42800, "2025-09-01", "История"),
            ],
            vec![
                calendar_event(10, "День открытых дверей", "2025-10-01"),
                calendar_event(11, "Хакатон", "2025-10-15"),
            ],
        )
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fail only the named route ("faculties", "groups", "schedule",
    /// "calendar_events"); the others keep serving.
    pub fn set_failing_route(&self, route: &str) {
        *self.failing_route.lock().unwrap() = Some(route.to_string());
    }

    /// Total fetch calls across all four operations.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn record(&self, route: &str) -> Result<(), RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let route_down = self.failing_route.lock().unwrap().as_deref() == Some(route);
        if self.failing.load(Ordering::SeqCst) || route_down {
            Err(RemoteError::Network("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RemoteRepository for FixtureRemote {
    async fn fetch_faculties(&self) -> Result<Vec<Faculty>, RemoteError> {
        self.record("faculties")?;
        Ok(self.faculties.clone())
    }

    async fn fetch_groups(&self, faculty_id: i32) -> Result<Vec<Group>, RemoteError> {
        self.record("groups")?;
        Ok(self
            .groups
            .iter()
            .filter(|g| g.faculty_id == faculty_id)
            .cloned()
            .collect())
    }

    async fn fetch_schedule(&self, group_id: i32) -> Result<Vec<ScheduleEntry>, RemoteError> {
        self.record("schedule")?;
        Ok(self
            .schedule
            .iter()
            .filter(|s| s.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn fetch_calendar_events(&self) -> Result<Vec<CalendarEvent>, RemoteError> {
        self.record("calendar_events")?;
        Ok(self.calendar_events.clone())
    }
}

pub fn faculty(id: i32, name: &str, abbr: &str) -> Faculty {
    Faculty {
        id,
        name: name.to_string(),
        abbr: abbr.to_string(),
    }
}

pub fn group(id: i32, faculty_id: i32, name: &str) -> Group {
    Group {
        id,
        faculty_id,
        name: name.to_string(),
    }
}

pub fn schedule_entry(id: i32, group_id: i32, date: &str, subject: &str) -> ScheduleEntry {
    ScheduleEntry {
        id,
        group_id,
        date: Some(date.to_string()),
        weekday: None,
        subject: subject.to_string(),
        kind: "Лекция".to_string(),
        start_time: "10:00".to_string(),
        end_time: "11:40".to_string(),
        teacher: Some("Иванов И.И.".to_string()),
        room: Some("ГЗ 201".to_string()),
        is_done: false,
    }
}

pub fn calendar_event(id: i32, title: &str, date: &str) -> CalendarEvent {
    CalendarEvent {
        id,
        title: title.to_string(),
        description: None,
        date: date.to_string(),
        start_time: "12:00".to_string(),
        end_time: "14:00".to_string(),
        location: Some("Главный корпус".to_string()),
        creator: "деканат".to_string(),
        calendar_name: "общий".to_string(),
        is_tracked: false,
        is_done: false,
    }
}
