//! Entity types for the planner data layer.
//!
//! Field names follow the remote feed where they differ from the Rust
//! names (`abbr`, `type`, `audithory`). Local-only annotation flags carry
//! `#[serde(default)]` because the feed never sends them.

use serde::{Deserialize, Serialize};

/// Institute/faculty reference data, replaced wholesale on sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: i32,
    pub name: String,
    pub abbr: String,
}

/// Study group reference data, owned by a faculty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i32,
    pub faculty_id: i32,
    pub name: String,
}

/// One class in the user's schedule.
///
/// Either `date` (dated lesson) or `weekday` (recurring lesson, 1-7) is
/// set. `is_done` is a local-only annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: i32,
    pub group_id: i32,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub weekday: Option<u8>,
    pub subject: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub teacher: Option<String>,
    #[serde(rename = "audithory", default)]
    pub room: Option<String>,
    #[serde(default)]
    pub is_done: bool,
}

/// Campus calendar event. `is_tracked` and `is_done` are local-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location: Option<String>,
    pub creator: String,
    pub calendar_name: String,
    #[serde(default)]
    pub is_tracked: bool,
    #[serde(default)]
    pub is_done: bool,
}

/// A user-authored note, optionally attached to a lesson and/or a date.
///
/// Fully local; never touched by sync. `start_time`/`end_time` and the
/// notifications flag feed the notification scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserNote {
    pub id: i32,
    #[serde(default)]
    pub lesson_id: Option<i32>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub header: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub is_notifications_enabled: bool,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub is_done: bool,
}

/// Date-independent sticky note. Fully local.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickyNote {
    pub id: i32,
    pub header: String,
    pub note: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn faculty_decodes_feed_field_names() {
        let json = r#"{"id":125,"name":"Институт компьютерных наук","abbr":"ИКНК"}"#;
        let faculty: Faculty = serde_json::from_str(json).unwrap();
        assert_eq!(
            faculty,
            Faculty {
                id: 125,
                name: "Институт компьютерных наук".to_string(),
                abbr: "ИКНК".to_string(),
            }
        );
    }

    #[test]
    fn schedule_entry_maps_type_and_audithory() {
        let json = r#"{
            "id": 7, "group_id": 42799, "date": "2025-09-01", "weekday": 1,
            "subject": "Матанализ", "type": "Лекция",
            "start_time": "10:00", "end_time": "11:40",
            "teacher": "Иванов И.И.", "audithory": "ГЗ 201"
        }"#;
        let entry: ScheduleEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.kind, "Лекция");
        assert_eq!(entry.room.as_deref(), Some("ГЗ 201"));
        assert!(!entry.is_done);
    }

    #[test]
    fn local_flags_default_to_false_when_absent_from_feed() {
        let json = r#"{
            "id": 3, "title": "День открытых дверей", "date": "2025-10-01",
            "start_time": "12:00", "end_time": "14:00",
            "creator": "деканат", "calendar_name": "общий"
        }"#;
        let event: CalendarEvent = serde_json::from_str(json).unwrap();
        assert!(!event.is_tracked);
        assert!(!event.is_done);
        assert_eq!(event.description, None);
    }

    #[test]
    fn schedule_entry_allows_missing_date_for_recurring_lessons() {
        let json = r#"{
            "id": 8, "group_id": 42799, "weekday": 3,
            "subject": "Физика", "type": "Практика",
            "start_time": "08:00", "end_time": "09:40"
        }"#;
        let entry: ScheduleEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.date, None);
        assert_eq!(entry.weekday, Some(3));
    }
}
