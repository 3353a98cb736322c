//! Repository pattern for database access.

use crate::db::error::DbError;
use planner_core::{
    id_from_db, id_to_db, CalendarEvent, Faculty, Group, ScheduleEntry, StickyNote, UserNote,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

type Result<T> = std::result::Result<T, DbError>;

/// Repository for faculty reference data.
pub trait FacultyRepository {
    fn get_faculties(&self) -> Result<Vec<Faculty>>;
    fn insert_faculty(&self, faculty: &Faculty) -> Result<()>;
    fn delete_all_faculties(&self) -> Result<()>;
}

/// Repository for study group reference data.
pub trait GroupRepository {
    fn get_groups(&self) -> Result<Vec<Group>>;
    fn get_groups_by_faculty(&self, faculty_id: i32) -> Result<Vec<Group>>;
    fn insert_group(&self, group: &Group) -> Result<()>;
    fn delete_all_groups(&self) -> Result<()>;
}

/// Repository for campus calendar events.
pub trait CalendarEventRepository {
    fn get_calendar_events(&self) -> Result<Vec<CalendarEvent>>;
    fn get_calendar_events_by_date(&self, date: &str) -> Result<Vec<CalendarEvent>>;
    fn get_calendar_events_by_date_range(&self, start: &str, end: &str)
        -> Result<Vec<CalendarEvent>>;
    fn insert_calendar_event(&self, event: &CalendarEvent) -> Result<()>;
    fn set_event_tracked(&self, id: i32, tracked: bool) -> Result<()>;
    fn set_event_done(&self, id: i32, done: bool) -> Result<()>;
    fn delete_calendar_event(&self, id: i32) -> Result<()>;
    fn delete_all_calendar_events(&self) -> Result<()>;
}

/// Repository for the user's class schedule.
pub trait ScheduleRepository {
    fn get_user_schedule(&self) -> Result<Vec<ScheduleEntry>>;
    fn get_user_schedule_by_date(&self, date: &str) -> Result<Vec<ScheduleEntry>>;
    fn get_user_schedule_by_date_range(&self, start: &str, end: &str)
        -> Result<Vec<ScheduleEntry>>;
    fn insert_schedule_entry(&self, entry: &ScheduleEntry) -> Result<()>;
    fn set_schedule_done(&self, id: i32, done: bool) -> Result<()>;
    fn delete_user_schedule(&self) -> Result<()>;
}

/// Repository for user-authored notes.
pub trait NoteRepository {
    fn get_user_notes(&self) -> Result<Vec<UserNote>>;
    fn get_user_notes_by_date(&self, date: &str) -> Result<Vec<UserNote>>;
    fn get_user_notes_by_lesson(&self, lesson_id: i32) -> Result<Vec<UserNote>>;
    fn get_notifiable_user_notes(&self) -> Result<Vec<UserNote>>;
    fn insert_user_note(&self, note: &UserNote) -> Result<()>;
    fn set_note_done(&self, id: i32, done: bool) -> Result<()>;
    fn set_note_notifications_enabled(&self, id: i32, enabled: bool) -> Result<()>;
    fn delete_user_note(&self, id: i32) -> Result<()>;
    fn delete_all_user_notes(&self) -> Result<()>;
}

/// Repository for sticky notes.
pub trait StickyNoteRepository {
    fn get_sticky_notes(&self) -> Result<Vec<StickyNote>>;
    fn get_sticky_note_by_id(&self, id: i32) -> Result<Option<StickyNote>>;
    fn insert_sticky_note(&self, header: &str, note: &str) -> Result<i32>;
    fn upsert_sticky_note(&self, note: &StickyNote) -> Result<()>;
    fn delete_sticky_note(&self, id: i32) -> Result<()>;
    fn delete_all_sticky_notes(&self) -> Result<()>;
}

/// Repository for the generic key/value settings table.
pub trait SettingsRepository {
    /// Read a setting; a miss or a storage failure both surface as `None`.
    fn get_setting(&self, key: &str) -> Option<String>;
    fn set_setting(&self, key: &str, value: &str) -> Result<()>;
    fn delete_setting(&self, key: &str) -> Result<()>;
}

/// Everything one full sync replaces, fetched up front so the replace can
/// run as a single transaction.
#[derive(Debug, Clone, Default)]
pub struct SyncSnapshot {
    pub faculties: Vec<Faculty>,
    pub groups: Vec<Group>,
    pub calendar_events: Vec<CalendarEvent>,
    pub schedule: Vec<ScheduleEntry>,
}

/// Local annotation flags restored after a replace-all sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct RestoredFlags {
    pub schedule_done: usize,
    pub events_done: usize,
    pub events_tracked: usize,
}

/// Replace-path operations used only by the synchronizer.
pub trait SyncStore {
    /// Replace faculties, groups, calendar events, and schedule with the
    /// snapshot in one transaction, re-applying local annotation flags by id.
    fn apply_sync_snapshot(&mut self, snapshot: &SyncSnapshot) -> Result<RestoredFlags>;
}

/// SQLite implementation of all repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Test-only access to the underlying connection.
    #[cfg(test)]
    pub(crate) fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute(
            "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
            params![super::schema::SCHEMA_VERSION],
        )?;
        Ok(())
    }

    // --- row decoding helpers; the only place stored values are narrowed ---

    fn get_id(row: &Row, idx: usize) -> rusqlite::Result<i32> {
        let raw: i64 = row.get(idx)?;
        id_from_db(raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Integer,
                Box::new(e),
            )
        })
    }

    fn get_opt_id(row: &Row, idx: usize) -> rusqlite::Result<Option<i32>> {
        let raw: Option<i64> = row.get(idx)?;
        raw.map(|v| {
            id_from_db(v).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Integer,
                    Box::new(e),
                )
            })
        })
        .transpose()
    }

    /// Stored flags are 0/1 integers; NULL decodes as false.
    fn get_flag(row: &Row, idx: usize) -> rusqlite::Result<bool> {
        let raw: Option<i64> = row.get(idx)?;
        Ok(matches!(raw, Some(v) if v != 0))
    }

    fn get_weekday(row: &Row, idx: usize) -> rusqlite::Result<Option<u8>> {
        let raw: Option<i64> = row.get(idx)?;
        raw.map(|v| {
            u8::try_from(v).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Integer,
                    Box::new(e),
                )
            })
        })
        .transpose()
    }

    fn row_to_faculty(row: &Row) -> rusqlite::Result<Faculty> {
        Ok(Faculty {
            id: Self::get_id(row, 0)?,
            name: row.get(1)?,
            abbr: row.get(2)?,
        })
    }

    fn row_to_group(row: &Row) -> rusqlite::Result<Group> {
        Ok(Group {
            id: Self::get_id(row, 0)?,
            faculty_id: Self::get_id(row, 1)?,
            name: row.get(2)?,
        })
    }

    fn row_to_event(row: &Row) -> rusqlite::Result<CalendarEvent> {
        Ok(CalendarEvent {
            id: Self::get_id(row, 0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            date: row.get(3)?,
            start_time: row.get(4)?,
            end_time: row.get(5)?,
            location: row.get(6)?,
            creator: row.get(7)?,
            calendar_name: row.get(8)?,
            is_tracked: Self::get_flag(row, 9)?,
            is_done: Self::get_flag(row, 10)?,
        })
    }

    fn row_to_schedule_entry(row: &Row) -> rusqlite::Result<ScheduleEntry> {
        Ok(ScheduleEntry {
            id: Self::get_id(row, 0)?,
            group_id: Self::get_id(row, 1)?,
            date: row.get(2)?,
            weekday: Self::get_weekday(row, 3)?,
            subject: row.get(4)?,
            kind: row.get(5)?,
            start_time: row.get(6)?,
            end_time: row.get(7)?,
            teacher: row.get(8)?,
            room: row.get(9)?,
            is_done: Self::get_flag(row, 10)?,
        })
    }

    fn row_to_note(row: &Row) -> rusqlite::Result<UserNote> {
        Ok(UserNote {
            id: Self::get_id(row, 0)?,
            lesson_id: Self::get_opt_id(row, 1)?,
            date: row.get(2)?,
            header: row.get(3)?,
            note: row.get(4)?,
            is_notifications_enabled: Self::get_flag(row, 5)?,
            start_time: row.get(6)?,
            end_time: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
            is_done: Self::get_flag(row, 10)?,
        })
    }

    fn row_to_sticky_note(row: &Row) -> rusqlite::Result<StickyNote> {
        Ok(StickyNote {
            id: Self::get_id(row, 0)?,
            header: row.get(1)?,
            note: row.get(2)?,
        })
    }
}

const SELECT_EVENT: &str = "SELECT id, title, description, date, start_time, end_time, location, \
     creator, calendar_name, is_tracked, is_done FROM calendar_events";

const SELECT_SCHEDULE: &str = "SELECT id, group_id, date, weekday, subject, type, start_time, \
     end_time, teacher, audithory, is_done FROM user_schedule";

const SELECT_NOTE: &str = "SELECT id, lesson_id, date, header, note, is_notifications_enabled, \
     start_time, end_time, created_at, updated_at, is_done FROM user_notes";

// Insert statements are shared between the per-entity traits and the
// transactional sync path, so they take a bare connection.

fn insert_faculty_stmt(conn: &Connection, faculty: &Faculty) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO faculties (id, name, abbr) VALUES (?1, ?2, ?3)",
        params![id_to_db(faculty.id), faculty.name, faculty.abbr],
    )?;
    Ok(())
}

fn insert_group_stmt(conn: &Connection, group: &Group) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO study_groups (id, faculty_id, name) VALUES (?1, ?2, ?3)",
        params![id_to_db(group.id), id_to_db(group.faculty_id), group.name],
    )?;
    Ok(())
}

fn insert_event_stmt(conn: &Connection, event: &CalendarEvent) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO calendar_events (id, title, description, date, start_time, \
         end_time, location, creator, calendar_name, is_tracked, is_done) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            id_to_db(event.id),
            event.title,
            event.description,
            event.date,
            event.start_time,
            event.end_time,
            event.location,
            event.creator,
            event.calendar_name,
            event.is_tracked as i64,
            event.is_done as i64,
        ],
    )?;
    Ok(())
}

fn insert_schedule_stmt(conn: &Connection, entry: &ScheduleEntry) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO user_schedule (id, group_id, date, weekday, subject, type, \
         start_time, end_time, teacher, audithory, is_done) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            id_to_db(entry.id),
            id_to_db(entry.group_id),
            entry.date,
            entry.weekday.map(i64::from),
            entry.subject,
            entry.kind,
            entry.start_time,
            entry.end_time,
            entry.teacher,
            entry.room,
            entry.is_done as i64,
        ],
    )?;
    Ok(())
}

impl FacultyRepository for SqliteRepository {
    fn get_faculties(&self) -> Result<Vec<Faculty>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, abbr FROM faculties ORDER BY id")?;
        let faculties = stmt
            .query_map([], Self::row_to_faculty)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(faculties)
    }

    fn insert_faculty(&self, faculty: &Faculty) -> Result<()> {
        insert_faculty_stmt(&self.conn, faculty).map_err(Into::into)
    }

    fn delete_all_faculties(&self) -> Result<()> {
        self.conn.execute("DELETE FROM faculties", [])?;
        Ok(())
    }
}

impl GroupRepository for SqliteRepository {
    fn get_groups(&self) -> Result<Vec<Group>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, faculty_id, name FROM study_groups ORDER BY id")?;
        let groups = stmt
            .query_map([], Self::row_to_group)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(groups)
    }

    fn get_groups_by_faculty(&self, faculty_id: i32) -> Result<Vec<Group>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, faculty_id, name FROM study_groups WHERE faculty_id = ?1 ORDER BY id",
        )?;
        let groups = stmt
            .query_map(params![id_to_db(faculty_id)], Self::row_to_group)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(groups)
    }

    fn insert_group(&self, group: &Group) -> Result<()> {
        insert_group_stmt(&self.conn, group).map_err(Into::into)
    }

    fn delete_all_groups(&self) -> Result<()> {
        self.conn.execute("DELETE FROM study_groups", [])?;
        Ok(())
    }
}

impl CalendarEventRepository for SqliteRepository {
    fn get_calendar_events(&self) -> Result<Vec<CalendarEvent>> {
        let sql = format!("{SELECT_EVENT} ORDER BY date, start_time");
        let mut stmt = self.conn.prepare(&sql)?;
        let events = stmt
            .query_map([], Self::row_to_event)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(events)
    }

    fn get_calendar_events_by_date(&self, date: &str) -> Result<Vec<CalendarEvent>> {
        let sql = format!("{SELECT_EVENT} WHERE date = ?1 ORDER BY start_time");
        let mut stmt = self.conn.prepare(&sql)?;
        let events = stmt
            .query_map(params![date], Self::row_to_event)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(events)
    }

    fn get_calendar_events_by_date_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<CalendarEvent>> {
        let sql = format!("{SELECT_EVENT} WHERE date BETWEEN ?1 AND ?2 ORDER BY date, start_time");
        let mut stmt = self.conn.prepare(&sql)?;
        let events = stmt
            .query_map(params![start, end], Self::row_to_event)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(events)
    }

    fn insert_calendar_event(&self, event: &CalendarEvent) -> Result<()> {
        insert_event_stmt(&self.conn, event).map_err(Into::into)
    }

    fn set_event_tracked(&self, id: i32, tracked: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE calendar_events SET is_tracked = ?1 WHERE id = ?2",
            params![tracked as i64, id_to_db(id)],
        )?;
        Ok(())
    }

    fn set_event_done(&self, id: i32, done: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE calendar_events SET is_done = ?1 WHERE id = ?2",
            params![done as i64, id_to_db(id)],
        )?;
        Ok(())
    }

    fn delete_calendar_event(&self, id: i32) -> Result<()> {
        self.conn.execute(
            "DELETE FROM calendar_events WHERE id = ?1",
            params![id_to_db(id)],
        )?;
        Ok(())
    }

    fn delete_all_calendar_events(&self) -> Result<()> {
        self.conn.execute("DELETE FROM calendar_events", [])?;
        Ok(())
    }
}

impl ScheduleRepository for SqliteRepository {
    fn get_user_schedule(&self) -> Result<Vec<ScheduleEntry>> {
        let sql = format!("{SELECT_SCHEDULE} ORDER BY date, weekday, start_time");
        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map([], Self::row_to_schedule_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn get_user_schedule_by_date(&self, date: &str) -> Result<Vec<ScheduleEntry>> {
        let sql = format!("{SELECT_SCHEDULE} WHERE date = ?1 ORDER BY start_time");
        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![date], Self::row_to_schedule_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn get_user_schedule_by_date_range(&self, start: &str, end: &str) -> Result<Vec<ScheduleEntry>> {
        let sql = format!("{SELECT_SCHEDULE} WHERE date BETWEEN ?1 AND ?2 ORDER BY date, start_time");
        let mut stmt = self.conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![start, end], Self::row_to_schedule_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn insert_schedule_entry(&self, entry: &ScheduleEntry) -> Result<()> {
        insert_schedule_stmt(&self.conn, entry).map_err(Into::into)
    }

    fn set_schedule_done(&self, id: i32, done: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE user_schedule SET is_done = ?1 WHERE id = ?2",
            params![done as i64, id_to_db(id)],
        )?;
        Ok(())
    }

    fn delete_user_schedule(&self) -> Result<()> {
        self.conn.execute("DELETE FROM user_schedule", [])?;
        Ok(())
    }
}

impl NoteRepository for SqliteRepository {
    fn get_user_notes(&self) -> Result<Vec<UserNote>> {
        let sql = format!("{SELECT_NOTE} ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let notes = stmt
            .query_map([], Self::row_to_note)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    fn get_user_notes_by_date(&self, date: &str) -> Result<Vec<UserNote>> {
        let sql = format!("{SELECT_NOTE} WHERE date = ?1 ORDER BY start_time");
        let mut stmt = self.conn.prepare(&sql)?;
        let notes = stmt
            .query_map(params![date], Self::row_to_note)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    fn get_user_notes_by_lesson(&self, lesson_id: i32) -> Result<Vec<UserNote>> {
        let sql = format!("{SELECT_NOTE} WHERE lesson_id = ?1 ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let notes = stmt
            .query_map(params![id_to_db(lesson_id)], Self::row_to_note)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    fn get_notifiable_user_notes(&self) -> Result<Vec<UserNote>> {
        let sql = format!("{SELECT_NOTE} WHERE is_notifications_enabled = 1 ORDER BY date, start_time");
        let mut stmt = self.conn.prepare(&sql)?;
        let notes = stmt
            .query_map([], Self::row_to_note)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    fn insert_user_note(&self, note: &UserNote) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO user_notes (id, lesson_id, date, header, note, \
             is_notifications_enabled, start_time, end_time, created_at, updated_at, is_done) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id_to_db(note.id),
                note.lesson_id.map(id_to_db),
                note.date,
                note.header,
                note.note,
                note.is_notifications_enabled as i64,
                note.start_time,
                note.end_time,
                note.created_at,
                note.updated_at,
                note.is_done as i64,
            ],
        )?;
        Ok(())
    }

    fn set_note_done(&self, id: i32, done: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE user_notes SET is_done = ?1 WHERE id = ?2",
            params![done as i64, id_to_db(id)],
        )?;
        Ok(())
    }

    fn set_note_notifications_enabled(&self, id: i32, enabled: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE user_notes SET is_notifications_enabled = ?1 WHERE id = ?2",
            params![enabled as i64, id_to_db(id)],
        )?;
        Ok(())
    }

    fn delete_user_note(&self, id: i32) -> Result<()> {
        self.conn
            .execute("DELETE FROM user_notes WHERE id = ?1", params![id_to_db(id)])?;
        Ok(())
    }

    fn delete_all_user_notes(&self) -> Result<()> {
        self.conn.execute("DELETE FROM user_notes", [])?;
        Ok(())
    }
}

impl StickyNoteRepository for SqliteRepository {
    fn get_sticky_notes(&self) -> Result<Vec<StickyNote>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, header, note FROM sticky_notes ORDER BY id")?;
        let notes = stmt
            .query_map([], Self::row_to_sticky_note)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    fn get_sticky_note_by_id(&self, id: i32) -> Result<Option<StickyNote>> {
        self.conn
            .query_row(
                "SELECT id, header, note FROM sticky_notes WHERE id = ?1",
                params![id_to_db(id)],
                Self::row_to_sticky_note,
            )
            .optional()
            .map_err(Into::into)
    }

    fn insert_sticky_note(&self, header: &str, note: &str) -> Result<i32> {
        self.conn.execute(
            "INSERT INTO sticky_notes (header, note) VALUES (?1, ?2)",
            params![header, note],
        )?;
        Ok(id_from_db(self.conn.last_insert_rowid())?)
    }

    fn upsert_sticky_note(&self, note: &StickyNote) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO sticky_notes (id, header, note) VALUES (?1, ?2, ?3)",
            params![id_to_db(note.id), note.header, note.note],
        )?;
        Ok(())
    }

    fn delete_sticky_note(&self, id: i32) -> Result<()> {
        self.conn.execute(
            "DELETE FROM sticky_notes WHERE id = ?1",
            params![id_to_db(id)],
        )?;
        Ok(())
    }

    fn delete_all_sticky_notes(&self) -> Result<()> {
        self.conn.execute("DELETE FROM sticky_notes", [])?;
        Ok(())
    }
}

impl SettingsRepository for SqliteRepository {
    fn get_setting(&self, key: &str) -> Option<String> {
        let result = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional();
        match result {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "settings read failed, treating as unset");
                None
            }
        }
    }

    fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete_setting(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl SyncStore for SqliteRepository {
    fn apply_sync_snapshot(&mut self, snapshot: &SyncSnapshot) -> Result<RestoredFlags> {
        let tx = self.conn.transaction()?;

        // Remember which rows carried local annotations before the wipe.
        let done_schedule = flagged_ids(&tx, "SELECT id FROM user_schedule WHERE is_done = 1")?;
        let done_events = flagged_ids(&tx, "SELECT id FROM calendar_events WHERE is_done = 1")?;
        let tracked_events =
            flagged_ids(&tx, "SELECT id FROM calendar_events WHERE is_tracked = 1")?;

        tx.execute("DELETE FROM faculties", [])?;
        for faculty in &snapshot.faculties {
            insert_faculty_stmt(&tx, faculty)?;
        }

        tx.execute("DELETE FROM study_groups", [])?;
        for group in &snapshot.groups {
            insert_group_stmt(&tx, group)?;
        }

        tx.execute("DELETE FROM calendar_events", [])?;
        for event in &snapshot.calendar_events {
            insert_event_stmt(&tx, event)?;
        }

        tx.execute("DELETE FROM user_schedule", [])?;
        for entry in &snapshot.schedule {
            insert_schedule_stmt(&tx, entry)?;
        }

        let restored = RestoredFlags {
            schedule_done: restore_flag(&tx, "user_schedule", "is_done", &done_schedule)?,
            events_done: restore_flag(&tx, "calendar_events", "is_done", &done_events)?,
            events_tracked: restore_flag(&tx, "calendar_events", "is_tracked", &tracked_events)?,
        };

        tx.commit()?;
        Ok(restored)
    }
}

fn flagged_ids(conn: &Connection, sql: &str) -> rusqlite::Result<Vec<i64>> {
    let mut stmt = conn.prepare(sql)?;
    let ids = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(ids)
}

/// Re-set a flag on the freshly inserted rows; ids gone from the remote
/// data set are silently skipped.
fn restore_flag(
    conn: &Connection,
    table: &str,
    column: &str,
    ids: &[i64],
) -> rusqlite::Result<usize> {
    let sql = format!("UPDATE {table} SET {column} = 1 WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let mut restored = 0;
    for id in ids {
        restored += stmt.execute(params![id])?;
    }
    Ok(restored)
}
