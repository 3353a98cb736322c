//! SQLite schema definitions.

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 1;

/// Complete schema for the local planner database.
pub const SCHEMA: &str = r#"
-- Faculty reference data (replaced wholesale on sync)
CREATE TABLE IF NOT EXISTS faculties (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    abbr TEXT NOT NULL
);

-- Study group reference data (replaced wholesale on sync)
CREATE TABLE IF NOT EXISTS study_groups (
    id INTEGER PRIMARY KEY,
    faculty_id INTEGER NOT NULL,
    name TEXT NOT NULL
);

-- Campus calendar events; is_tracked/is_done are local annotations
CREATE TABLE IF NOT EXISTS calendar_events (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    date TEXT NOT NULL,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    location TEXT,
    creator TEXT NOT NULL,
    calendar_name TEXT NOT NULL,
    is_tracked INTEGER DEFAULT 0,
    is_done INTEGER DEFAULT 0
);

-- The selected group's class schedule; is_done is a local annotation
CREATE TABLE IF NOT EXISTS user_schedule (
    id INTEGER PRIMARY KEY,
    group_id INTEGER NOT NULL,
    date TEXT,
    weekday INTEGER,
    subject TEXT NOT NULL,
    type TEXT NOT NULL,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    teacher TEXT,
    audithory TEXT,
    is_done INTEGER DEFAULT 0
);

-- User-authored notes; never touched by sync
CREATE TABLE IF NOT EXISTS user_notes (
    id INTEGER PRIMARY KEY,
    lesson_id INTEGER,
    date TEXT,
    header TEXT,
    note TEXT,
    is_notifications_enabled INTEGER DEFAULT 0,
    start_time TEXT,
    end_time TEXT,
    created_at TEXT,
    updated_at TEXT,
    is_done INTEGER DEFAULT 0
);

-- Sticky notes; never touched by sync
CREATE TABLE IF NOT EXISTS sticky_notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    header TEXT NOT NULL,
    note TEXT NOT NULL
);

-- Generic key/value settings (sync bookkeeping lives here)
CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_study_groups_faculty ON study_groups(faculty_id);
CREATE INDEX IF NOT EXISTS idx_calendar_events_date ON calendar_events(date);
CREATE INDEX IF NOT EXISTS idx_user_schedule_date ON user_schedule(date);
CREATE INDEX IF NOT EXISTS idx_user_notes_date ON user_notes(date);
CREATE INDEX IF NOT EXISTS idx_user_notes_lesson ON user_notes(lesson_id);
"#;
