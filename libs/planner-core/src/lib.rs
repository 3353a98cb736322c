//! Core planner library shared by the client data layer and any embedding shell.
//!
//! Provides:
//! - Entity types mirroring the remote feed and the local tables
//!   (Faculty, Group, ScheduleEntry, CalendarEvent, UserNote, StickyNote)
//! - Centralized id narrowing/widening between the 32-bit logical model
//!   and the 64-bit storage representation
//! - Well-known settings keys used for sync bookkeeping

pub mod convert;
pub mod settings;
pub mod types;

pub use convert::{id_from_db, id_to_db, IdError};
pub use settings::{GROUP_ID_KEY, LAST_SYNC_TIME_KEY};
pub use types::{CalendarEvent, Faculty, Group, ScheduleEntry, StickyNote, UserNote};
