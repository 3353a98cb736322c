//! Well-known keys in the local settings table.

/// Epoch-milliseconds of the last completed sync, stored as a string.
pub const LAST_SYNC_TIME_KEY: &str = "last_sync_time";

/// Id of the user's selected study group, stored as a string.
pub const GROUP_ID_KEY: &str = "group_id";
