//! Boundary conversions between 32-bit logical ids and 64-bit storage ids.
//!
//! The storage engine keeps every id as an `i64` while the logical model
//! uses `i32`. All narrowing happens here so a malformed row surfaces as a
//! typed error instead of a silent truncation.

use thiserror::Error;

/// Id narrowing failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("stored id {0} does not fit the 32-bit logical model")]
    OutOfRange(i64),
}

/// Widen a logical id for storage.
pub fn id_to_db(id: i32) -> i64 {
    i64::from(id)
}

/// Narrow a stored id back to the logical model.
pub fn id_from_db(raw: i64) -> Result<i32, IdError> {
    i32::try_from(raw).map_err(|_| IdError::OutOfRange(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_in_range_ids() {
        assert_eq!(id_from_db(id_to_db(42799)).unwrap(), 42799);
        assert_eq!(id_from_db(id_to_db(-1)).unwrap(), -1);
    }

    #[test]
    fn rejects_ids_outside_the_logical_model() {
        let raw = i64::from(i32::MAX) + 1;
        assert_eq!(id_from_db(raw), Err(IdError::OutOfRange(raw)));
    }
}
