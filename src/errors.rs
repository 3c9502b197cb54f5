/// Errors surfaced by the record store.
///
/// "Zero rows" is never an error here: lookups return `Ok(None)` and
/// updates report how many rows they touched. The provisioning flow
/// depends on that distinction to tell "not found" apart from a failed
/// query.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An insert was rejected by a unique index, meaning a concurrent
    /// writer got there first.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("query failed: {0}")]
    Query(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        if is_unique_violation(&e) {
            StoreError::UniqueViolation(e.to_string())
        } else {
            StoreError::Query(e.to_string())
        }
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}
