//! Alias store error types.

/// Errors reported by an [`AliasStore`](super::AliasStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite reported a failure
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A row with the same key already exists
    #[error("row already exists for station {0}")]
    DuplicateRow(String),

    /// No row exists for the key
    #[error("no row for station {0}")]
    MissingRow(String),

    /// A stored row could not be turned into an alias record
    #[error("corrupt row: {0}")]
    Corrupt(String),

    /// The store cannot serve requests right now
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
