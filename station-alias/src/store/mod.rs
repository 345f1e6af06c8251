//! Durable storage for station aliases.
//!
//! The store is a plain table keyed by (pool code, station name). It knows
//! nothing about the in-memory index and does no caching; the resolver
//! decides when to read and write it.

mod error;
mod memory;
mod sqlite;

pub use error::StoreError;
pub use memory::MemoryAliasStore;
pub use sqlite::{SqliteAliasStore, SqliteStoreConfig};

use crate::domain::{AliasRecord, StationKey};

/// Point-access table of alias records.
///
/// Every call either completes or reports a [`StoreError`]; there are no
/// partial results. Implementations must be safe to share between threads.
pub trait AliasStore: Send + Sync {
    /// Create the backing table if it does not exist yet.
    fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Read every record.
    fn scan_all(&self) -> Result<Vec<AliasRecord>, StoreError>;

    /// Read the record for one station, if any.
    fn get_one(&self, key: &StationKey) -> Result<Option<AliasRecord>, StoreError>;

    /// Insert a new record. Fails with [`StoreError::DuplicateRow`] if the key exists.
    fn insert_one(&self, record: &AliasRecord) -> Result<(), StoreError>;

    /// Replace the alias of an existing record. Fails with
    /// [`StoreError::MissingRow`] if the key does not exist.
    fn update_one(&self, key: &StationKey, alias: &str) -> Result<(), StoreError>;

    /// Remove an existing record. Fails with [`StoreError::MissingRow`] if
    /// the key does not exist.
    fn delete_one(&self, key: &StationKey) -> Result<(), StoreError>;
}
