//! In-memory alias store used by tests.
//!
//! Behaves like the SQLite store but keeps nothing on disk. It can be told
//! to fail every call, which is how the resolver's failure handling is
//! exercised.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::domain::{AliasRecord, StationKey};

use super::AliasStore;
use super::error::StoreError;

/// Alias store held entirely in memory.
#[derive(Default)]
pub struct MemoryAliasStore {
    rows: Mutex<BTreeMap<StationKey, String>>,
    failing: AtomicBool,
}

impl MemoryAliasStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with records.
    pub fn with_records(records: impl IntoIterator<Item = AliasRecord>) -> Self {
        let rows = records.into_iter().map(|r| (r.key, r.alias)).collect();
        Self {
            rows: Mutex::new(rows),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn rows(&self) -> Result<MutexGuard<'_, BTreeMap<StationKey, String>>, StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        self.rows
            .lock()
            .map_err(|_| StoreError::Unavailable("rows mutex poisoned".to_string()))
    }
}

impl AliasStore for MemoryAliasStore {
    fn ensure_schema(&self) -> Result<(), StoreError> {
        self.rows().map(|_| ())
    }

    fn scan_all(&self) -> Result<Vec<AliasRecord>, StoreError> {
        Ok(self
            .rows()?
            .iter()
            .map(|(key, alias)| AliasRecord {
                key: key.clone(),
                alias: alias.clone(),
            })
            .collect())
    }

    fn get_one(&self, key: &StationKey) -> Result<Option<AliasRecord>, StoreError> {
        Ok(self.rows()?.get(key).map(|alias| AliasRecord {
            key: key.clone(),
            alias: alias.clone(),
        }))
    }

    fn insert_one(&self, record: &AliasRecord) -> Result<(), StoreError> {
        let mut rows = self.rows()?;
        if rows.contains_key(&record.key) {
            return Err(StoreError::DuplicateRow(record.key.to_string()));
        }
        rows.insert(record.key.clone(), record.alias.clone());
        Ok(())
    }

    fn update_one(&self, key: &StationKey, alias: &str) -> Result<(), StoreError> {
        let mut rows = self.rows()?;
        let slot = rows
            .get_mut(key)
            .ok_or_else(|| StoreError::MissingRow(key.to_string()))?;
        *slot = alias.to_string();
        Ok(())
    }

    fn delete_one(&self, key: &StationKey) -> Result<(), StoreError> {
        self.rows()?
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::MissingRow(key.to_string()))
    }
}
