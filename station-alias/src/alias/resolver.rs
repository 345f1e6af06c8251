//! Alias resolution over the index and the durable store.
//!
//! Every mutation follows the same order: check the index, write the store,
//! then update the index. If the store write fails the index is left alone,
//! so the index never claims a change the store did not persist.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::domain::{AliasRecord, StationKey, validate_alias};
use crate::store::{AliasStore, StoreError};

use super::error::ResolverError;
use super::index::AliasIndex;

/// Resolves station names to aliases and manages alias lifecycle.
///
/// Reads take a shared lock on the index only. Writes are serialised by a
/// single writer lock held across the whole check, store write, index update
/// sequence; the index write lock is taken only for the final step.
pub struct AliasResolver {
    store: Arc<dyn AliasStore>,
    index: RwLock<AliasIndex>,
    writer: Mutex<()>,
}

impl AliasResolver {
    /// Prepare the store and load every alias into a fresh index.
    ///
    /// Fails if the schema cannot be created or the table cannot be read;
    /// the service must not start with an index it could not fill.
    pub fn warm_start(store: Arc<dyn AliasStore>) -> Result<Self, StoreError> {
        store.ensure_schema()?;
        let records = store.scan_all()?;
        let index = AliasIndex::build(records);
        info!(aliases = index.len(), "alias index loaded");

        Ok(Self {
            store,
            index: RwLock::new(index),
            writer: Mutex::new(()),
        })
    }

    /// Name to report for a station: its alias, or the station name itself.
    pub fn resolve(&self, key: &StationKey) -> String {
        self.read_index()
            .lookup(key)
            .unwrap_or(key.station_name())
            .to_string()
    }

    /// Assign an alias to a station that has none.
    pub fn create(
        &self,
        key: StationKey,
        alias: impl Into<String>,
    ) -> Result<AliasRecord, ResolverError> {
        let record = AliasRecord::new(key, alias)?;
        let _writer = self.lock_writer();

        if self.read_index().contains(&record.key) {
            debug!(station = %record.key, "alias already defined");
            return Err(ResolverError::Conflict(record.key));
        }

        self.store.insert_one(&record)?;
        self.write_index().put(record.key.clone(), record.alias.clone());

        info!(station = %record.key, alias = %record.alias, "alias created");
        Ok(record)
    }

    /// Replace the alias of a station that already has one.
    pub fn update(
        &self,
        key: StationKey,
        alias: impl Into<String>,
    ) -> Result<AliasRecord, ResolverError> {
        let alias = alias.into();
        validate_alias(&alias)?;
        let _writer = self.lock_writer();

        if !self.read_index().contains(&key) {
            debug!(station = %key, "no alias to update");
            return Err(ResolverError::NotFound(key));
        }

        self.store.update_one(&key, &alias)?;
        self.write_index().put(key.clone(), alias.clone());

        info!(station = %key, alias = %alias, "alias updated");
        Ok(AliasRecord { key, alias })
    }

    /// Remove the alias of a station, returning the record that was removed.
    pub fn delete(&self, key: StationKey) -> Result<AliasRecord, ResolverError> {
        let _writer = self.lock_writer();

        let Some(current) = self.read_index().lookup(&key).map(str::to_owned) else {
            debug!(station = %key, "no alias to delete");
            return Err(ResolverError::NotFound(key));
        };

        self.store.delete_one(&key)?;
        let removed = self.write_index().remove(&key).unwrap_or(current);

        info!(station = %key, alias = %removed, "alias deleted");
        Ok(AliasRecord {
            key,
            alias: removed,
        })
    }

    /// Every aliased station, sorted by key.
    pub fn list(&self) -> Vec<AliasRecord> {
        self.read_index().records()
    }

    /// Number of aliased stations.
    pub fn len(&self) -> usize {
        self.read_index().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_index().is_empty()
    }

    /// Copy of the current index.
    pub fn snapshot(&self) -> AliasIndex {
        self.read_index().clone()
    }

    // Index mutations are single map operations, so a poisoned lock still
    // guards a consistent map.
    fn read_index(&self) -> RwLockReadGuard<'_, AliasIndex> {
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_index(&self) -> RwLockWriteGuard<'_, AliasIndex> {
        self.index.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use crate::store::{MemoryAliasStore, SqliteAliasStore};
    use proptest::prelude::*;

    fn key(pool: u32, name: &str) -> StationKey {
        StationKey::new(pool, name).unwrap()
    }

    fn resolver() -> (Arc<MemoryAliasStore>, AliasResolver) {
        let store = Arc::new(MemoryAliasStore::new());
        let resolver = AliasResolver::warm_start(store.clone()).unwrap();
        (store, resolver)
    }

    /// Index that a restart would produce from the current store content.
    fn rebuilt(store: &dyn AliasStore) -> AliasIndex {
        AliasIndex::build(store.scan_all().unwrap())
    }

    #[test]
    fn unaliased_station_passes_through() {
        let (_, resolver) = resolver();
        assert_eq!(resolver.resolve(&key(1, "StationA")), "StationA");
    }

    #[test]
    fn create_then_resolve() {
        let (store, resolver) = resolver();
        let record = resolver.create(key(1, "StationA"), "Alpha").unwrap();

        assert_eq!(record.alias, "Alpha");
        assert_eq!(resolver.resolve(&key(1, "StationA")), "Alpha");
        assert_eq!(
            store.get_one(&key(1, "StationA")).unwrap().unwrap().alias,
            "Alpha"
        );
    }

    #[test]
    fn second_create_conflicts() {
        let (_, resolver) = resolver();
        resolver.create(key(1, "StationA"), "Alpha").unwrap();

        let err = resolver.create(key(1, "StationA"), "Beta").unwrap_err();
        assert!(matches!(err, ResolverError::Conflict(_)));
        assert_eq!(resolver.resolve(&key(1, "StationA")), "Alpha");
    }

    #[test]
    fn update_requires_existing_alias() {
        let (store, resolver) = resolver();
        let err = resolver.update(key(2, "Ghost"), "X").unwrap_err();
        assert!(matches!(err, ResolverError::NotFound(_)));
        assert!(store.scan_all().unwrap().is_empty());
    }

    #[test]
    fn update_replaces_alias() {
        let (store, resolver) = resolver();
        resolver.create(key(1, "StationA"), "Alpha").unwrap();
        let record = resolver.update(key(1, "StationA"), "Beta").unwrap();

        assert_eq!(record.alias, "Beta");
        assert_eq!(resolver.resolve(&key(1, "StationA")), "Beta");
        assert_eq!(resolver.snapshot(), rebuilt(&*store));
    }

    #[test]
    fn delete_restores_fallback() {
        let (_, resolver) = resolver();
        resolver.create(key(1, "StationA"), "Alpha").unwrap();

        let removed = resolver.delete(key(1, "StationA")).unwrap();
        assert_eq!(removed.alias, "Alpha");
        assert_eq!(resolver.resolve(&key(1, "StationA")), "StationA");
    }

    #[test]
    fn delete_requires_existing_alias() {
        let (_, resolver) = resolver();
        assert!(matches!(
            resolver.delete(key(1, "StationA")),
            Err(ResolverError::NotFound(_))
        ));
    }

    #[test]
    fn pools_are_independent() {
        let (_, resolver) = resolver();
        resolver.create(key(1, "X"), "One").unwrap();

        assert_eq!(resolver.resolve(&key(2, "X")), "X");
        resolver.create(key(2, "X"), "Two").unwrap();
        resolver.delete(key(1, "X")).unwrap();
        assert_eq!(resolver.resolve(&key(2, "X")), "Two");
    }

    #[test]
    fn names_are_case_sensitive() {
        let (_, resolver) = resolver();
        resolver.create(key(1, "StationA"), "Alpha").unwrap();

        assert_eq!(resolver.resolve(&key(1, "stationa")), "stationa");
        resolver.create(key(1, "stationa"), "lower").unwrap();
        assert_eq!(resolver.len(), 2);
    }

    #[test]
    fn empty_alias_is_rejected() {
        let (_, resolver) = resolver();
        assert!(matches!(
            resolver.create(key(1, "StationA"), ""),
            Err(ResolverError::Invalid(DomainError::InvalidAlias(_)))
        ));
        resolver.create(key(1, "StationA"), "Alpha").unwrap();
        assert!(matches!(
            resolver.update(key(1, "StationA"), ""),
            Err(ResolverError::Invalid(_))
        ));
        assert_eq!(resolver.resolve(&key(1, "StationA")), "Alpha");
    }

    #[test]
    fn failed_create_leaves_index_untouched() {
        let (store, resolver) = resolver();
        store.set_failing(true);

        let err = resolver.create(key(1, "StationA"), "Alpha").unwrap_err();
        assert!(matches!(err, ResolverError::Storage(_)));
        assert!(resolver.is_empty());
        assert_eq!(resolver.resolve(&key(1, "StationA")), "StationA");

        // A retry after the store recovers is not reported as a conflict
        store.set_failing(false);
        resolver.create(key(1, "StationA"), "Alpha").unwrap();
    }

    #[test]
    fn row_added_behind_the_index_fails_create() {
        let (store, resolver) = resolver();
        store
            .insert_one(&AliasRecord::new(key(1, "StationA"), "External").unwrap())
            .unwrap();

        let err = resolver.create(key(1, "StationA"), "Alpha").unwrap_err();
        assert!(matches!(
            err,
            ResolverError::Storage(StoreError::DuplicateRow(_))
        ));
        assert!(resolver.is_empty());
        assert_eq!(resolver.resolve(&key(1, "StationA")), "StationA");
    }

    #[test]
    fn failed_update_leaves_index_untouched() {
        let (store, resolver) = resolver();
        resolver.create(key(1, "StationA"), "Alpha").unwrap();
        store.set_failing(true);

        assert!(matches!(
            resolver.update(key(1, "StationA"), "Beta"),
            Err(ResolverError::Storage(_))
        ));
        assert_eq!(resolver.resolve(&key(1, "StationA")), "Alpha");
    }

    #[test]
    fn failed_delete_leaves_index_untouched() {
        let (store, resolver) = resolver();
        resolver.create(key(1, "StationA"), "Alpha").unwrap();
        store.set_failing(true);

        assert!(matches!(
            resolver.delete(key(1, "StationA")),
            Err(ResolverError::Storage(_))
        ));
        assert_eq!(resolver.resolve(&key(1, "StationA")), "Alpha");

        store.set_failing(false);
        assert_eq!(resolver.snapshot(), rebuilt(&*store));
    }

    #[test]
    fn warm_start_loads_existing_rows() {
        let store = Arc::new(MemoryAliasStore::with_records([
            AliasRecord::new(key(1, "StationA"), "Alpha").unwrap(),
            AliasRecord::new(key(2, "StationB"), "Bravo").unwrap(),
        ]));
        let resolver = AliasResolver::warm_start(store).unwrap();

        assert_eq!(resolver.len(), 2);
        assert_eq!(resolver.resolve(&key(2, "StationB")), "Bravo");
        assert!(resolver.create(key(1, "StationA"), "Again").is_err());
    }

    #[test]
    fn warm_start_fails_on_unreadable_store() {
        let store = Arc::new(MemoryAliasStore::new());
        store.set_failing(true);
        assert!(AliasResolver::warm_start(store).is_err());
    }

    #[test]
    fn warm_start_survives_restart_on_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let config = crate::store::SqliteStoreConfig::new(dir.path().join("aliases.sqlite3"));

        {
            let store = Arc::new(SqliteAliasStore::open(&config).unwrap());
            let resolver = AliasResolver::warm_start(store).unwrap();
            resolver.create(key(1, "StationA"), "Alpha").unwrap();
            resolver.create(key(1, "StationB"), "Bravo").unwrap();
            resolver.delete(key(1, "StationB")).unwrap();
        }

        let store = Arc::new(SqliteAliasStore::open(&config).unwrap());
        let resolver = AliasResolver::warm_start(store).unwrap();
        assert_eq!(resolver.resolve(&key(1, "StationA")), "Alpha");
        assert_eq!(resolver.resolve(&key(1, "StationB")), "StationB");
    }

    #[test]
    fn concurrent_creates_admit_one_winner() {
        let (store, resolver) = resolver();

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let resolver = &resolver;
                    scope.spawn(move || resolver.create(key(1, "StationA"), format!("alias-{i}")))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(store.scan_all().unwrap().len(), 1);
        assert_eq!(resolver.snapshot(), rebuilt(&*store));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Create(u32, &'static str, &'static str),
        Update(u32, &'static str, &'static str),
        Delete(u32, &'static str),
        StoreDown(bool),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let pool = 0u32..3;
        let name = prop::sample::select(vec!["StationA", "stationa", "CP-1"]);
        let alias = prop::sample::select(vec!["Alpha", "Beta", "Gamma"]);
        prop_oneof![
            (pool.clone(), name.clone(), alias.clone()).prop_map(|(p, n, a)| Op::Create(p, n, a)),
            (pool.clone(), name.clone(), alias).prop_map(|(p, n, a)| Op::Update(p, n, a)),
            (pool, name).prop_map(|(p, n)| Op::Delete(p, n)),
            any::<bool>().prop_map(Op::StoreDown),
        ]
    }

    proptest! {
        #[test]
        fn index_matches_store_after_any_sequence(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let (store, resolver) = resolver();

            for op in ops {
                let _ = match op {
                    Op::Create(p, n, a) => resolver.create(key(p, n), a).map(|_| ()),
                    Op::Update(p, n, a) => resolver.update(key(p, n), a).map(|_| ()),
                    Op::Delete(p, n) => resolver.delete(key(p, n)).map(|_| ()),
                    Op::StoreDown(down) => {
                        store.set_failing(down);
                        Ok(())
                    }
                };
            }

            store.set_failing(false);
            prop_assert_eq!(resolver.snapshot(), rebuilt(&*store));
        }

        #[test]
        fn aliasing_one_key_leaves_others_alone(
            pool_a in 0u32..1000,
            pool_b in 0u32..1000,
            name in "[A-Za-z0-9]{1,8}",
        ) {
            prop_assume!(pool_a != pool_b);
            let (_, resolver) = resolver();
            resolver.create(key(pool_a, &name), "Alias").unwrap();
            prop_assert_eq!(resolver.resolve(&key(pool_b, &name)), name.clone());
        }
    }
}
