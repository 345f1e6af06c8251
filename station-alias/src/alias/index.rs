//! In-memory alias index.
//!
//! The index is a projection of the alias table: it answers "what is this
//! station called?" without touching storage. It is rebuilt from the store at
//! startup and never written back.

use std::collections::HashMap;

use crate::domain::{AliasRecord, StationKey};

/// Map from station key to its current alias.
///
/// Keyed by the full [`StationKey`] value, so two different stations can
/// never share an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasIndex {
    aliases: HashMap<StationKey, String>,
}

impl AliasIndex {
    /// Build an index holding exactly the given records.
    ///
    /// Later records win if a key appears twice.
    pub fn build(records: impl IntoIterator<Item = AliasRecord>) -> Self {
        let aliases = records.into_iter().map(|r| (r.key, r.alias)).collect();
        Self { aliases }
    }

    /// Look up the alias for a station.
    pub fn lookup(&self, key: &StationKey) -> Option<&str> {
        self.aliases.get(key).map(String::as_str)
    }

    /// Whether the station has an alias.
    pub fn contains(&self, key: &StationKey) -> bool {
        self.aliases.contains_key(key)
    }

    /// Insert or overwrite the alias for a station.
    pub fn put(&mut self, key: StationKey, alias: String) {
        self.aliases.insert(key, alias);
    }

    /// Remove the alias for a station, returning it if there was one.
    pub fn remove(&mut self, key: &StationKey) -> Option<String> {
        self.aliases.remove(key)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Every entry as a record, sorted by key.
    pub fn records(&self) -> Vec<AliasRecord> {
        let mut records: Vec<AliasRecord> = self
            .aliases
            .iter()
            .map(|(key, alias)| AliasRecord {
                key: key.clone(),
                alias: alias.clone(),
            })
            .collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));
        records
    }
}
