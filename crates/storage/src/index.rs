//! Secondary index table
//!
//! Maps an index key (see `basedb_core::key`) to the ordered, duplicate-free
//! list of record ids that carry it. The table is sharded with DashMap so
//! `add_to_index` can append to the live generation while readers resolve
//! other keys.

use dashmap::DashMap;
use rustc_hash::FxHasher;
use std::hash::{BuildHasherDefault, Hash};

type FxBuild = BuildHasherDefault<FxHasher>;

/// Secondary index: index key → ids in insertion order
#[derive(Debug)]
pub struct IndexTable<Id: Eq + Hash> {
    entries: DashMap<String, Vec<Id>, FxBuild>,
}

impl<Id: Clone + Eq + Hash> IndexTable<Id> {
    /// Create a new empty IndexTable
    pub fn new() -> Self {
        Self {
            entries: DashMap::with_hasher(FxBuild::default()),
        }
    }

    /// Append an id under a key unless it is already there
    ///
    /// Returns true if the id was added. Membership is a linear scan;
    /// index fan-out lists are expected to stay short.
    pub fn insert(&self, key: String, id: Id) -> bool {
        let mut ids = self.entries.entry(key).or_insert_with(Vec::new);
        if ids.contains(&id) {
            false
        } else {
            ids.push(id);
            true
        }
    }

    /// Ids stored under a key, empty if the key is unknown
    pub fn ids(&self, key: &str) -> Vec<Id> {
        self.entries
            .get(key)
            .map(|ids| ids.value().clone())
            .unwrap_or_default()
    }

    /// Check if a key has an entry
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// All keys currently in the table, in no particular order
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<Id: Clone + Eq + Hash> Default for IndexTable<Id> {
    fn default() -> Self {
        Self::new()
    }
}
