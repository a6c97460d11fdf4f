//! One complete, immutable record set of a store
//!
//! A generation is built off to the side by `IndexedStore::reload` and then
//! published with a single pointer swap. Records and the primary table never
//! change after `build`; only the index table accepts later `add_to_index`
//! appends.

use basedb_core::key::index_key_for;
use basedb_core::{Error, IndexDef, Record, RecordType, Result};
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::index::IndexTable;

/// Records, primary table and index table of one reload
#[derive(Debug)]
pub struct Generation<T: Record> {
    number: u64,
    records: Vec<Arc<T>>,
    by_id: FxHashMap<T::Id, Arc<T>>,
    index: IndexTable<T::Id>,
}

impl<T: Record> Generation<T> {
    /// Generation 0: nothing loaded yet
    pub fn empty() -> Self {
        Self {
            number: 0,
            records: Vec::new(),
            by_id: FxHashMap::default(),
            index: IndexTable::new(),
        }
    }

    /// Build a generation from freshly loaded records
    ///
    /// Records keep their load order. Every index definition is applied to
    /// every record. The result is unnumbered until the store publishes it
    /// with [`Generation::with_number`].
    ///
    /// # Errors
    ///
    /// Returns `Error::DuplicateId` if two records share a primary key.
    pub fn build(
        record_type: &RecordType,
        records: Vec<T>,
        indexes: &[IndexDef<T>],
    ) -> Result<Self> {
        let mut by_id = FxHashMap::with_capacity_and_hasher(records.len(), Default::default());
        let mut ordered = Vec::with_capacity(records.len());
        let index = IndexTable::new();

        for record in records {
            let id = record.id();
            if by_id.contains_key(&id) {
                return Err(Error::DuplicateId {
                    type_name: record_type.name().to_string(),
                    id: format!("{:?}", id),
                });
            }

            for def in indexes {
                if let Some(values) = def.values_for(&record) {
                    index.insert(index_key_for(record_type, def.name(), &values), id.clone());
                }
            }

            let record = Arc::new(record);
            by_id.insert(id, Arc::clone(&record));
            ordered.push(record);
        }

        Ok(Self {
            number: 0,
            records: ordered,
            by_id,
            index,
        })
    }

    /// Assign the sequence number this generation is published under
    pub fn with_number(mut self, number: u64) -> Self {
        self.number = number;
        self
    }

    /// Apply one more index definition to the records of this generation
    pub fn apply_index(&self, record_type: &RecordType, def: &IndexDef<T>) {
        for record in &self.records {
            if let Some(values) = def.values_for(record) {
                self.index
                    .insert(index_key_for(record_type, def.name(), &values), record.id());
            }
        }
    }

    /// Reload sequence number (0 = never loaded)
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Primary key lookup
    pub fn get(&self, id: &T::Id) -> Option<Arc<T>> {
        self.by_id.get(id).cloned()
    }

    /// All records in load order
    pub fn records(&self) -> &[Arc<T>] {
        &self.records
    }

    /// Live index table of this generation
    pub fn index(&self) -> &IndexTable<T::Id> {
        &self.index
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the generation holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
