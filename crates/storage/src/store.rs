//! IndexedStore: per-type record store with atomic generation swaps
//!
//! Each managed record type gets exactly one `IndexedStore`, holding:
//! - the current `Generation` behind an `ArcSwap` (lock-free reads)
//! - the loader that produces new generations
//! - dynamically registered index definitions
//!
//! # Design Notes
//!
//! - **Off-side rebuild**: `reload` builds a complete generation before
//!   publishing it, so readers see either the old or the new generation
//! - **Last completed reload wins**: concurrent reloads each publish their own
//!   generation; nothing is merged. Generation numbers are assigned at
//!   publish time, so they only grow and failed builds leave no gaps
//! - **Stale but available**: a failed reload keeps the previous generation
//! - **Live index appends**: `add_to_index` writes into the current
//!   generation only; the next reload starts from a fresh table
//! - **Registered indices are never lost**: a definition registered while a
//!   reload is building is applied to that reload's generation at publish

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info};

use basedb_core::key::index_key_for;
use basedb_core::{IndexDef, IndexValue, Record, RecordLoader, RecordType, Result};

use crate::generation::Generation;

/// Point-in-time counters of one store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Record type name
    pub type_name: &'static str,
    /// Current generation number (0 = never loaded)
    pub generation: u64,
    /// Records in the current generation
    pub records: usize,
    /// Distinct index keys in the current generation
    pub index_keys: usize,
    /// Successful reloads since creation
    pub reloads: u64,
    /// Failed reloads since creation
    pub failed_reloads: u64,
}

/// Runtime index definitions plus a counter bumped on every registration
struct DynamicIndexes<T> {
    defs: Vec<IndexDef<T>>,
    epoch: u64,
}

/// Indexed, reloadable record store for one record type
///
/// Thread-safe: every method takes `&self`. Lookups never block on reloads.
pub struct IndexedStore<T: Record> {
    record_type: RecordType,
    location: PathBuf,
    loader: Box<dyn RecordLoader<T>>,
    /// Published generation; swapped whole on reload
    current: ArcSwap<Generation<T>>,
    /// Indices registered at runtime, applied on every reload
    dynamic_indexes: RwLock<DynamicIndexes<T>>,
    /// Serializes generation publication and index registration
    publish: Mutex<()>,
    reloads: AtomicU64,
    failed_reloads: AtomicU64,
}

impl<T: Record> IndexedStore<T> {
    /// Create an empty store; nothing is loaded until `reload`
    pub fn new(loader: impl RecordLoader<T> + 'static, location: impl Into<PathBuf>) -> Self {
        Self {
            record_type: RecordType::of::<T>(),
            location: location.into(),
            loader: Box::new(loader),
            current: ArcSwap::from_pointee(Generation::empty()),
            dynamic_indexes: RwLock::new(DynamicIndexes {
                defs: Vec::new(),
                epoch: 0,
            }),
            publish: Mutex::new(()),
            reloads: AtomicU64::new(0),
            failed_reloads: AtomicU64::new(0),
        }
    }

    /// Descriptor of the stored type
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// Base location handed to the loader
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Current generation number (0 before the first successful reload)
    pub fn generation(&self) -> u64 {
        self.current.load().number()
    }

    /// Snapshot of the current generation
    ///
    /// The returned `Arc` stays valid and unchanged across later reloads.
    pub fn snapshot(&self) -> Arc<Generation<T>> {
        self.current.load_full()
    }

    /// Record by primary key
    pub fn get(&self, id: &T::Id) -> Option<Arc<T>> {
        self.current.load().get(id)
    }

    /// Records under an index key, in index order
    ///
    /// Ids that no longer resolve to a record are skipped. Unknown keys give
    /// an empty list.
    pub fn get_by_index(&self, index_name: &str, values: &[IndexValue]) -> Vec<Arc<T>> {
        let generation = self.current.load();
        let key = index_key_for(&self.record_type, index_name, values);
        generation
            .index()
            .ids(&key)
            .iter()
            .filter_map(|id| generation.get(id))
            .collect()
    }

    /// Ids under an index key, without resolving them
    pub fn get_index_id_list(&self, index_name: &str, values: &[IndexValue]) -> Vec<T::Id> {
        let key = index_key_for(&self.record_type, index_name, values);
        self.current.load().index().ids(&key)
    }

    /// All records of the current generation, in load order
    pub fn list_all(&self) -> Vec<Arc<T>> {
        self.current.load().records().to_vec()
    }

    /// Number of records in the current generation
    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    /// Check if the current generation is empty
    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }

    /// Append an id to an index entry of the current generation
    ///
    /// Idempotent: returns false if the id was already listed under the key.
    /// The entry lives until the next reload replaces the generation.
    pub fn add_to_index(&self, index_name: &str, id: T::Id, values: &[IndexValue]) -> bool {
        let key = index_key_for(&self.record_type, index_name, values);
        self.current.load().index().insert(key, id)
    }

    /// Append an id to a whole-type index entry (`Type&name#`)
    pub fn add_to_type_index(&self, index_name: &str, id: T::Id) -> bool {
        self.add_to_index(index_name, id, &[])
    }

    /// Register an index definition applied now and on every reload
    ///
    /// A definition with the same name as an earlier registered one replaces
    /// it for future reloads. Entries the old definition already produced in
    /// the current generation stay until the next reload.
    pub fn register_index(&self, def: IndexDef<T>) {
        let _publish = self.publish.lock();
        {
            let mut dynamic = self.dynamic_indexes.write();
            match dynamic.defs.iter_mut().find(|d| d.name() == def.name()) {
                Some(existing) => *existing = def.clone(),
                None => dynamic.defs.push(def.clone()),
            }
            dynamic.epoch += 1;
        }
        self.current.load().apply_index(&self.record_type, &def);
        debug!(
            target: "basedb::store",
            type_name = self.record_type.name(),
            index = def.name(),
            "Index registered"
        );
    }

    /// Replace the current generation with a freshly loaded one
    ///
    /// Returns the number of records in the new generation.
    ///
    /// # Errors
    ///
    /// Returns the loader's error, or `Error::DuplicateId` if the loaded set
    /// repeats a primary key. The previous generation stays published.
    pub fn reload(&self) -> Result<usize> {
        match self.build_next() {
            Ok((generation, epoch)) => {
                let (number, count) = self.publish(generation, epoch);
                self.reloads.fetch_add(1, Ordering::Relaxed);
                info!(
                    target: "basedb::store",
                    type_name = self.record_type.name(),
                    generation = number,
                    records = count,
                    "Store reloaded"
                );
                Ok(count)
            }
            Err(e) => {
                self.failed_reloads.fetch_add(1, Ordering::Relaxed);
                error!(
                    target: "basedb::store",
                    type_name = self.record_type.name(),
                    location = %self.location.display(),
                    error = %e,
                    "Reload failed, keeping previous generation"
                );
                Err(e)
            }
        }
    }

    /// Load and index a new generation without publishing it
    ///
    /// Also returns the dynamic index epoch the build used.
    fn build_next(&self) -> Result<(Generation<T>, u64)> {
        let (indexes, epoch) = {
            let dynamic = self.dynamic_indexes.read();
            let mut indexes = T::indexes();
            indexes.extend(dynamic.defs.iter().cloned());
            (indexes, dynamic.epoch)
        };

        let records = self.loader.load(&self.record_type, &self.location)?;
        let generation = Generation::build(&self.record_type, records, &indexes)?;
        Ok((generation, epoch))
    }

    /// Number and swap in a built generation
    ///
    /// Definitions registered after `built_epoch` are applied before the
    /// swap. Returns the generation number and record count.
    fn publish(&self, generation: Generation<T>, built_epoch: u64) -> (u64, usize) {
        let _publish = self.publish.lock();
        let number = self.current.load().number() + 1;
        let generation = generation.with_number(number);

        let dynamic = self.dynamic_indexes.read();
        if dynamic.epoch != built_epoch {
            for def in &dynamic.defs {
                generation.apply_index(&self.record_type, def);
            }
        }

        let count = generation.len();
        self.current.store(Arc::new(generation));
        (number, count)
    }

    /// Current counters
    pub fn stats(&self) -> StoreStats {
        let generation = self.current.load();
        StoreStats {
            type_name: self.record_type.name(),
            generation: generation.number(),
            records: generation.len(),
            index_keys: generation.index().len(),
            reloads: self.reloads.load(Ordering::Relaxed),
            failed_reloads: self.failed_reloads.load(Ordering::Relaxed),
        }
    }
}

impl<T: Record> std::fmt::Debug for IndexedStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexedStore")
            .field("type_name", &self.record_type.name())
            .field("location", &self.location)
            .field("generation", &self.generation())
            .field("records", &self.len())
            .finish()
    }
}
