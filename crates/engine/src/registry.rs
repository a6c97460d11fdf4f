//! Process-wide registry of record stores
//!
//! One `IndexedStore` per record type, created on first request and kept for
//! the life of the registry. Typed lookups route through here so callers only
//! need the record type, never the store handle.
//!
//! # Concurrency
//!
//! The store map is a `DashMap` keyed by `TypeId`. Creation goes through the
//! entry API, so concurrent first requests for one type install exactly one
//! store. Reloads run one store at a time with no registry lock held; readers
//! of other types are never blocked by a slow loader.

use std::any::TypeId;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use basedb_core::{Error, IndexValue, Record, RecordLoader, RecordType, Result};
use basedb_storage::{downcast, ErasedStore, IndexedStore, StoreStats};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::{error, info};

use crate::binding::RecordBinding;
use crate::config::RegistryConfig;
use crate::listener::panic_message;
use crate::report::ReloadReport;

/// Registry of one store per record type
pub struct StoreRegistry {
    location: PathBuf,
    stores: DashMap<TypeId, Arc<dyn ErasedStore>>,
    /// Registration order, used for batch reloads and reporting
    types: RwLock<Vec<RecordType>>,
}

impl StoreRegistry {
    /// Create an empty registry whose stores load from `location`
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
            stores: DashMap::new(),
            types: RwLock::new(Vec::new()),
        }
    }

    /// Create an empty registry using the configured location
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(config.location.clone())
    }

    /// Base location handed to every store
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Return the store for `T`, creating it with `loader` if absent
    ///
    /// The store is created empty; call `reload` (or `reload_all`) to fill
    /// it. If a store for `T` already exists, `loader` is dropped.
    ///
    /// # Errors
    ///
    /// Returns `Error::TypeMismatch` if the registered store for `T`'s type
    /// id holds a different record type.
    pub fn ensure_store<T: Record>(
        &self,
        loader: impl RecordLoader<T> + 'static,
    ) -> Result<Arc<IndexedStore<T>>> {
        let record_type = RecordType::of::<T>();
        let erased = self.install(record_type, || {
            Arc::new(IndexedStore::new(loader, self.location.clone())) as Arc<dyn ErasedStore>
        });
        downcast::<T>(erased).ok_or_else(|| Error::TypeMismatch {
            type_name: T::TYPE_NAME.to_string(),
        })
    }

    /// Return the store for a discovered binding, creating it if absent
    pub fn ensure_binding(&self, binding: &RecordBinding) -> Arc<dyn ErasedStore> {
        self.install(binding.record_type(), || binding.create_store(&self.location))
    }

    fn install(
        &self,
        record_type: RecordType,
        create: impl FnOnce() -> Arc<dyn ErasedStore>,
    ) -> Arc<dyn ErasedStore> {
        if let Some(existing) = self.stores.get(&record_type.type_id()) {
            return Arc::clone(existing.value());
        }

        match self.stores.entry(record_type.type_id()) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                let store = create();
                // Pushed under the shard lock so order matches installation
                self.types.write().push(record_type);
                info!(
                    target: "basedb::registry",
                    type_name = record_type.name(),
                    location = %self.location.display(),
                    "Store created"
                );
                Arc::clone(entry.insert(store).value())
            }
        }
    }

    /// Typed store for `T`, if registered
    pub fn store<T: Record>(&self) -> Option<Arc<IndexedStore<T>>> {
        let erased = self
            .stores
            .get(&TypeId::of::<T>())
            .map(|s| Arc::clone(s.value()))?;
        downcast::<T>(erased)
    }

    /// Check if a store for `T` is registered
    pub fn contains<T: Record>(&self) -> bool {
        self.stores.contains_key(&TypeId::of::<T>())
    }

    /// Registered types in registration order
    pub fn registered_types(&self) -> Vec<RecordType> {
        self.types.read().clone()
    }

    /// Number of registered stores
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Check if no stores are registered
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Counters of every store in registration order
    pub fn stats(&self) -> Vec<StoreStats> {
        self.registered_types()
            .into_iter()
            .filter_map(|ty| self.erased(&ty))
            .map(|store| store.stats())
            .collect()
    }

    fn erased(&self, record_type: &RecordType) -> Option<Arc<dyn ErasedStore>> {
        self.stores
            .get(&record_type.type_id())
            .map(|s| Arc::clone(s.value()))
    }

    /// Reload every registered store in registration order
    ///
    /// A failing or panicking store keeps its previous generation and is
    /// listed in `ReloadReport::failed`; the remaining stores still reload.
    pub fn reload_all(&self) -> ReloadReport {
        let mut report = ReloadReport::default();
        for record_type in self.registered_types() {
            if let Some(store) = self.erased(&record_type) {
                reload_into(record_type, store.as_ref(), &mut report);
            }
        }

        info!(
            target: "basedb::registry",
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            records = report.total_records(),
            "Reload pass complete"
        );
        report
    }

    /// Record of type `T` with the given id
    pub fn get<T: Record>(&self, id: &T::Id) -> Option<Arc<T>> {
        self.store::<T>()?.get(id)
    }

    /// Records of type `T` under an index key, in insertion order
    pub fn list_by_index<T: Record>(
        &self,
        index_name: &str,
        values: &[IndexValue],
    ) -> Vec<Arc<T>> {
        self.store::<T>()
            .map(|s| s.get_by_index(index_name, values))
            .unwrap_or_default()
    }

    /// Ids of type `T` under an index key, in insertion order
    pub fn list_id_by_index<T: Record>(
        &self,
        index_name: &str,
        values: &[IndexValue],
    ) -> Vec<T::Id> {
        self.store::<T>()
            .map(|s| s.get_index_id_list(index_name, values))
            .unwrap_or_default()
    }

    /// First record of type `T` under an index key
    ///
    /// Uniqueness is not checked; with several matches the earliest inserted
    /// one is returned.
    pub fn get_by_unique<T: Record>(
        &self,
        index_name: &str,
        values: &[IndexValue],
    ) -> Option<Arc<T>> {
        self.list_by_index::<T>(index_name, values).into_iter().next()
    }

    /// All records of type `T` in load order
    pub fn list_all<T: Record>(&self) -> Vec<Arc<T>> {
        self.store::<T>()
            .map(|s| s.list_all())
            .unwrap_or_default()
    }

    /// Append `id` under an index key of `T`'s live generation
    ///
    /// Returns `false` if the type is unregistered or the id was present.
    pub fn add_to_index<T: Record>(
        &self,
        index_name: &str,
        id: T::Id,
        values: &[IndexValue],
    ) -> bool {
        self.store::<T>()
            .map(|s| s.add_to_index(index_name, id, values))
            .unwrap_or(false)
    }

    /// Append `id` under a whole-type index key of `T`
    pub fn add_to_type_index<T: Record>(&self, index_name: &str, id: T::Id) -> bool {
        self.store::<T>()
            .map(|s| s.add_to_type_index(index_name, id))
            .unwrap_or(false)
    }
}

/// Reload one store, containing errors and panics into `report`
pub(crate) fn reload_into(
    record_type: RecordType,
    store: &dyn ErasedStore,
    report: &mut ReloadReport,
) {
    match catch_unwind(AssertUnwindSafe(|| store.reload())) {
        Ok(Ok(records)) => report.record_loaded(record_type.name(), records),
        // The store already logged the failure
        Ok(Err(e)) => report.record_failed(record_type.name(), e.to_string()),
        Err(payload) => {
            let reason = format!("panicked: {}", panic_message(payload.as_ref()));
            error!(
                target: "basedb::registry",
                type_name = record_type.name(),
                error = %reason,
                "Store reload panicked"
            );
            report.record_failed(record_type.name(), reason);
        }
    }
}

impl std::fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreRegistry")
            .field("location", &self.location)
            .field(
                "types",
                &self
                    .registered_types()
                    .iter()
                    .map(|t| t.name())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
