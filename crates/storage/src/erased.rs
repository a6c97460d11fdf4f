//! Type-erased store handle
//!
//! The registry keeps stores of many record types in one map. `ErasedStore`
//! is the object-safe surface it needs for batch work (reload, stats);
//! typed lookups go through [`downcast`].

use std::any::Any;
use std::sync::Arc;

use basedb_core::{Record, RecordType, Result};

use crate::store::{IndexedStore, StoreStats};

/// Object-safe view of an `IndexedStore<T>` for any `T`
pub trait ErasedStore: Send + Sync {
    /// Descriptor of the stored type
    fn record_type(&self) -> RecordType;

    /// Reload the store, returning the new record count
    fn reload(&self) -> Result<usize>;

    /// Current counters
    fn stats(&self) -> StoreStats;

    /// Upcast for downcasting to the concrete store
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Record> ErasedStore for IndexedStore<T> {
    fn record_type(&self) -> RecordType {
        IndexedStore::record_type(self)
    }

    fn reload(&self) -> Result<usize> {
        IndexedStore::reload(self)
    }

    fn stats(&self) -> StoreStats {
        IndexedStore::stats(self)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Recover the typed store behind an erased handle
///
/// Returns `None` if the handle holds a store of a different record type.
pub fn downcast<T: Record>(store: Arc<dyn ErasedStore>) -> Option<Arc<IndexedStore<T>>> {
    store.into_any().downcast::<IndexedStore<T>>().ok()
}
