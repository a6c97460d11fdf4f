//! Record type bindings and type discovery
//!
//! A `RecordBinding` pairs a record type with the loader that feeds it, in a
//! form the registry can hold without knowing the concrete type. Discovery
//! hands the coordinator a list of candidate bindings; only those carrying
//! the managed marker become stores.
//!
//! ```ignore
//! let catalog = StaticCatalog::new()
//!     .with(RecordBinding::new::<ItemTemplate, _>(json_loader.clone()))
//!     .with(RecordBinding::new::<SkillTemplate, _>(json_loader));
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use basedb_core::{Record, RecordLoader, RecordType};
use basedb_storage::{ErasedStore, IndexedStore};

type StoreFactory = Arc<dyn Fn(&Path) -> Arc<dyn ErasedStore> + Send + Sync>;

/// A record type together with the loader for its stores
#[derive(Clone)]
pub struct RecordBinding {
    record_type: RecordType,
    managed: bool,
    factory: StoreFactory,
}

impl RecordBinding {
    /// Managed binding for `T` fed by `loader`
    pub fn new<T, L>(loader: L) -> Self
    where
        T: Record,
        L: RecordLoader<T> + 'static,
    {
        let loader = Arc::new(loader);
        let factory: StoreFactory = Arc::new(move |location: &Path| {
            let loader = Arc::clone(&loader);
            let store = IndexedStore::<T>::new(
                move |ty: &RecordType, location: &Path| {
                    RecordLoader::<T>::load(&*loader, ty, location)
                },
                location,
            );
            Arc::new(store) as Arc<dyn ErasedStore>
        });

        Self {
            record_type: RecordType::of::<T>(),
            managed: true,
            factory,
        }
    }

    /// Same binding without the managed marker; discovery skips it
    pub fn unmarked(mut self) -> Self {
        self.managed = false;
        self
    }

    /// Bound record type
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// Whether the binding carries the managed marker
    pub fn is_managed(&self) -> bool {
        self.managed
    }

    /// Build a fresh, unloaded store rooted at `location`
    pub fn create_store(&self, location: &Path) -> Arc<dyn ErasedStore> {
        (self.factory)(location)
    }
}

impl fmt::Debug for RecordBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordBinding")
            .field("record_type", &self.record_type.qualified_name())
            .field("managed", &self.managed)
            .finish()
    }
}

/// Source of candidate record types
pub trait TypeDiscovery: Send + Sync {
    /// Candidate bindings within `scope`
    fn discover(&self, scope: &str) -> Vec<RecordBinding>;
}

/// Discovery over an explicit, in-code list of bindings
///
/// Scopes are matched against each type's dotted namespace: `*` matches one
/// segment, `**` any number of segments, and an empty scope matches all.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    bindings: Vec<RecordBinding>,
}

impl StaticCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding (builder style)
    pub fn with(mut self, binding: RecordBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Add a binding
    pub fn push(&mut self, binding: RecordBinding) {
        self.bindings.push(binding);
    }

    /// Number of bindings, managed or not
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl TypeDiscovery for StaticCatalog {
    fn discover(&self, scope: &str) -> Vec<RecordBinding> {
        self.bindings
            .iter()
            .filter(|b| scope_matches(scope, b.record_type().namespace()))
            .cloned()
            .collect()
    }
}

/// Match a dotted namespace against a scope pattern
pub fn scope_matches(scope: &str, namespace: &str) -> bool {
    if scope.is_empty() {
        return true;
    }
    let pattern: Vec<&str> = scope.split('.').collect();
    let name: Vec<&str> = if namespace.is_empty() {
        Vec::new()
    } else {
        namespace.split('.').collect()
    };
    matches_segments(&pattern, &name)
}

fn matches_segments(pattern: &[&str], name: &[&str]) -> bool {
    match pattern.split_first() {
        None => name.is_empty(),
        Some((&"**", rest)) => (0..=name.len()).any(|skip| matches_segments(rest, &name[skip..])),
        Some((segment, rest)) => match name.split_first() {
            Some((head, tail)) => {
                (*segment == "*" || segment == head) && matches_segments(rest, tail)
            }
            None => false,
        },
    }
}
