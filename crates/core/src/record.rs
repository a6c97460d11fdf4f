//! Record trait and secondary index definitions
//!
//! A record type declares its primary key through [`Record::id`] and may
//! declare static secondary indices through [`Record::indexes`]. Every index
//! maps a record to an ordered list of [`IndexValue`]s; the store turns that
//! list into an index key with [`crate::key::build_index_key`].
//!
//! ```ignore
//! struct ItemTemplate { id: u32, level: u16, kind: String }
//!
//! impl Record for ItemTemplate {
//!     type Id = u32;
//!     const TYPE_NAME: &'static str = "ItemTemplate";
//!
//!     fn id(&self) -> u32 { self.id }
//!
//!     fn indexes() -> Vec<IndexDef<Self>> {
//!         vec![
//!             IndexDef::single("level", |t: &Self| t.level),
//!             IndexDef::new("kind_level", |t: &Self| {
//!                 Some(smallvec![t.kind.clone().into(), t.level.into()])
//!             }),
//!         ]
//!     }
//! }
//! ```

use crate::types::IndexValue;
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Ordered values of one index entry
pub type IndexValues = SmallVec<[IndexValue; 4]>;

/// A managed, immutable reference data record
pub trait Record: Send + Sync + 'static {
    /// Primary key type
    type Id: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    /// Logical type name, used as the prefix of every index key of this type
    const TYPE_NAME: &'static str;

    /// Dotted namespace used to scope type discovery
    const NAMESPACE: &'static str = "";

    /// Primary key of this record
    fn id(&self) -> Self::Id;

    /// Statically declared secondary indices, rebuilt on every reload
    fn indexes() -> Vec<IndexDef<Self>>
    where
        Self: Sized,
    {
        Vec::new()
    }
}

type Extractor<T> = Arc<dyn Fn(&T) -> Option<IndexValues> + Send + Sync>;

/// Named secondary index over a record type
///
/// The extractor returns the ordered index values for a record, or `None`
/// when the record does not participate in the index.
pub struct IndexDef<T> {
    name: String,
    extract: Extractor<T>,
}

impl<T> IndexDef<T> {
    /// Index with an arbitrary extractor
    pub fn new<F>(name: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&T) -> Option<IndexValues> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            extract: Arc::new(extract),
        }
    }

    /// Index over a single value that every record has
    pub fn single<F, V>(name: impl Into<String>, field: F) -> Self
    where
        F: Fn(&T) -> V + Send + Sync + 'static,
        V: Into<IndexValue>,
    {
        Self::new(name, move |record| Some(smallvec![field(record).into()]))
    }

    /// Index name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index values for a record, `None` if the record is not indexed
    pub fn values_for(&self, record: &T) -> Option<IndexValues> {
        (self.extract)(record)
    }
}

impl<T> Clone for IndexDef<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            extract: Arc::clone(&self.extract),
        }
    }
}

impl<T> fmt::Debug for IndexDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexDef").field("name", &self.name).finish()
    }
}
