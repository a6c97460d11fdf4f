//! Core types for basedb
//!
//! - RecordType: descriptor identifying one managed record type
//! - IndexValue: a single component of a secondary index key

use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Descriptor of a managed record type
///
/// Identity is the Rust `TypeId`; the name is what appears in index keys and
/// log lines, and the namespace is only consulted by type discovery.
#[derive(Debug, Clone, Copy)]
pub struct RecordType {
    type_id: TypeId,
    name: &'static str,
    namespace: &'static str,
}

impl RecordType {
    /// Descriptor for a record type
    pub fn of<T: Record>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::TYPE_NAME,
            namespace: T::NAMESPACE,
        }
    }

    /// Rust type identity
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Logical type name used as the index key prefix
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Dotted namespace the type was declared in (may be empty)
    pub fn namespace(&self) -> &'static str {
        self.namespace
    }

    /// `namespace.name`, or just the name when the namespace is empty
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.to_string()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for RecordType {}

impl Hash for RecordType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// One component of a secondary index key
///
/// The `Display` form is the exact text written into index keys, so two
/// values with the same rendering select the same index entry: `Int(3)`,
/// `UInt(3)` and `Str("3")` all render as `3`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IndexValue {
    /// Absent value, rendered as `null`
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    UInt(u64),
    /// Floating point, rendered with its shortest round-trip form (`1.0`, `2.5`)
    Float(f64),
    /// String
    Str(String),
}

impl fmt::Display for IndexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexValue::Null => f.write_str("null"),
            IndexValue::Bool(b) => write!(f, "{}", b),
            IndexValue::Int(i) => write!(f, "{}", i),
            IndexValue::UInt(u) => write!(f, "{}", u),
            IndexValue::Float(x) => write!(f, "{:?}", x),
            IndexValue::Str(s) => f.write_str(s),
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident, $target:ty, $($t:ty),*) => {
        $(
            impl From<$t> for IndexValue {
                fn from(v: $t) -> Self {
                    IndexValue::$variant(v as $target)
                }
            }
        )*
    };
}

impl_from_int!(Int, i64, i8, i16, i32, i64, isize);
impl_from_int!(UInt, u64, u8, u16, u32, u64, usize);

impl From<f32> for IndexValue {
    fn from(v: f32) -> Self {
        IndexValue::Float(v as f64)
    }
}

impl From<f64> for IndexValue {
    fn from(v: f64) -> Self {
        IndexValue::Float(v)
    }
}

impl From<bool> for IndexValue {
    fn from(v: bool) -> Self {
        IndexValue::Bool(v)
    }
}

impl From<char> for IndexValue {
    fn from(v: char) -> Self {
        IndexValue::Str(v.to_string())
    }
}

impl From<&str> for IndexValue {
    fn from(v: &str) -> Self {
        IndexValue::Str(v.to_string())
    }
}

impl From<String> for IndexValue {
    fn from(v: String) -> Self {
        IndexValue::Str(v)
    }
}

impl From<&String> for IndexValue {
    fn from(v: &String) -> Self {
        IndexValue::Str(v.clone())
    }
}

impl<T: Into<IndexValue>> From<Option<T>> for IndexValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(IndexValue::Null, Into::into)
    }
}
