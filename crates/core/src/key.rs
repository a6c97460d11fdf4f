//! Index key construction
//!
//! Every secondary index entry is addressed by a flat string key:
//!
//! ```text
//! typeName&indexName#value0^value1^...^valueN
//! ```
//!
//! ## Contract
//!
//! The key shape is shared with code outside this crate and is FROZEN:
//! - The type segment is written as `typeName&`, and omitted when absent
//! - The index name is written before `#`, and omitted when absent
//! - `#` is written after a present index name, and before values even when
//!   the name is absent
//! - Values are rendered with `Display` and joined with `^`, in caller order
//!
//! Values are not escaped. A value containing `&`, `#` or `^` can make two
//! different lookups share a key; use [`contains_delimiter`] to reject such
//! values at the edge if that matters for a table.

use crate::types::{IndexValue, RecordType};
use std::fmt::Write;

/// Terminates the type segment
pub const TYPE_DELIMITER: char = '&';
/// Terminates the index name segment
pub const NAME_DELIMITER: char = '#';
/// Separates index values
pub const VALUE_DELIMITER: char = '^';

/// Build an index key from its optional parts
///
/// # Examples
///
/// ```
/// use basedb_core::key::build_index_key;
/// use basedb_core::IndexValue;
///
/// let values = [IndexValue::from(1), IndexValue::from(2)];
/// assert_eq!(build_index_key(Some("Item"), Some("lvl"), &values), "Item&lvl#1^2");
/// assert_eq!(build_index_key(Some("Item"), None, &values), "Item&#1^2");
/// assert_eq!(build_index_key(Some("Item"), Some("lvl"), &[]), "Item&lvl#");
/// assert_eq!(build_index_key(None, Some("lvl"), &values), "lvl#1^2");
/// ```
pub fn build_index_key(
    type_name: Option<&str>,
    index_name: Option<&str>,
    values: &[IndexValue],
) -> String {
    let mut key = String::with_capacity(32);

    if let Some(type_name) = type_name {
        key.push_str(type_name);
        key.push(TYPE_DELIMITER);
    }

    match index_name {
        Some(name) => {
            key.push_str(name);
            key.push(NAME_DELIMITER);
        }
        None if !values.is_empty() => key.push(NAME_DELIMITER),
        None => {}
    }

    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            key.push(VALUE_DELIMITER);
        }
        // Writing into a String cannot fail
        let _ = write!(key, "{}", value);
    }

    key
}

/// Build the index key of a record type
#[inline]
pub fn index_key_for(record_type: &RecordType, index_name: &str, values: &[IndexValue]) -> String {
    build_index_key(Some(record_type.name()), Some(index_name), values)
}

/// Whether a value's rendering contains one of the key delimiters
pub fn contains_delimiter(value: &IndexValue) -> bool {
    match value {
        IndexValue::Str(s) => s
            .chars()
            .any(|c| c == TYPE_DELIMITER || c == NAME_DELIMITER || c == VALUE_DELIMITER),
        _ => false,
    }
}
