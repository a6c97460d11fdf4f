//! Core types and traits for basedb
//!
//! This crate defines the foundational types used throughout the system:
//! - Record: trait implemented by every managed reference data type
//! - RecordType: type descriptor (identity, name, namespace)
//! - IndexValue / IndexDef: secondary index values and definitions
//! - key: canonical index key construction
//! - Traits: loader and listener collaborators
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod key;
pub mod record;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use key::{build_index_key, index_key_for};
pub use record::{IndexDef, IndexValues, Record};
pub use traits::{RecordLoader, ReloadListener};
pub use types::{IndexValue, RecordType};

// Records build composite index values with `smallvec!`
pub use smallvec::smallvec;
