//! Collaborator trait definitions
//!
//! This module defines the seams between the registry and its host:
//! - RecordLoader: produces a fresh generation of records for one type
//! - ReloadListener: observes completed reload cycles
//!
//! These traits enable:
//! - Swapping decoding formats without touching the stores
//! - Testing with in-memory loaders and counting listeners
//! - Keeping the host's startup wiring out of the core

use crate::error::Result;
use crate::record::Record;
use crate::types::RecordType;
use std::path::Path;

/// Source of records for one record type
///
/// Called once per reload. Returns the complete, ordered record set of the
/// new generation, or an error that leaves the previous generation in place.
/// Closures `Fn(&RecordType, &Path) -> Result<Vec<T>>` implement this trait.
pub trait RecordLoader<T: Record>: Send + Sync {
    /// Load every record of `record_type` from `location`
    fn load(&self, record_type: &RecordType, location: &Path) -> Result<Vec<T>>;
}

impl<T, F> RecordLoader<T> for F
where
    T: Record,
    F: Fn(&RecordType, &Path) -> Result<Vec<T>> + Send + Sync,
{
    fn load(&self, record_type: &RecordType, location: &Path) -> Result<Vec<T>> {
        self(record_type, location)
    }
}

/// Observer of completed reload cycles
///
/// `on_reload` runs after every store has been reloaded, on the thread that
/// triggered the cycle. A failure (error or panic) is logged and does not
/// stop the remaining listeners.
pub trait ReloadListener: Send + Sync {
    /// Name used in log lines and failure reports
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once per completed reload cycle
    fn on_reload(&self) -> Result<()>;
}
