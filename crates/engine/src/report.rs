//! Outcome of a batch reload

/// A type whose reload succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedType {
    /// Record type name
    pub type_name: &'static str,
    /// Records in the newly published generation
    pub records: usize,
}

/// A type whose reload failed; its previous data stays visible
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedType {
    /// Record type name
    pub type_name: &'static str,
    /// Rendered error or panic message
    pub error: String,
}

/// A listener whose callback failed or panicked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerFailure {
    /// Listener name
    pub name: String,
    /// Rendered error or panic message
    pub reason: String,
}

/// Per-type results of one reload pass plus listener failures
///
/// Entries appear in the order the types were processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// Types that published a new generation
    pub loaded: Vec<LoadedType>,
    /// Types that kept their previous generation
    pub failed: Vec<FailedType>,
    /// Listener callbacks that failed
    pub listener_failures: Vec<ListenerFailure>,
}

impl ReloadReport {
    /// True when every type loaded and every listener succeeded
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.listener_failures.is_empty()
    }

    /// Sum of records over all loaded types
    pub fn total_records(&self) -> usize {
        self.loaded.iter().map(|t| t.records).sum()
    }

    /// Whether `type_name` is among the failed types
    pub fn has_failed(&self, type_name: &str) -> bool {
        self.failed.iter().any(|t| t.type_name == type_name)
    }

    pub(crate) fn record_loaded(&mut self, type_name: &'static str, records: usize) {
        self.loaded.push(LoadedType { type_name, records });
    }

    pub(crate) fn record_failed(&mut self, type_name: &'static str, error: impl Into<String>) {
        self.failed.push(FailedType {
            type_name,
            error: error.into(),
        });
    }
}
