//! Reload listener hub
//!
//! Listeners are notified after every completed reload pass, in registration
//! order. Every registered instance is notified; only re-registering the same
//! instance is ignored. A listener that errors or panics is logged and
//! reported; the rest still run.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use basedb_core::ReloadListener;
use parking_lot::RwLock;
use tracing::{debug, error};

use crate::report::ListenerFailure;

/// Ordered set of reload listeners, unique by identity
#[derive(Default)]
pub struct ListenerHub {
    listeners: RwLock<Vec<Arc<dyn ReloadListener>>>,
}

impl ListenerHub {
    /// Create an empty hub
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    ///
    /// Returns `false` if this same listener instance is already registered.
    /// Distinct instances are all kept, even when they share a name.
    pub fn register(&self, listener: Arc<dyn ReloadListener>) -> bool {
        let mut listeners = self.listeners.write();
        if listeners.iter().any(|l| same_instance(l, &listener)) {
            debug!(
                target: "basedb::reload",
                name = listener.name(),
                "Listener already registered"
            );
            return false;
        }
        listeners.push(listener);
        true
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Check if no listeners are registered
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Listener names in notification order
    pub fn names(&self) -> Vec<String> {
        self.listeners
            .read()
            .iter()
            .map(|l| l.name().to_string())
            .collect()
    }

    /// Invoke every listener once, in order
    ///
    /// Callbacks run on a snapshot of the list, so a listener may register
    /// further listeners without deadlocking; those are notified next time.
    pub fn notify_all(&self) -> Vec<ListenerFailure> {
        let snapshot: Vec<Arc<dyn ReloadListener>> = self.listeners.read().clone();
        let mut failures = Vec::new();

        for listener in snapshot {
            let reason = match catch_unwind(AssertUnwindSafe(|| listener.on_reload())) {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e.to_string(),
                Err(payload) => format!("panicked: {}", panic_message(payload.as_ref())),
            };
            error!(
                target: "basedb::reload",
                listener = listener.name(),
                error = %reason,
                "Reload listener failed"
            );
            failures.push(ListenerFailure {
                name: listener.name().to_string(),
                reason,
            });
        }

        failures
    }
}

impl std::fmt::Debug for ListenerHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHub")
            .field("listeners", &self.names())
            .finish()
    }
}

fn same_instance(a: &Arc<dyn ReloadListener>, b: &Arc<dyn ReloadListener>) -> bool {
    // Data pointers only
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("(non-string panic)")
}
