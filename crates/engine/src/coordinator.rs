//! Reload coordinator
//!
//! Owns the registry, the type discovery collaborator and the listener hub,
//! and exposes the two host triggers:
//!
//! - `initialize()`: first-time population, latched so repeated host refresh
//!   signals do not reload unless `reload_on_refresh` is set
//! - `reload_all()`: explicit reload of every registered store, never latched
//!
//! Both end by notifying listeners in registration order.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use basedb_core::{ReloadListener, Result};
use parking_lot::Mutex;
use tracing::{error, info};

use crate::binding::TypeDiscovery;
use crate::config::RegistryConfig;
use crate::listener::ListenerHub;
use crate::registry::{reload_into, StoreRegistry};
use crate::report::ReloadReport;

/// Result of an `initialize` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// Already initialized and `reload_on_refresh` is off; nothing ran
    Skipped,
    /// Discovery, load and notification ran
    Completed(ReloadReport),
}

impl InitOutcome {
    /// Report of the completed pass, if one ran
    pub fn report(&self) -> Option<&ReloadReport> {
        match self {
            InitOutcome::Skipped => None,
            InitOutcome::Completed(report) => Some(report),
        }
    }

    /// Check if the call was latched out
    pub fn is_skipped(&self) -> bool {
        matches!(self, InitOutcome::Skipped)
    }
}

/// Coordinates discovery, loading and listener notification
///
/// # One Per Process
///
/// The initialization latch belongs to the coordinator, not to the process.
/// A host creates exactly one coordinator and routes every refresh signal to
/// it; a second coordinator has its own latch and its own registry, and its
/// first `initialize` runs a full load.
///
/// # Memory Ordering
///
/// `initialized` is a one-way latch flipped with `swap(AcqRel)`, so exactly
/// one caller observes `false`. `cycles` is observational and uses Relaxed.
pub struct ReloadCoordinator {
    config: RegistryConfig,
    registry: Arc<StoreRegistry>,
    discovery: Box<dyn TypeDiscovery>,
    listeners: ListenerHub,
    /// Listeners added since the last pass; moved into the hub when one starts
    pending: Mutex<Vec<Arc<dyn ReloadListener>>>,
    initialized: AtomicBool,
    cycles: AtomicU64,
}

impl ReloadCoordinator {
    /// Create a coordinator with a fresh registry at the configured location
    pub fn new(config: RegistryConfig, discovery: impl TypeDiscovery + 'static) -> Self {
        let registry = Arc::new(StoreRegistry::from_config(&config));
        Self::with_registry(config, registry, discovery)
    }

    /// Create a coordinator over an existing registry
    pub fn with_registry(
        config: RegistryConfig,
        registry: Arc<StoreRegistry>,
        discovery: impl TypeDiscovery + 'static,
    ) -> Self {
        Self {
            config,
            registry,
            discovery: Box::new(discovery),
            listeners: ListenerHub::new(),
            pending: Mutex::new(Vec::new()),
            initialized: AtomicBool::new(false),
            cycles: AtomicU64::new(0),
        }
    }

    /// Create a coordinator from a `basedb.toml` file
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read, parsed or
    /// validated.
    pub fn from_config_file(path: &Path, discovery: impl TypeDiscovery + 'static) -> Result<Self> {
        let config = RegistryConfig::from_file(path)?;
        Ok(Self::new(config, discovery))
    }

    /// Queue a listener; it joins the hub at the start of the next pass
    pub fn add_listener(&self, listener: Arc<dyn ReloadListener>) {
        self.pending.lock().push(listener);
    }

    /// First-time population of the registry
    ///
    /// Only the first call runs unless `reload_on_refresh` is set; later
    /// calls return `InitOutcome::Skipped`. Failures of individual types or
    /// listeners are contained and listed in the report.
    pub fn initialize(&self) -> InitOutcome {
        let already = self.initialized.swap(true, Ordering::AcqRel);
        if already && !self.config.reload_on_refresh {
            info!(target: "basedb::reload", "Already initialized, skipping");
            return InitOutcome::Skipped;
        }

        self.collect_pending();

        let bindings: Vec<_> = self
            .discovery
            .discover(&self.config.record_scope)
            .into_iter()
            .filter(|b| b.is_managed())
            .collect();
        if bindings.is_empty() {
            error!(
                target: "basedb::reload",
                scope = %self.config.record_scope,
                location = %self.config.location.display(),
                "No record types discovered"
            );
        }

        let mut report = ReloadReport::default();
        for binding in &bindings {
            let store = self.registry.ensure_binding(binding);
            reload_into(binding.record_type(), store.as_ref(), &mut report);
        }
        self.finish_cycle(&mut report);

        info!(
            target: "basedb::reload",
            types = bindings.len(),
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            listener_failures = report.listener_failures.len(),
            "Initialization complete"
        );
        InitOutcome::Completed(report)
    }

    /// Reload every registered store, then notify listeners
    ///
    /// Ignores the initialization latch.
    pub fn reload_all(&self) -> ReloadReport {
        self.collect_pending();
        let mut report = self.registry.reload_all();
        self.finish_cycle(&mut report);
        report
    }

    fn collect_pending(&self) {
        let pending = std::mem::take(&mut *self.pending.lock());
        for listener in pending {
            self.listeners.register(listener);
        }
    }

    fn finish_cycle(&self, report: &mut ReloadReport) {
        report.listener_failures = self.listeners.notify_all();
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of completed load-and-notify passes
    pub fn cycles(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    /// Check if `initialize` has been called
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// The registry served by this coordinator
    pub fn registry(&self) -> &Arc<StoreRegistry> {
        &self.registry
    }

    /// Listeners already collected into the hub
    pub fn listeners(&self) -> &ListenerHub {
        &self.listeners
    }

    /// Active configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl std::fmt::Debug for ReloadCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReloadCoordinator")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("listeners", &self.listeners)
            .field("initialized", &self.is_initialized())
            .field("cycles", &self.cycles())
            .finish()
    }
}
