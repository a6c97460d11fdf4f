//! Registry engine for basedb
//!
//! This crate wires the per-type stores into a process-wide service:
//! - StoreRegistry: one store per record type, typed lookups
//! - ReloadCoordinator: latched initialization and explicit reloads
//! - ListenerHub: ordered reload notifications
//! - TypeDiscovery / StaticCatalog: which record types get stores
//! - RegistryConfig: `basedb.toml` settings
//!
//! The engine is the only component that knows about:
//! - Cross-type batch reloads and their reports
//! - The initialization latch
//! - Listener ordering and failure containment

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binding;
pub mod config;
pub mod coordinator;
pub mod listener;
pub mod registry;
pub mod report;

pub use binding::{RecordBinding, StaticCatalog, TypeDiscovery};
pub use config::{RegistryConfig, CONFIG_FILE_NAME};
pub use coordinator::{InitOutcome, ReloadCoordinator};
pub use listener::ListenerHub;
pub use registry::StoreRegistry;
pub use report::{FailedType, ListenerFailure, LoadedType, ReloadReport};
