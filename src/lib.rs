//! basedb - In-memory reference data registry
//!
//! basedb keeps read-mostly reference tables (item templates, skill tables,
//! drop lists) in memory, one store per record type, with secondary indexes
//! over composite keys and atomic whole-type reloads.
//!
//! # Quick Start
//!
//! ```ignore
//! use basedb::{IndexDef, Record, RecordBinding, RegistryConfig, ReloadCoordinator, StaticCatalog};
//!
//! struct Item { id: u32, lvl: i64 }
//!
//! impl Record for Item {
//!     type Id = u32;
//!     const TYPE_NAME: &'static str = "Item";
//!     fn id(&self) -> u32 { self.id }
//!     fn indexes() -> Vec<IndexDef<Self>> {
//!         vec![IndexDef::single("lvl", |i: &Item| i.lvl)]
//!     }
//! }
//!
//! let catalog = StaticCatalog::new().with(RecordBinding::new::<Item, _>(load_items));
//! let coordinator = ReloadCoordinator::new(RegistryConfig::default(), catalog);
//! coordinator.initialize();
//!
//! let level_three = coordinator.registry().list_by_index::<Item>("lvl", &[3.into()]);
//! ```
//!
//! # Architecture
//!
//! - `basedb-core`: record trait, index values, key format, errors
//! - `basedb-storage`: per-type store with generation swap
//! - `basedb-engine`: registry, discovery, coordinator, listeners, config

pub use basedb_core::*;
pub use basedb_engine::*;
pub use basedb_storage::*;
