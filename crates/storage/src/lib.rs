//! Storage layer for basedb
//!
//! This crate implements the per-type record store with:
//! - IndexedStore: primary table + secondary index table for one record type
//! - Generation: one complete, immutable result of a reload
//! - IndexTable: index key → ordered, duplicate-free ids
//! - ErasedStore: object-safe handle used by the registry
//!
//! # Concurrency
//!
//! - Lock-free reads via `ArcSwap` over the current generation
//! - Reload builds off to the side and publishes with one pointer swap
//! - Index appends go through DashMap shards of the live generation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod erased;
pub mod generation;
pub mod index;
pub mod store;

pub use erased::{downcast, ErasedStore};
pub use generation::Generation;
pub use index::IndexTable;
pub use store::{IndexedStore, StoreStats};
