//! Error types for basedb
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Lookups never produce errors: an unknown type, id or index key is reported
//! as `None` or an empty list. Errors only come out of reloads, listener
//! callbacks and configuration handling.

use std::io;
use thiserror::Error;

/// Result type alias for basedb operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the reference data registry
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error raised while a loader reads its source
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Loader could not decode the records of a type
    #[error("Failed to load {type_name}: {reason}")]
    Load {
        /// Record type being loaded
        type_name: String,
        /// Loader-provided reason
        reason: String,
    },

    /// No backing data exists for a type at the configured location
    #[error("No source for {type_name} at {location}")]
    SourceMissing {
        /// Record type being loaded
        type_name: String,
        /// Location that was searched
        location: String,
    },

    /// Two records of one load share a primary key
    #[error("Duplicate id {id} in {type_name}")]
    DuplicateId {
        /// Record type being loaded
        type_name: String,
        /// Debug rendering of the repeated id
        id: String,
    },

    /// A reload listener failed or panicked
    #[error("Listener {name} failed: {reason}")]
    Listener {
        /// Listener name
        name: String,
        /// Failure description
        reason: String,
    },

    /// A registered store holds a different record type than requested
    #[error("Store registered for {type_name} holds a different record type")]
    TypeMismatch {
        /// Record type that was requested
        type_name: String,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a load error for a record type
    pub fn load(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Load {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing-source error for a record type
    pub fn source_missing(type_name: impl Into<String>, location: impl Into<String>) -> Self {
        Error::SourceMissing {
            type_name: type_name.into(),
            location: location.into(),
        }
    }

    /// Create a listener failure
    pub fn listener(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Listener {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config(reason.into())
    }
}
