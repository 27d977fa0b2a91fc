//! Record store subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     backing file (JSON object of collections)
//!     → persistence.rs (read & parse, or empty if absent)
//!     → Database (in-memory collections)
//!
//! Mutation (insert / update / delete):
//!     → database.rs (apply to in-memory collection)
//!     → persistence.rs (serialize ALL collections, write temp file, rename)
//! ```
//!
//! # Design Decisions
//! - Records are untyped JSON objects; callers own their schema
//! - Collections keep insertion order, lookups are linear scans
//! - Every mutation rewrites the whole file
//! - A corrupt file is fatal at open time; data is never silently dropped

pub mod database;
pub mod persistence;

pub use database::{Database, Filter};

/// A single stored record: field name → JSON value.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Errors raised by the record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize store: {0}")]
    Serialize(#[source] serde_json::Error),
}
