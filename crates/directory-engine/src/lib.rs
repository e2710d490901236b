//! Engine for a small winery business directory.
//!
//! Admins bulk-load the collection from CSV uploads with all-or-nothing
//! commit semantics; the directory pages read it back through a thin query
//! façade (featured listings, record lookup, keyword search). Everything is
//! embedded: the collection lives as JSON under a storage directory.

pub mod auth;
pub mod error;
pub mod ingest;
pub mod query;
pub mod record;
pub mod sample;
pub mod store;

pub use error::{DirectoryError, DirectoryResult};
