//! Release Catalog Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog_service;
pub mod catalog_store;
pub mod config;
pub mod pagination;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog_store::{CatalogStore, SqliteCatalogStore};
pub use server::{run_server, RequestsLoggingLevel};
