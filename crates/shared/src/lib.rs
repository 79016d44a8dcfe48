//! Shared library for the manga release tracker.
//!
//! This crate provides common functionality used by the bot and CLI binaries:
//! - Configuration management
//! - Key/value catalog storage
//! - Title parsing and series aggregation
//! - Logging infrastructure
//! - Shared error types

pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod store;
pub mod volume;

// Re-export commonly used types
pub use catalog::Catalog;
pub use config::Config;
pub use error::{CatalogError, StoreError};
pub use logging::LogConfig;
pub use models::MangaRecord;
pub use store::Store;
pub use volume::VolumeInfo;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
