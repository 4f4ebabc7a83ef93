//! Tubely Core Library
//!
//! Domain models, error types, configuration and the storage backend enum
//! shared by every Tubely crate.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{AspectRatio, CreateVideoParams, StorageReference, Video};
pub use storage_types::StorageBackend;
