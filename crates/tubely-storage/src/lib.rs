//! Tubely Storage Library
//!
//! Object storage for uploaded videos: the [`Storage`] trait, an S3 backend built on
//! `object_store`, and a local filesystem backend for development.
//!
//! # Key format
//!
//! Object keys are `<aspect-ratio>/<asset-name>`, where the asset name is 32 random
//! bytes in unpadded URL-safe base64 followed by an extension derived from the
//! content type. Key generation lives in [`keys`] so every backend agrees on it.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{compose_key, extension_for_content_type, generate_asset_name};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::{StorageBackend, StorageReference};
