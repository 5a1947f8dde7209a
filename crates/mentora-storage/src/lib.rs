//! Mentora Storage Library
//!
//! Storage abstraction and implementations for document files. Includes the
//! `Storage` trait with S3 (object_store) and local filesystem backends.
//!
//! # Storage key format
//!
//! Documents are keyed `documents/{document_ref}/{filename}`. Keys must not
//! contain `..` or a leading `/`. Key generation is centralized in the `keys`
//! module so all backends stay consistent.

pub mod factory;
pub(crate) mod keys;
pub mod local;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::document_key;
pub use local::LocalStorage;
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
