//! Mentora Core Library
//!
//! This crate provides core domain models, error types, configuration, and the
//! document-processing error taxonomy shared across all Mentora components.

pub mod config;
pub mod error;
pub mod models;
pub mod processing;
pub mod task_error;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use processing::DocumentProcessingError;
pub use task_error::{TaskError, TaskResultExt};
