//! Mentora API Library
//!
//! This crate provides the HTTP API handlers, application state, the document
//! processing task handler, and application setup.

// Module declarations
mod api_doc;
mod handlers;

// Public modules
pub mod error;
pub mod setup;
pub mod state;
pub mod task_handlers;
pub mod telemetry;

// Re-exports
pub use error::ErrorResponse;
pub use mentora_worker::{TaskQueue, TaskQueueConfig};
