//! Background task handlers
//!
//! Each handler runs one claimed task to completion. Handlers signal
//! unrecoverable failures with `TaskError::unrecoverable` so the worker
//! fails the task immediately instead of burning retries.

pub mod document_processing;
mod locks;

pub use locks::ProcessingLocks;
