//! Mentora Worker Library
//!
//! Postgres-backed background task queue: a worker pool that claims tasks
//! with `FOR UPDATE SKIP LOCKED`, wakes on LISTEN/NOTIFY, retries recoverable
//! failures with exponential backoff, and dead-letters exhausted tasks.

pub mod context;
pub mod queue;

pub use context::{empty_context_weak, TaskHandlerContext};
pub use queue::{TaskQueue, TaskQueueConfig, MAX_RETRY_BACKOFF_SECS};
