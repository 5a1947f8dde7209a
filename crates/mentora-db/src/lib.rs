//! Mentora Database Library
//!
//! sqlx/Postgres repositories for all persisted entities. Each repository
//! wraps the shared pool and exposes typed async methods; SQL never leaks
//! into the handlers.

pub mod db;

pub use db::document::{DocumentRepository, NewDocument};
pub use db::learner::LearnerRepository;
pub use db::learning_path::LearningPathRepository;
pub use db::lesson::LessonRepository;
pub use db::quiz_response::QuizResponseRepository;
pub use db::task::{TaskRepository, TASK_NOTIFY_CHANNEL};
