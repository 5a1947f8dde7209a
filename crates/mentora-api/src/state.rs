//! Application state
//!
//! AppState aggregates the repositories, storage backend, AI client, and task
//! queue behind one `Arc` handed to every handler. It also implements
//! [`TaskHandlerContext`] so the worker pool can dispatch claimed tasks back
//! into the API's task handlers; the queue holds only a weak reference, so
//! dropping the state stops dispatch without leaking the worker.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use mentora_core::models::{Task, TaskType};
use mentora_core::Config;
use mentora_db::{
    DocumentRepository, LearnerRepository, LearningPathRepository, LessonRepository,
    QuizResponseRepository, TaskRepository,
};
use mentora_services::AiProcessingClient;
use mentora_storage::Storage;
use mentora_worker::{TaskHandlerContext, TaskQueue};

use crate::task_handlers::ProcessingLocks;

pub struct AppState {
    pub config: Config,
    pub db_pool: PgPool,
    pub document_repository: DocumentRepository,
    pub learner_repository: LearnerRepository,
    pub learning_path_repository: LearningPathRepository,
    pub lesson_repository: LessonRepository,
    pub quiz_response_repository: QuizResponseRepository,
    pub task_repository: TaskRepository,
    pub storage: Arc<dyn Storage>,
    pub ai_client: AiProcessingClient,
    pub task_queue: TaskQueue,
    pub processing_locks: ProcessingLocks,
    pub is_production: bool,
}

#[async_trait]
impl TaskHandlerContext for AppState {
    async fn dispatch_task(self: Arc<Self>, task: &Task) -> Result<serde_json::Value> {
        match task.task_type {
            TaskType::ProcessDocument => {
                crate::task_handlers::document_processing::process(self, task).await
            }
        }
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
