//! Service and repository wiring
//!
//! The task queue holds a weak reference to AppState (as the dispatch
//! context) while AppState owns the queue. `Arc::new_cyclic` ties the knot:
//! the queue is built inside the closure with the not-yet-upgradeable weak,
//! which becomes valid the moment the Arc exists.

use anyhow::Result;
use sqlx::PgPool;
use std::sync::{Arc, Weak};

use mentora_core::Config;
use mentora_db::{
    DocumentRepository, LearnerRepository, LearningPathRepository, LessonRepository,
    QuizResponseRepository, TaskRepository,
};
use mentora_services::{AiProcessingClient, AiServiceConfig};
use mentora_storage::Storage;
use mentora_worker::{TaskHandlerContext, TaskQueue, TaskQueueConfig};

use crate::state::AppState;
use crate::task_handlers::ProcessingLocks;

pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let ai_client = AiProcessingClient::new(AiServiceConfig {
        base_url: config.ai_service_url.clone(),
        timeout: config.ai_service_timeout(),
    })
    .map_err(|e| anyhow::anyhow!("Failed to build AI client: {}", e))?;

    let task_repository = TaskRepository::new(pool.clone());
    let queue_config = TaskQueueConfig {
        max_workers: config.task_queue_max_workers,
        poll_interval_ms: config.task_queue_poll_interval_ms,
        default_timeout_seconds: config.task_timeout_seconds,
        max_retries: config.task_queue_max_retries,
    };

    let is_production = config.is_production();
    let config = config.clone();

    let state = Arc::new_cyclic(|weak: &Weak<AppState>| {
        let context: Weak<dyn TaskHandlerContext> = weak.clone();
        let task_queue = TaskQueue::new(
            task_repository.clone(),
            queue_config,
            context,
            Some(pool.clone()),
        );

        AppState {
            document_repository: DocumentRepository::new(pool.clone()),
            learner_repository: LearnerRepository::new(pool.clone()),
            learning_path_repository: LearningPathRepository::new(pool.clone()),
            lesson_repository: LessonRepository::new(pool.clone()),
            quiz_response_repository: QuizResponseRepository::new(pool.clone()),
            task_repository,
            storage,
            ai_client,
            task_queue,
            processing_locks: ProcessingLocks::new(),
            is_production,
            db_pool: pool,
            config,
        }
    });

    tracing::info!(
        max_workers = state.config.task_queue_max_workers,
        max_retries = state.config.task_queue_max_retries,
        "Services initialized"
    );

    Ok(state)
}
