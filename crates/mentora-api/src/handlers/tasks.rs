//! Task inspection handlers
//!
//! Read-only views into the job system, including the dead-letter list for
//! manual review of exhausted tasks.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use mentora_core::models::{TaskListQuery, TaskResponse};
use mentora_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/tasks/{id}",
    tag = "tasks",
    params(("id" = Uuid, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, HttpAppError> {
    let task = state
        .task_repository
        .get_task(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| HttpAppError(AppError::NotFound(format!("Task not found: {}", id))))?;

    Ok(Json(TaskResponse::from(task)))
}

#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    tag = "tasks",
    params(TaskListQuery),
    responses(
        (status = 200, description = "Tasks", body = [TaskResponse])
    )
)]
pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TaskListQuery>,
) -> Result<Json<Vec<TaskResponse>>, HttpAppError> {
    let tasks = state
        .task_repository
        .list_tasks(query)
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DeadLetterQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/v1/tasks/dead-letter",
    tag = "tasks",
    params(DeadLetterQuery),
    responses(
        (status = 200, description = "Dead-lettered tasks", body = [TaskResponse])
    )
)]
pub async fn list_dead_lettered(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DeadLetterQuery>,
) -> Result<Json<Vec<TaskResponse>>, HttpAppError> {
    let tasks = state
        .task_repository
        .list_dead_lettered(query.limit.unwrap_or(50), query.offset.unwrap_or(0))
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}
