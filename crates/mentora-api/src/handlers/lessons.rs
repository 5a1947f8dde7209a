//! Lesson handlers, nested under learning paths

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use mentora_core::models::{CreateLessonRequest, Lesson};
use mentora_core::AppError;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

/// 404 unless the learning path exists; lessons cannot dangle.
async fn ensure_path_exists(state: &Arc<AppState>, path_id: Uuid) -> Result<(), HttpAppError> {
    state
        .learning_path_repository
        .get(path_id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| {
            HttpAppError(AppError::NotFound(format!(
                "Learning path not found: {}",
                path_id
            )))
        })?;
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/v1/learning-paths/{id}/lessons",
    tag = "lessons",
    params(("id" = Uuid, Path, description = "Learning path id")),
    request_body = CreateLessonRequest,
    responses(
        (status = 201, description = "Lesson created", body = Lesson),
        (status = 404, description = "Learning path not found", body = ErrorResponse)
    )
)]
pub async fn create_lesson(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<CreateLessonRequest>,
) -> Result<(StatusCode, Json<Lesson>), HttpAppError> {
    if req.title.trim().is_empty() {
        return Err(HttpAppError(AppError::InvalidInput(
            "Title must not be empty".to_string(),
        )));
    }

    ensure_path_exists(&state, id).await?;

    let lesson = state
        .lesson_repository
        .create(id, req)
        .await
        .map_err(HttpAppError::from)?;

    Ok((StatusCode::CREATED, Json(lesson)))
}

#[utoipa::path(
    get,
    path = "/api/v1/learning-paths/{id}/lessons",
    tag = "lessons",
    params(("id" = Uuid, Path, description = "Learning path id")),
    responses(
        (status = 200, description = "Lessons ordered by position", body = [Lesson]),
        (status = 404, description = "Learning path not found", body = ErrorResponse)
    )
)]
pub async fn list_lessons(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Lesson>>, HttpAppError> {
    ensure_path_exists(&state, id).await?;

    let lessons = state
        .lesson_repository
        .list_for_path(id)
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(lessons))
}
