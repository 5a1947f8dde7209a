//! Learning path handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use mentora_core::models::{CreateLearningPathRequest, LearningPath};
use mentora_core::AppError;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::learners::PageQuery;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/learning-paths",
    tag = "learning-paths",
    request_body = CreateLearningPathRequest,
    responses(
        (status = 201, description = "Learning path created", body = LearningPath),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_learning_path(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateLearningPathRequest>,
) -> Result<(StatusCode, Json<LearningPath>), HttpAppError> {
    if req.title.trim().is_empty() {
        return Err(HttpAppError(AppError::InvalidInput(
            "Title must not be empty".to_string(),
        )));
    }

    let path = state
        .learning_path_repository
        .create(req)
        .await
        .map_err(HttpAppError::from)?;

    Ok((StatusCode::CREATED, Json(path)))
}

#[utoipa::path(
    get,
    path = "/api/v1/learning-paths/{id}",
    tag = "learning-paths",
    params(("id" = Uuid, Path, description = "Learning path id")),
    responses(
        (status = 200, description = "Learning path found", body = LearningPath),
        (status = 404, description = "Learning path not found", body = ErrorResponse)
    )
)]
pub async fn get_learning_path(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<LearningPath>, HttpAppError> {
    let path = state
        .learning_path_repository
        .get(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| {
            HttpAppError(AppError::NotFound(format!("Learning path not found: {}", id)))
        })?;

    Ok(Json(path))
}

#[utoipa::path(
    get,
    path = "/api/v1/learning-paths",
    tag = "learning-paths",
    params(PageQuery),
    responses(
        (status = 200, description = "Learning paths", body = [LearningPath])
    )
)]
pub async fn list_learning_paths(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<LearningPath>>, HttpAppError> {
    let paths = state
        .learning_path_repository
        .list(page.limit.unwrap_or(50), page.offset.unwrap_or(0))
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(paths))
}
