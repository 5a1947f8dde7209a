//! Learner CRUD handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use mentora_core::models::{CreateLearnerRequest, Learner, UpdateLearnerRequest};
use mentora_core::AppError;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/api/v1/learners",
    tag = "learners",
    request_body = CreateLearnerRequest,
    responses(
        (status = 201, description = "Learner created", body = Learner),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_learner(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateLearnerRequest>,
) -> Result<(StatusCode, Json<Learner>), HttpAppError> {
    if req.name.trim().is_empty() {
        return Err(HttpAppError(AppError::InvalidInput(
            "Name must not be empty".to_string(),
        )));
    }
    if !req.email.contains('@') {
        return Err(HttpAppError(AppError::InvalidInput(format!(
            "Invalid email: {}",
            req.email
        ))));
    }

    let learner = state
        .learner_repository
        .create(req)
        .await
        .map_err(HttpAppError::from)?;

    Ok((StatusCode::CREATED, Json(learner)))
}

#[utoipa::path(
    get,
    path = "/api/v1/learners/{id}",
    tag = "learners",
    params(("id" = Uuid, Path, description = "Learner id")),
    responses(
        (status = 200, description = "Learner found", body = Learner),
        (status = 404, description = "Learner not found", body = ErrorResponse)
    )
)]
pub async fn get_learner(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Learner>, HttpAppError> {
    let learner = state
        .learner_repository
        .get(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| HttpAppError(AppError::NotFound(format!("Learner not found: {}", id))))?;

    Ok(Json(learner))
}

#[utoipa::path(
    get,
    path = "/api/v1/learners",
    tag = "learners",
    params(PageQuery),
    responses(
        (status = 200, description = "Learners", body = [Learner])
    )
)]
pub async fn list_learners(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<Learner>>, HttpAppError> {
    let learners = state
        .learner_repository
        .list(page.limit.unwrap_or(50), page.offset.unwrap_or(0))
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(learners))
}

#[utoipa::path(
    patch,
    path = "/api/v1/learners/{id}",
    tag = "learners",
    params(("id" = Uuid, Path, description = "Learner id")),
    request_body = UpdateLearnerRequest,
    responses(
        (status = 200, description = "Learner updated", body = Learner),
        (status = 404, description = "Learner not found", body = ErrorResponse)
    )
)]
pub async fn update_learner(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateLearnerRequest>,
) -> Result<Json<Learner>, HttpAppError> {
    if let Some(email) = &req.email {
        if !email.contains('@') {
            return Err(HttpAppError(AppError::InvalidInput(format!(
                "Invalid email: {}",
                email
            ))));
        }
    }

    let learner = state
        .learner_repository
        .update(id, req)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| HttpAppError(AppError::NotFound(format!("Learner not found: {}", id))))?;

    Ok(Json(learner))
}
