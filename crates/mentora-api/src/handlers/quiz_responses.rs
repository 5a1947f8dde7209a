//! Quiz response handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use mentora_core::models::{CreateQuizResponseRequest, QuizResponse};
use mentora_core::AppError;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct QuizResponseListQuery {
    pub learner_id: Option<Uuid>,
    pub lesson_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[utoipa::path(
    post,
    path = "/api/v1/quiz-responses",
    tag = "quiz-responses",
    request_body = CreateQuizResponseRequest,
    responses(
        (status = 201, description = "Quiz response recorded", body = QuizResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
pub async fn create_quiz_response(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateQuizResponseRequest>,
) -> Result<(StatusCode, Json<QuizResponse>), HttpAppError> {
    if let Some(score) = req.score {
        if !(0.0..=1.0).contains(&score) {
            return Err(HttpAppError(AppError::InvalidInput(format!(
                "Score must be between 0 and 1, got {}",
                score
            ))));
        }
    }

    let response = state
        .quiz_response_repository
        .create(req)
        .await
        .map_err(HttpAppError::from)?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/v1/quiz-responses",
    tag = "quiz-responses",
    params(QuizResponseListQuery),
    responses(
        (status = 200, description = "Quiz responses", body = [QuizResponse])
    )
)]
pub async fn list_quiz_responses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuizResponseListQuery>,
) -> Result<Json<Vec<QuizResponse>>, HttpAppError> {
    let responses = state
        .quiz_response_repository
        .list(
            query.learner_id,
            query.lesson_id,
            query.limit.unwrap_or(50),
            query.offset.unwrap_or(0),
        )
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(responses))
}
