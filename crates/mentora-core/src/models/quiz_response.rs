use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct QuizResponse {
    pub id: Uuid,
    pub learner_id: Uuid,
    pub lesson_id: Uuid,
    pub answer: String,
    pub correct: bool,
    pub score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateQuizResponseRequest {
    pub learner_id: Uuid,
    pub lesson_id: Uuid,
    pub answer: String,
    pub correct: bool,
    pub score: Option<f64>,
}
