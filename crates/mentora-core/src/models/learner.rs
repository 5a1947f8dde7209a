use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Learner {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cohort: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLearnerRequest {
    pub name: String,
    pub email: String,
    pub cohort: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLearnerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub cohort: Option<String>,
}
