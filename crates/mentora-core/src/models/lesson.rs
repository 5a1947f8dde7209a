use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Lesson {
    pub id: Uuid,
    pub learning_path_id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub position: i32,
    pub difficulty: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLessonRequest {
    pub title: String,
    pub content: Option<String>,
    pub position: i32,
    pub difficulty: Option<String>,
}
