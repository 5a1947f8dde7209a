use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use mentora_core::models::{CreateLessonRequest, Lesson};

#[derive(Clone)]
pub struct LessonRepository {
    pool: PgPool,
}

impl LessonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, req), fields(title = %req.title))]
    pub async fn create(&self, learning_path_id: Uuid, req: CreateLessonRequest) -> Result<Lesson> {
        let lesson = sqlx::query_as::<Postgres, Lesson>(
            r#"
            INSERT INTO lessons (learning_path_id, title, content, position, difficulty)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, learning_path_id, title, content, position, difficulty,
                      created_at, updated_at
            "#,
        )
        .bind(learning_path_id)
        .bind(&req.title)
        .bind(&req.content)
        .bind(req.position)
        .bind(&req.difficulty)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert lesson")?;

        tracing::info!(
            lesson_id = %lesson.id,
            learning_path_id = %learning_path_id,
            "Lesson created"
        );

        Ok(lesson)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, lesson_id: Uuid) -> Result<Option<Lesson>> {
        let lesson = sqlx::query_as::<Postgres, Lesson>(
            r#"
            SELECT id, learning_path_id, title, content, position, difficulty,
                   created_at, updated_at
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch lesson")?;

        Ok(lesson)
    }

    /// Lessons of one learning path, in course order.
    #[tracing::instrument(skip(self))]
    pub async fn list_for_path(&self, learning_path_id: Uuid) -> Result<Vec<Lesson>> {
        let lessons = sqlx::query_as::<Postgres, Lesson>(
            r#"
            SELECT id, learning_path_id, title, content, position, difficulty,
                   created_at, updated_at
            FROM lessons
            WHERE learning_path_id = $1
            ORDER BY position ASC, created_at ASC
            "#,
        )
        .bind(learning_path_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list lessons")?;

        Ok(lessons)
    }
}
