use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use mentora_core::models::{CreateLearningPathRequest, LearningPath};

#[derive(Clone)]
pub struct LearningPathRepository {
    pool: PgPool,
}

impl LearningPathRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, req), fields(title = %req.title))]
    pub async fn create(&self, req: CreateLearningPathRequest) -> Result<LearningPath> {
        let path = sqlx::query_as::<Postgres, LearningPath>(
            r#"
            INSERT INTO learning_paths (title, description)
            VALUES ($1, $2)
            RETURNING id, title, description, created_at, updated_at
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert learning path")?;

        tracing::info!(learning_path_id = %path.id, "Learning path created");

        Ok(path)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path_id: Uuid) -> Result<Option<LearningPath>> {
        let path = sqlx::query_as::<Postgres, LearningPath>(
            "SELECT id, title, description, created_at, updated_at FROM learning_paths WHERE id = $1",
        )
        .bind(path_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch learning path")?;

        Ok(path)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<LearningPath>> {
        let paths = sqlx::query_as::<Postgres, LearningPath>(
            r#"
            SELECT id, title, description, created_at, updated_at
            FROM learning_paths
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.clamp(1, 1000))
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list learning paths")?;

        Ok(paths)
    }
}
