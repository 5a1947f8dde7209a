use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use mentora_core::models::{CreateLearnerRequest, Learner, UpdateLearnerRequest};

#[derive(Clone)]
pub struct LearnerRepository {
    pool: PgPool,
}

impl LearnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, req), fields(email = %req.email))]
    pub async fn create(&self, req: CreateLearnerRequest) -> Result<Learner> {
        let learner = sqlx::query_as::<Postgres, Learner>(
            r#"
            INSERT INTO learners (name, email, cohort)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, cohort, created_at, updated_at
            "#,
        )
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.cohort)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert learner")?;

        tracing::info!(learner_id = %learner.id, "Learner created");

        Ok(learner)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, learner_id: Uuid) -> Result<Option<Learner>> {
        let learner = sqlx::query_as::<Postgres, Learner>(
            "SELECT id, name, email, cohort, created_at, updated_at FROM learners WHERE id = $1",
        )
        .bind(learner_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch learner")?;

        Ok(learner)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Learner>> {
        let learners = sqlx::query_as::<Postgres, Learner>(
            r#"
            SELECT id, name, email, cohort, created_at, updated_at
            FROM learners
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit.clamp(1, 1000))
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list learners")?;

        Ok(learners)
    }

    /// Partial update; unspecified fields keep their current value.
    #[tracing::instrument(skip(self, req))]
    pub async fn update(
        &self,
        learner_id: Uuid,
        req: UpdateLearnerRequest,
    ) -> Result<Option<Learner>> {
        let learner = sqlx::query_as::<Postgres, Learner>(
            r#"
            UPDATE learners
            SET name = COALESCE($2, name),
                email = COALESCE($3, email),
                cohort = COALESCE($4, cohort),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, cohort, created_at, updated_at
            "#,
        )
        .bind(learner_id)
        .bind(&req.name)
        .bind(&req.email)
        .bind(&req.cohort)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update learner")?;

        Ok(learner)
    }
}
