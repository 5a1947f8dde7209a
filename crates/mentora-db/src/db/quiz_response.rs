use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use mentora_core::models::{CreateQuizResponseRequest, QuizResponse};

#[derive(Clone)]
pub struct QuizResponseRepository {
    pool: PgPool,
}

impl QuizResponseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, req), fields(learner_id = %req.learner_id, lesson_id = %req.lesson_id))]
    pub async fn create(&self, req: CreateQuizResponseRequest) -> Result<QuizResponse> {
        let response = sqlx::query_as::<Postgres, QuizResponse>(
            r#"
            INSERT INTO quiz_responses (learner_id, lesson_id, answer, correct, score)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, learner_id, lesson_id, answer, correct, score, created_at
            "#,
        )
        .bind(req.learner_id)
        .bind(req.lesson_id)
        .bind(&req.answer)
        .bind(req.correct)
        .bind(req.score)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert quiz response")?;

        tracing::info!(quiz_response_id = %response.id, "Quiz response recorded");

        Ok(response)
    }

    /// List responses, optionally filtered by learner and/or lesson.
    #[tracing::instrument(skip(self))]
    pub async fn list(
        &self,
        learner_id: Option<Uuid>,
        lesson_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QuizResponse>> {
        let responses = sqlx::query_as::<Postgres, QuizResponse>(
            r#"
            SELECT id, learner_id, lesson_id, answer, correct, score, created_at
            FROM quiz_responses
            WHERE ($1::uuid IS NULL OR learner_id = $1)
              AND ($2::uuid IS NULL OR lesson_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(learner_id)
        .bind(lesson_id)
        .bind(limit.clamp(1, 1000))
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list quiz responses")?;

        Ok(responses)
    }
}
