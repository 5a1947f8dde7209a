use anyhow::{Context, Result};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use mentora_core::models::{Document, DocumentCategory, DocumentListQuery};

const DOCUMENT_COLUMNS: &str = r#"
    id,
    filename,
    s3_bucket,
    s3_key,
    etag,
    file_size,
    content_type,
    category,
    learner_id,
    uploaded_by,
    processed,
    processed_at,
    processing_error,
    metadata,
    created_at,
    updated_at
"#;

/// Parameters for inserting a document row after a successful storage write.
#[derive(Debug)]
pub struct NewDocument {
    pub filename: String,
    pub s3_bucket: String,
    pub s3_key: String,
    pub etag: Option<String>,
    pub file_size: Option<i64>,
    pub content_type: String,
    pub category: DocumentCategory,
    pub learner_id: Option<Uuid>,
    pub uploaded_by: Option<Uuid>,
    pub metadata: serde_json::Value,
}

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new document row.
    #[tracing::instrument(skip(self, doc), fields(s3_key = %doc.s3_key))]
    pub async fn create(&self, doc: NewDocument) -> Result<Document> {
        let document: Document = sqlx::query_as::<Postgres, Document>(&format!(
            r#"
            INSERT INTO documents (
                filename, s3_bucket, s3_key, etag, file_size, content_type,
                category, learner_id, uploaded_by, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(&doc.filename)
        .bind(&doc.s3_bucket)
        .bind(&doc.s3_key)
        .bind(&doc.etag)
        .bind(doc.file_size)
        .bind(&doc.content_type)
        .bind(doc.category.to_string())
        .bind(doc.learner_id)
        .bind(doc.uploaded_by)
        .bind(&doc.metadata)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert document")?;

        tracing::info!(
            document_id = %document.id,
            filename = %document.filename,
            category = %document.category,
            "Document created"
        );

        Ok(document)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, document_id: Uuid) -> Result<Option<Document>> {
        let document: Option<Document> = sqlx::query_as::<Postgres, Document>(&format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM documents
            WHERE id = $1
            "#
        ))
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch document")?;

        Ok(document)
    }

    /// List documents with optional filters and limit/offset pagination.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: DocumentListQuery) -> Result<Vec<Document>> {
        let limit = query.limit.unwrap_or(50).clamp(1, 1000);
        let offset = query.offset.unwrap_or(0).max(0);

        let mut sql = format!(
            r#"
            SELECT {DOCUMENT_COLUMNS}
            FROM documents
            WHERE TRUE
            "#
        );

        let mut bind_count = 1;
        if query.category.is_some() {
            sql.push_str(&format!(" AND category = ${bind_count}"));
            bind_count += 1;
        }
        if query.learner_id.is_some() {
            sql.push_str(&format!(" AND learner_id = ${bind_count}"));
            bind_count += 1;
        }
        if query.processed.is_some() {
            sql.push_str(&format!(" AND processed = ${bind_count}"));
            bind_count += 1;
        }
        sql.push_str(&format!(
            " ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
            bind_count,
            bind_count + 1
        ));

        let mut query_builder = sqlx::query_as::<_, Document>(&sql);
        if let Some(category) = query.category {
            query_builder = query_builder.bind(category.to_string());
        }
        if let Some(learner_id) = query.learner_id {
            query_builder = query_builder.bind(learner_id);
        }
        if let Some(processed) = query.processed {
            query_builder = query_builder.bind(processed);
        }

        let documents = query_builder
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list documents")?;

        Ok(documents)
    }

    /// Delete a document row. Returns whether a row existed.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, document_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(document_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete document")?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a successful processing attempt: sets the flag, stamps the time
    /// and clears any error from an earlier failed attempt. Idempotent.
    /// Returns `None` when the row no longer exists.
    #[tracing::instrument(skip(self))]
    pub async fn mark_processed(&self, document_id: Uuid) -> Result<Option<Document>> {
        let document: Option<Document> = sqlx::query_as::<Postgres, Document>(&format!(
            r#"
            UPDATE documents
            SET processed = TRUE,
                processed_at = NOW(),
                processing_error = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(document_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to mark document as processed")?;

        if document.is_some() {
            tracing::info!(document_id = %document_id, "Document marked processed");
        }

        Ok(document)
    }

    /// Record a failed processing attempt: clears the flag, stamps the time
    /// and stores the error message. Returns `None` when the row no longer
    /// exists.
    #[tracing::instrument(skip(self, error))]
    pub async fn mark_failed(&self, document_id: Uuid, error: &str) -> Result<Option<Document>> {
        let document: Option<Document> = sqlx::query_as::<Postgres, Document>(&format!(
            r#"
            UPDATE documents
            SET processed = FALSE,
                processed_at = NOW(),
                processing_error = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {DOCUMENT_COLUMNS}
            "#
        ))
        .bind(document_id)
        .bind(error)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to mark document as failed")?;

        if document.is_some() {
            tracing::warn!(
                document_id = %document_id,
                error = %error,
                "Document processing failure recorded"
            );
        }

        Ok(document)
    }
}
