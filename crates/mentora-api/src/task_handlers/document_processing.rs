//! Document processing task handler
//!
//! Runs one ingestion attempt: load the document row, hand its storage
//! coordinates to the AI service, and record the outcome on the row. The
//! AI service downloads the file itself, so no bytes move through here.
//!
//! Failure handling follows the taxonomy in
//! [`mentora_core::DocumentProcessingError`]: the document row is stamped
//! with the failure first, then the error is re-signaled to the worker as
//! recoverable or unrecoverable so retry budgeting stays in one place.

use anyhow::Result;
use serde_json::json;
use std::sync::Arc;

use mentora_core::models::{Document, ProcessDocumentPayload, Task};
use mentora_core::{DocumentProcessingError, TaskError};
use mentora_services::{AiClientError, IngestionResult, ProcessDocumentRequest};

use crate::state::AppState;

/// Map a client error to the processing taxonomy.
///
/// HTTP 4xx means the service judged this document and will judge it the
/// same way again, so retrying is wasted work. Everything transport-shaped
/// or 5xx is worth another attempt.
fn classify_ai_error(err: &AiClientError) -> DocumentProcessingError {
    match err {
        AiClientError::InvalidBody(_) => DocumentProcessingError::InvalidResponse(err.to_string()),
        AiClientError::Client { message, .. } => {
            DocumentProcessingError::ProcessingRejected(message.clone())
        }
        AiClientError::Server { message, .. } => {
            DocumentProcessingError::RetryableServiceError(message.clone())
        }
        AiClientError::Timeout(_) => DocumentProcessingError::ServiceUnavailable(err.to_string()),
        AiClientError::Connect(_) => DocumentProcessingError::ServiceUnavailable(err.to_string()),
        AiClientError::Other(_) => DocumentProcessingError::InternalError(err.to_string()),
    }
}

fn build_request(document: &Document) -> ProcessDocumentRequest {
    // Forward metadata only when there is something in it.
    let metadata = match &document.metadata {
        serde_json::Value::Object(map) if !map.is_empty() => Some(document.metadata.clone()),
        _ => None,
    };

    ProcessDocumentRequest {
        document_id: document.id,
        s3_bucket: document.s3_bucket.clone(),
        s3_key: document.s3_key.clone(),
        content_type: document.content_type.clone(),
        filename: document.filename.clone(),
        category: document.category.to_string(),
        metadata,
    }
}

#[tracing::instrument(skip(state, task), fields(task.id = %task.id, document.id = tracing::field::Empty))]
pub async fn process(state: Arc<AppState>, task: &Task) -> Result<serde_json::Value> {
    let payload: ProcessDocumentPayload = task.try_payload_as().map_err(|e| {
        TaskError::unrecoverable(anyhow::anyhow!("Invalid process_document payload: {}", e))
    })?;
    let document_id = payload.document_id;
    tracing::Span::current().record("document.id", document_id.to_string());

    // One attempt per document at a time; a duplicate task waits here and
    // then runs against the updated row.
    let guard = state.processing_locks.acquire(document_id).await;
    let outcome = run_attempt(&state, document_id).await;
    state.processing_locks.release(document_id, guard).await;

    outcome
}

/// A missing row has nothing to stamp an outcome on; fail the task outright
/// rather than retrying against an id that will stay gone.
fn require_row<T>(row: Option<T>, document_id: uuid::Uuid) -> Result<T, TaskError> {
    row.ok_or_else(|| TaskError::unrecoverable(DocumentProcessingError::NotFound(document_id)))
}

async fn run_attempt(state: &Arc<AppState>, document_id: uuid::Uuid) -> Result<serde_json::Value> {
    let document = state
        .document_repository
        .get(document_id)
        .await
        .map_err(TaskError::recoverable)?;
    let document = require_row(document, document_id)?;

    tracing::info!(
        document_id = %document_id,
        filename = %document.filename,
        category = %document.category,
        "Sending document to AI service for processing"
    );

    let request = build_request(&document);
    let result = state.ai_client.process_document(&request).await;

    match result {
        Ok(IngestionResult::Completed {
            chunks_created,
            embeddings_created,
            processing_time_seconds,
        }) => {
            // The row can vanish between the load and the stamp; that is the
            // same terminal NotFound as a missing load, not a retry.
            let updated = state
                .document_repository
                .mark_processed(document_id)
                .await
                .map_err(TaskError::recoverable)?;
            require_row(updated, document_id)?;

            tracing::info!(
                document_id = %document_id,
                chunks_created,
                embeddings_created,
                processing_time_seconds,
                "Document processed successfully"
            );

            Ok(json!({
                "status": "completed",
                "document_id": document_id,
                "chunks_created": chunks_created,
                "embeddings_created": embeddings_created,
                "processing_time_seconds": processing_time_seconds,
            }))
        }
        Ok(IngestionResult::Rejected { message }) => {
            record_failure(state, document_id, &message).await;
            let processing_error = DocumentProcessingError::ProcessingRejected(message);
            Err(TaskError::unrecoverable(processing_error).into())
        }
        Err(client_error) => {
            let processing_error = classify_ai_error(&client_error);
            record_failure(state, document_id, &processing_error.to_string()).await;

            let err = if processing_error.is_retryable() {
                TaskError::recoverable(processing_error)
            } else {
                TaskError::unrecoverable(processing_error)
            };
            Err(err.into())
        }
    }
}

/// Stamp the failure on the document row before the error is re-signaled.
/// A failed stamp must not mask the processing error itself.
async fn record_failure(state: &Arc<AppState>, document_id: uuid::Uuid, error: &str) {
    match state
        .document_repository
        .mark_failed(document_id, error)
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            tracing::warn!(
                document_id = %document_id,
                "Document row vanished before the failure could be recorded"
            );
        }
        Err(e) => {
            tracing::error!(
                document_id = %document_id,
                error = %e,
                "Failed to record processing failure on document"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use mentora_core::models::DocumentCategory;
    use uuid::Uuid;

    fn sample_document(metadata: serde_json::Value) -> Document {
        Document {
            id: Uuid::new_v4(),
            filename: "intro.pdf".to_string(),
            s3_bucket: "mentora-documents".to_string(),
            s3_key: "documents/abc/intro.pdf".to_string(),
            etag: None,
            file_size: Some(2048),
            content_type: "application/pdf".to_string(),
            category: DocumentCategory::Lesson,
            learner_id: None,
            uploaded_by: None,
            processed: false,
            processed_at: None,
            processing_error: None,
            metadata,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn client_4xx_is_not_retryable() {
        let err = AiClientError::Client {
            status: 422,
            message: "Invalid file format: corrupted PDF".to_string(),
        };
        let classified = classify_ai_error(&err);
        assert!(!classified.is_retryable());
        assert_eq!(classified.to_string(), "Invalid file format: corrupted PDF");
    }

    #[test]
    fn invalid_body_is_not_retryable() {
        let err = AiClientError::InvalidBody("missing field".to_string());
        let classified = classify_ai_error(&err);
        assert!(!classified.is_retryable());
        assert!(classified.to_string().starts_with("JSON parse error: "));
    }

    #[test]
    fn server_5xx_is_retryable() {
        let err = AiClientError::Server {
            status: 503,
            message: "overloaded".to_string(),
        };
        let classified = classify_ai_error(&err);
        assert!(classified.is_retryable());
        assert_eq!(classified.to_string(), "overloaded");
    }

    #[test]
    fn timeout_and_connect_are_retryable_with_prefixes() {
        let timeout = classify_ai_error(&AiClientError::Timeout("deadline".to_string()));
        assert!(timeout.is_retryable());
        assert_eq!(timeout.to_string(), "Connection timeout: deadline");

        let connect = classify_ai_error(&AiClientError::Connect("refused".to_string()));
        assert!(connect.is_retryable());
        assert_eq!(connect.to_string(), "Connection failed: refused");
    }

    #[test]
    fn other_transport_errors_are_retryable() {
        let classified = classify_ai_error(&AiClientError::Other("boom".to_string()));
        assert!(classified.is_retryable());
        assert_eq!(classified.to_string(), "Unexpected error: boom");
    }

    #[test]
    fn request_carries_document_coordinates() {
        let document = sample_document(serde_json::json!({"course": "rust-101"}));
        let request = build_request(&document);

        assert_eq!(request.document_id, document.id);
        assert_eq!(request.s3_bucket, "mentora-documents");
        assert_eq!(request.s3_key, "documents/abc/intro.pdf");
        assert_eq!(request.category, "lesson");
        assert_eq!(
            request.metadata,
            Some(serde_json::json!({"course": "rust-101"}))
        );
    }

    #[test]
    fn missing_row_maps_to_unrecoverable_not_found() {
        let document_id = Uuid::new_v4();
        let err = require_row::<Document>(None, document_id).unwrap_err();
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            format!("Document not found: {}", document_id)
        );
    }

    #[test]
    fn request_omits_empty_metadata() {
        let document = sample_document(serde_json::json!({}));
        assert!(build_request(&document).metadata.is_none());

        let document = sample_document(serde_json::Value::Null);
        assert!(build_request(&document).metadata.is_none());
    }
}
