//! Document upload handler
//!
//! Order of effects: storage write first, then the database row, so a row
//! never points at a missing object. If the insert fails after the write,
//! the stored object is deleted again in the background.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use mentora_core::models::{
    DocumentCategory, DocumentResponse, ProcessDocumentPayload, Task, TaskType,
};
use mentora_core::AppError;
use mentora_db::NewDocument;
use mentora_storage::document_key;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadDocumentResponse {
    #[serde(flatten)]
    pub document: DocumentResponse,
    /// Id of the processing task, when `process_now` was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<Uuid>,
}

struct UploadFields {
    filename: String,
    content_type: String,
    data: Vec<u8>,
    learner_id: Option<Uuid>,
    category: DocumentCategory,
    process_now: bool,
    metadata: serde_json::Value,
}

async fn read_multipart(
    mut multipart: Multipart,
    max_file_size: usize,
) -> Result<UploadFields, AppError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut learner_id = None;
    let mut category = DocumentCategory::default();
    let mut process_now = false;
    let mut metadata = serde_json::json!({});

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field
                    .file_name()
                    .map(String::from)
                    .ok_or_else(|| AppError::InvalidInput("File field needs a filename".into()))?;
                let content_type = field
                    .content_type()
                    .map(String::from)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?;
                if data.len() > max_file_size {
                    return Err(AppError::PayloadTooLarge(format!(
                        "{} bytes exceeds max {} bytes",
                        data.len(),
                        max_file_size
                    )));
                }
                if data.is_empty() {
                    return Err(AppError::InvalidInput("File is empty".to_string()));
                }
                file = Some((filename, content_type, data.to_vec()));
            }
            "learner_id" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read learner_id: {}", e))
                })?;
                learner_id = Some(text.parse::<Uuid>().map_err(|_| {
                    AppError::InvalidInput(format!("Invalid learner_id: {}", text))
                })?);
            }
            "category" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read category: {}", e))
                })?;
                category = text
                    .parse()
                    .map_err(|_| AppError::InvalidInput(format!("Invalid category: {}", text)))?;
            }
            "process_now" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read process_now: {}", e))
                })?;
                process_now = text == "true";
            }
            "metadata" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read metadata: {}", e))
                })?;
                let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
                    AppError::InvalidInput(format!("Metadata is not valid JSON: {}", e))
                })?;
                if !value.is_object() {
                    return Err(AppError::InvalidInput(
                        "Metadata must be a JSON object".to_string(),
                    ));
                }
                metadata = value;
            }
            _ => {
                // Unknown fields are ignored
            }
        }
    }

    let (filename, content_type, data) =
        file.ok_or_else(|| AppError::InvalidInput("Missing 'file' field".to_string()))?;

    Ok(UploadFields {
        filename,
        content_type,
        data,
        learner_id,
        category,
        process_now,
        metadata,
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/documents",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document uploaded", body = UploadDocumentResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadDocumentResponse>), HttpAppError> {
    let fields = read_multipart(multipart, state.config.document_max_file_size).await?;

    let storage_key = document_key(Uuid::new_v4(), &fields.filename);
    let file_size = fields.data.len() as i64;

    let stored = state
        .storage
        .upload(&storage_key, &fields.content_type, fields.data)
        .await?;

    let document = match state
        .document_repository
        .create(NewDocument {
            filename: fields.filename,
            s3_bucket: stored.bucket.clone(),
            s3_key: stored.key.clone(),
            etag: stored.etag,
            file_size: Some(file_size),
            content_type: fields.content_type,
            category: fields.category,
            learner_id: fields.learner_id,
            uploaded_by: None,
            metadata: fields.metadata,
        })
        .await
    {
        Ok(document) => document,
        Err(e) => {
            // Cleanup storage on database failure
            let storage = state.storage.clone();
            let key = stored.key.clone();
            tokio::spawn(async move {
                if let Err(cleanup_err) = storage.delete(&key).await {
                    tracing::debug!(
                        error = %cleanup_err,
                        storage_key = %key,
                        "Failed to cleanup storage object after DB error"
                    );
                }
            });
            return Err(e.into());
        }
    };

    let job_id = if fields.process_now {
        let payload = Task::payload_from(&ProcessDocumentPayload {
            document_id: document.id,
        });
        let id = state
            .task_queue
            .submit_task(TaskType::ProcessDocument, payload, None)
            .await?;
        Some(id)
    } else {
        None
    };

    Ok((
        StatusCode::CREATED,
        Json(UploadDocumentResponse {
            document: DocumentResponse::from(document),
            job_id,
        }),
    ))
}
