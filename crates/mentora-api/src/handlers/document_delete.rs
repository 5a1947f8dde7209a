//! Document deletion handler
//!
//! Storage object first, then the row. If the storage delete fails the row
//! stays, so a later retry still knows the key.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use mentora_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[utoipa::path(
    delete,
    path = "/api/v1/documents/{id}",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    let document = state
        .document_repository
        .get(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| HttpAppError(AppError::NotFound(format!("Document not found: {}", id))))?;

    state.storage.delete(&document.s3_key).await?;

    let deleted = state
        .document_repository
        .delete(id)
        .await
        .map_err(HttpAppError::from)?;
    if !deleted {
        // Row disappeared between the lookup and the delete
        return Err(HttpAppError(AppError::NotFound(format!(
            "Document not found: {}",
            id
        ))));
    }

    tracing::info!(document_id = %id, s3_key = %document.s3_key, "Document deleted");

    Ok(StatusCode::NO_CONTENT)
}
