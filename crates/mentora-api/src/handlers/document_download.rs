//! Presigned download URL handler

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use mentora_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct DownloadUrlResponse {
    pub url: String,
    /// Seconds the URL stays valid.
    pub expires_in: u64,
}

#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}/download-url",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "Time-limited download URL", body = DownloadUrlResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn get_download_url(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DownloadUrlResponse>, HttpAppError> {
    let document = state
        .document_repository
        .get(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| HttpAppError(AppError::NotFound(format!("Document not found: {}", id))))?;

    let expires_in = state.config.presign_expiry();
    let url = state
        .storage
        .get_presigned_url(&document.s3_key, expires_in)
        .await?;

    Ok(Json(DownloadUrlResponse {
        url,
        expires_in: expires_in.as_secs(),
    }))
}
