//! Document retrieval handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use mentora_core::models::{DocumentListQuery, DocumentResponse};
use mentora_core::AppError;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document found", body = DocumentResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    )
)]
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentResponse>, HttpAppError> {
    let document = state
        .document_repository
        .get(id)
        .await
        .map_err(HttpAppError::from)?
        .ok_or_else(|| HttpAppError(AppError::NotFound(format!("Document not found: {}", id))))?;

    Ok(Json(DocumentResponse::from(document)))
}

#[utoipa::path(
    get,
    path = "/api/v1/documents",
    tag = "documents",
    params(DocumentListQuery),
    responses(
        (status = 200, description = "Documents", body = [DocumentResponse])
    )
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DocumentListQuery>,
) -> Result<Json<Vec<DocumentResponse>>, HttpAppError> {
    let documents = state
        .document_repository
        .list(query)
        .await
        .map_err(HttpAppError::from)?;

    Ok(Json(
        documents.into_iter().map(DocumentResponse::from).collect(),
    ))
}
