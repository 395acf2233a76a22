//! Document management endpoint handlers

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::knowledge_base::Scope;
use crate::domain::retrieval::{
    DeleteDocumentResponse, DocumentChunksResponse, DocumentListResponse, normalize_page,
};

/// Query parameters for listing documents
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsParams {
    pub tenant_id: Option<String>,
    pub kb_id: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Query parameters for reading one document's chunks
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChunksParams {
    pub tenant_id: Option<String>,
    pub kb_id: Option<String>,
    pub doc_id: Option<String>,
    #[serde(default)]
    pub include_vectors: bool,
}

/// Scope-only query parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeParams {
    pub tenant_id: Option<String>,
    pub kb_id: Option<String>,
}

fn scope_of(tenant_id: &Option<String>, kb_id: &Option<String>) -> Result<Scope, ApiError> {
    Ok(Scope::from_optional(tenant_id.as_deref(), kb_id.as_deref())?)
}

/// GET /api/v1/docs
pub async fn list_documents(
    State(state): State<AppState>,
    Query(params): Query<ListDocumentsParams>,
) -> Result<Json<DocumentListResponse>, ApiError> {
    let scope = scope_of(&params.tenant_id, &params.kb_id)?;
    let (page, size) = normalize_page(params.page, params.size);

    debug!(scope = %scope, page, size, "Listing documents");

    let response = state.query_service.list_documents(&scope, page, size).await?;

    Ok(Json(response))
}

/// GET /api/v1/doc/chunks
pub async fn document_chunks(
    State(state): State<AppState>,
    Query(params): Query<DocumentChunksParams>,
) -> Result<Json<DocumentChunksResponse>, ApiError> {
    let scope = scope_of(&params.tenant_id, &params.kb_id)?;
    let doc_id = params
        .doc_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::bad_request("docId is required").with_param("docId"))?;

    debug!(scope = %scope, doc_id = %doc_id, "Reading document chunks");

    let response = state
        .query_service
        .document_chunks(&scope, doc_id, params.include_vectors)
        .await?;

    Ok(Json(response))
}

/// DELETE /api/v1/docs/{doc_id}
pub async fn delete_document(
    State(state): State<AppState>,
    Path(doc_id): Path<String>,
    Query(params): Query<ScopeParams>,
) -> Result<Json<DeleteDocumentResponse>, ApiError> {
    let scope = scope_of(&params.tenant_id, &params.kb_id)?;

    debug!(scope = %scope, doc_id = %doc_id, "Deleting document");

    let response = state.query_service.delete_document(&scope, &doc_id).await?;

    Ok(Json(response))
}
