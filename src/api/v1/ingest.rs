//! Ingestion endpoint handlers

use axum::extract::{Multipart, Query, State};
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::ingestion::{
    DEFAULT_UPLOAD_FILENAME, IngestRequest, IngestionSummary, validate_text_body,
    validate_text_filename,
};
use crate::domain::knowledge_base::Scope;

/// Name of the multipart part carrying the document
pub const FILE_PART: &str = "file";

/// Scope query parameters shared by the ingestion routes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestParams {
    pub tenant_id: Option<String>,
    pub kb_id: Option<String>,
    pub filename: Option<String>,
}

impl IngestParams {
    fn scope(&self) -> Result<Scope, ApiError> {
        Ok(Scope::from_optional(
            self.tenant_id.as_deref(),
            self.kb_id.as_deref(),
        )?)
    }
}

/// POST /api/v1/ingest/txt
pub async fn ingest_upload(
    State(state): State<AppState>,
    Query(params): Query<IngestParams>,
    mut multipart: Multipart,
) -> Result<Json<IngestionSummary>, ApiError> {
    let scope = params.scope()?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILE_PART) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_UPLOAD_FILENAME)
            .to_string();
        let content_type = field.content_type().map(|s| s.to_string());

        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read file '{}': {}", filename, e)))?;

        debug!(
            scope = %scope,
            filename = %filename,
            bytes = content.len(),
            "Ingesting uploaded file"
        );

        let mut request = IngestRequest::new(scope, filename, content);

        if let Some(content_type) = content_type {
            request = request.with_content_type(content_type);
        }

        let summary = state.ingestion_service.ingest(request).await?;
        return Ok(Json(summary));
    }

    Err(ApiError::bad_request("multipart part 'file' is required").with_param(FILE_PART))
}

/// POST /api/v1/ingest/text
pub async fn ingest_text(
    State(state): State<AppState>,
    Query(params): Query<IngestParams>,
    body: String,
) -> Result<Json<IngestionSummary>, ApiError> {
    let scope = params.scope()?;
    let filename = validate_text_filename(params.filename.as_deref())
        .map_err(|e| ApiError::from(e).with_param("filename"))?;
    validate_text_body(&body)?;

    debug!(scope = %scope, filename = %filename, bytes = body.len(), "Ingesting raw text");

    let request = IngestRequest::new(scope, filename, body).with_content_type("text/plain");
    let summary = state.ingestion_service.ingest(request).await?;

    Ok(Json(summary))
}
