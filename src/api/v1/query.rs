//! Query endpoint handler

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::retrieval::{QueryRequest, QueryResponse};

/// POST /api/v1/query
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    debug!(
        tenant_id = ?request.tenant_id,
        kb_id = ?request.kb_id,
        doc_id = ?request.doc_id,
        "Running query"
    );

    let response = state.query_service.query(request).await?;

    Ok(Json(response))
}
