//! Versioned knowledge base endpoints

pub mod documents;
pub mod ingest;
pub mod query;

use axum::{
    Router,
    routing::{delete, get, post},
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/ingest/txt", post(ingest::ingest_upload))
        .route("/ingest/text", post(ingest::ingest_text))
        .route("/query", post(query::query))
        .route("/docs", get(documents::list_documents))
        .route("/docs/{doc_id}", delete(documents::delete_document))
        .route("/doc/chunks", get(documents::document_chunks))
}
