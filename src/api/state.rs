//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::embedding::EmbedderAdapter;
use crate::infrastructure::knowledge_base::ScopeRegistry;
use crate::infrastructure::services::{IngestionServiceTrait, QueryServiceTrait};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub ingestion_service: Arc<dyn IngestionServiceTrait>,
    pub query_service: Arc<dyn QueryServiceTrait>,
    /// Used by the readiness check to exercise the embedding backend
    pub embedder: EmbedderAdapter,
    pub registry: Arc<ScopeRegistry>,
}

impl AppState {
    pub fn new(
        ingestion_service: Arc<dyn IngestionServiceTrait>,
        query_service: Arc<dyn QueryServiceTrait>,
        embedder: EmbedderAdapter,
        registry: Arc<ScopeRegistry>,
    ) -> Self {
        Self {
            ingestion_service,
            query_service,
            embedder,
            registry,
        }
    }
}
