//! Knowledge base ingestion and retrieval service
//!
//! Documents are uploaded into a (tenant, knowledge base) scope, split into
//! chunks, embedded and indexed. Each scope can then be queried by semantic
//! similarity or by document id.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    embedding::{EmbedderAdapter, EmbeddingProviderFactory},
    knowledge_base::ScopeRegistry,
    services::{IngestionService, QueryService},
};
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let settings = &config.embedding;
    let provider = EmbeddingProviderFactory::create(settings)?;

    // A model whose vectors differ from the configured dimension is fatal
    let embedder = EmbedderAdapter::new(provider, settings.dimension, settings.batch_size)?;
    let dimension = embedder.dimension();
    info!(
        provider = ?settings.provider,
        model = %embedder.model_id(),
        dimension,
        "Embedding provider initialized"
    );

    let registry = Arc::new(ScopeRegistry::new(dimension));

    let ingestion_service = IngestionService::new(
        registry.clone(),
        embedder.clone(),
        config.chunking.clone(),
    )
    .with_retry(settings.retry.clone());

    let query_service = QueryService::new(registry.clone(), embedder.clone())
        .with_limits(config.query.limits())
        .with_retry(settings.retry.clone());

    Ok(AppState::new(
        Arc::new(ingestion_service),
        Arc::new(query_service),
        embedder,
        registry,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_state_uses_local_embedder() {
        let state = create_app_state().await.unwrap();

        assert_eq!(state.embedder.dimension(), 128);
        assert_eq!(state.registry.dimension(), 128);
        assert_eq!(state.registry.scope_count().await, 0);
    }

    #[tokio::test]
    async fn test_configured_dimension_flows_to_registry() {
        let mut config = AppConfig::default();
        config.embedding.dimension = 32;

        let state = create_app_state_with_config(&config).await.unwrap();

        assert_eq!(state.embedder.dimension(), 32);
        assert_eq!(state.registry.dimension(), 32);
    }

    #[tokio::test]
    async fn test_model_dimension_mismatch_fails_startup() {
        let mut config = AppConfig::default();
        config.embedding.provider = crate::config::EmbeddingProviderKind::OpenAi;
        config.embedding.model = Some("text-embedding-3-small".to_string());
        config.embedding.base_url = Some("http://127.0.0.1:9".to_string());
        config.embedding.dimension = 32;

        let err = create_app_state_with_config(&config).await.err().unwrap();
        let domain_err = err.downcast_ref::<crate::domain::DomainError>().unwrap();

        assert!(matches!(
            domain_err,
            crate::domain::DomainError::DimensionMismatch {
                expected: 32,
                actual: 1536
            }
        ));
    }
}
