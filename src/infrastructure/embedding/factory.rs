use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::{ByteHistogramEmbeddingProvider, HttpClient, OpenAiEmbeddingProvider};
use super::openai::DEFAULT_OPENAI_BASE_URL;
use crate::config::{EmbeddingProviderKind, EmbeddingSettings};
use crate::domain::DomainError;
use crate::domain::embedding::EmbeddingProvider;

/// Model used when the OpenAI provider is selected without a model
pub const DEFAULT_OPENAI_MODEL: &str = "text-embedding-3-small";

/// Factory for creating embedding providers
#[derive(Debug)]
pub struct EmbeddingProviderFactory;

impl EmbeddingProviderFactory {
    /// Create the configured embedding provider
    pub fn create(settings: &EmbeddingSettings) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
        match settings.provider {
            EmbeddingProviderKind::Local => {
                let provider = ByteHistogramEmbeddingProvider::new(settings.dimension)?;
                info!(model = %provider.model_id(), "Using local embedding provider");
                Ok(Arc::new(provider))
            }

            EmbeddingProviderKind::OpenAi => {
                let provider = Self::create_openai(settings)?;
                info!(model = %provider.model_id(), "Using OpenAI-compatible embedding provider");
                Ok(Arc::new(provider))
            }
        }
    }

    fn create_openai(
        settings: &EmbeddingSettings,
    ) -> Result<OpenAiEmbeddingProvider<HttpClient>, DomainError> {
        let model = settings
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());

        let base_url = settings
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());

        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());

        // The public endpoint always needs a key; self-hosted ones may not
        if api_key.is_none() && settings.base_url.is_none() {
            return Err(DomainError::configuration(format!(
                "environment variable {} is required for the openai embedding provider",
                settings.api_key_env
            )));
        }

        // Known models declare their own dimension so a wrong setting is caught at startup
        let dimension = OpenAiEmbeddingProvider::<HttpClient>::known_dimension(&model)
            .unwrap_or(settings.dimension);

        let client = HttpClient::with_timeout(Duration::from_secs(settings.timeout_secs))?;

        Ok(OpenAiEmbeddingProvider::with_base_url(
            client, api_key, base_url, model, dimension,
        ))
    }
}
