use serde::Deserialize;

use crate::domain::DomainError;
use crate::domain::embedding::RetryConfig;
use crate::domain::ingestion::ChunkingConfig;
use crate::domain::retrieval::{DEFAULT_TOP_K, MAX_TOP_K, QueryLimits};
use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub embedding: EmbeddingSettings,
    pub chunking: ChunkingConfig,
    pub query: QuerySettings,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Which embedding backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    #[default]
    Local,
    OpenAi,
}

/// Embedding provider settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub provider: EmbeddingProviderKind,
    pub model: Option<String>,
    pub dimension: usize,
    pub base_url: Option<String>,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub batch_size: usize,
    pub timeout_secs: u64,
    pub retry: RetryConfig,
}

/// Similarity query limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    pub default_top_k: i64,
    pub max_top_k: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::default(),
            model: None,
            dimension: 128,
            base_url: None,
            api_key_env: "OPENAI_API_KEY".to_string(),
            batch_size: 64,
            timeout_secs: 30,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_top_k: DEFAULT_TOP_K,
            max_top_k: MAX_TOP_K,
        }
    }
}

impl QuerySettings {
    pub fn limits(&self) -> QueryLimits {
        QueryLimits {
            default_top_k: self.default_top_k,
            max_top_k: self.max_top_k,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject settings the service cannot start with
    pub fn validate(&self) -> Result<(), DomainError> {
        self.chunking.validate()?;
        self.observability.metrics.validate()?;

        if self.embedding.dimension == 0 {
            return Err(DomainError::configuration(
                "embedding.dimension must be greater than 0",
            ));
        }

        if self.embedding.batch_size == 0 {
            return Err(DomainError::configuration(
                "embedding.batch_size must be greater than 0",
            ));
        }

        if self.query.max_top_k < 1 {
            return Err(DomainError::configuration(
                "query.max_top_k must be at least 1",
            ));
        }

        if self.query.default_top_k < 1 || self.query.default_top_k > self.query.max_top_k {
            return Err(DomainError::configuration(format!(
                "query.default_top_k must be in range [1, {}]",
                self.query.max_top_k
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.embedding.provider, EmbeddingProviderKind::Local);
        assert_eq!(config.embedding.dimension, 128);
        assert_eq!(config.embedding.batch_size, 64);
        assert_eq!(config.chunking.max_chunk_chars, 800);
        assert_eq!(config.query.limits(), QueryLimits::default());
        assert!(config.observability.metrics.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sources_keep_defaults() {
        let config: AppConfig = config::Config::builder()
            .set_override("embedding.provider", "openai")
            .unwrap()
            .set_override("chunking.overlap_chars", 50)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.embedding.provider, EmbeddingProviderKind::OpenAi);
        assert_eq!(config.embedding.dimension, 128);
        assert_eq!(config.chunking.overlap_chars, 50);
        assert_eq!(config.chunking.max_chunk_chars, 800);
    }

    #[test]
    fn test_overlap_not_below_max_rejected() {
        let mut config = AppConfig::default();
        config.chunking.overlap_chars = config.chunking.max_chunk_chars;

        assert!(matches!(
            config.validate(),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let mut config = AppConfig::default();
        config.embedding.dimension = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_top_k_above_max_rejected() {
        let mut config = AppConfig::default();
        config.query.default_top_k = 10;
        config.query.max_top_k = 5;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_metrics_path_checked_on_validate() {
        let mut config = AppConfig::default();
        config.observability.metrics.path = "/api/metrics".to_string();

        assert!(config.validate().is_err());
    }
}
