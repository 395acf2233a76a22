//! Metrics exporter settings (`observability.metrics.*`)

use serde::Deserialize;

use crate::domain::DomainError;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics: MetricsConfig,
}

/// Prometheus exporter; `path` is mounted beside the API routes
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// The path must be absolute and must not shadow the API or health routes
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.enabled {
            return Ok(());
        }

        if !self.path.starts_with('/') || self.path.len() < 2 {
            return Err(DomainError::configuration(format!(
                "observability.metrics.path must be an absolute path, got '{}'",
                self.path
            )));
        }

        let reserved = ["/api", "/health", "/ready", "/live"];
        if reserved
            .iter()
            .any(|r| self.path == *r || self.path.starts_with(&format!("{r}/")))
        {
            return Err(DomainError::configuration(format!(
                "observability.metrics.path '{}' collides with a service route",
                self.path
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_exporter() {
        let config = ObservabilityConfig::default();

        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.path, "/metrics");
        assert!(config.metrics.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: ObservabilityConfig =
            serde_json::from_str(r#"{"metrics": {"enabled": false}}"#).unwrap();
        assert!(!config.metrics.enabled);
        assert_eq!(config.metrics.path, "/metrics");

        let config: ObservabilityConfig = serde_json::from_str("{}").unwrap();
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_path_must_be_absolute() {
        for path in ["metrics", "/", ""] {
            let config = MetricsConfig {
                enabled: true,
                path: path.to_string(),
            };
            assert!(config.validate().is_err(), "{path:?} accepted");
        }
    }

    #[test]
    fn test_path_cannot_shadow_service_routes() {
        for path in ["/health", "/api/v1/metrics", "/ready"] {
            let config = MetricsConfig {
                enabled: true,
                path: path.to_string(),
            };
            assert!(config.validate().is_err(), "{path:?} accepted");
        }

        let config = MetricsConfig {
            enabled: true,
            path: "/internal/metrics".to_string(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_disabled_exporter_skips_path_check() {
        let config = MetricsConfig {
            enabled: false,
            path: "not-a-path".to_string(),
        };
        assert!(config.validate().is_ok());
    }
}
