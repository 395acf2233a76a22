//! Liveness and readiness endpoints

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::Json;

use super::state::AppState;

/// Text embedded on each readiness check to confirm the model answers
const READINESS_SAMPLE: &str = "kb-retrieval readiness";

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
}

/// State of the embedding model as seen by the readiness check
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedderReadiness {
    pub status: HealthStatus,
    pub model: String,
    pub dimension: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub latency_ms: u64,
}

/// Body of `GET /ready`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessReport {
    pub status: HealthStatus,
    pub version: &'static str,
    pub embedder: EmbedderReadiness,
    /// Number of tenant/knowledge-base partitions currently held in memory
    pub scopes: usize,
}

impl ReadinessReport {
    fn new(embedder: EmbedderReadiness, scopes: usize) -> Self {
        Self {
            status: embedder.status,
            version: env!("CARGO_PKG_VERSION"),
            embedder,
            scopes,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Ready once the embedder can produce a vector; the store itself is in memory
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let embedder = check_embedder(&state).await;
    let scopes = state.registry.scope_count().await;

    let report = ReadinessReport::new(embedder, scopes);
    (report.status_code(), Json(report))
}

pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_embedder(state: &AppState) -> EmbedderReadiness {
    let start = Instant::now();
    let result = state.embedder.embed_one(READINESS_SAMPLE).await;

    EmbedderReadiness {
        status: if result.is_ok() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        },
        model: state.embedder.model_id(),
        dimension: state.embedder.dimension(),
        error: result.err().map(|e| e.to_string()),
        latency_ms: start.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedder(status: HealthStatus, error: Option<&str>) -> EmbedderReadiness {
        EmbedderReadiness {
            status,
            model: "byte-histogram".to_string(),
            dimension: 32,
            error: error.map(str::to_string),
            latency_ms: 2,
        }
    }

    #[test]
    fn test_report_takes_embedder_status() {
        let report = ReadinessReport::new(embedder(HealthStatus::Healthy, None), 3);
        assert_eq!(report.status, HealthStatus::Healthy);
        assert_eq!(report.status_code(), StatusCode::OK);

        let report = ReadinessReport::new(
            embedder(HealthStatus::Unhealthy, Some("Connection refused")),
            0,
        );
        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert_eq!(report.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_report_serialization() {
        let report = ReadinessReport::new(
            embedder(HealthStatus::Unhealthy, Some("Connection refused")),
            2,
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["scopes"], 2);
        assert_eq!(json["embedder"]["model"], "byte-histogram");
        assert_eq!(json["embedder"]["dimension"], 32);
        assert_eq!(json["embedder"]["latencyMs"], 2);
        assert_eq!(json["embedder"]["error"], "Connection refused");
    }

    #[test]
    fn test_healthy_embedder_omits_error() {
        let json = serde_json::to_value(embedder(HealthStatus::Healthy, None)).unwrap();
        assert_eq!(json["status"], "healthy");
        assert!(json.get("error").is_none());
    }
}
