//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::{MetricsConfig, ObservabilityConfig};
pub use metrics::{
    PrometheusMetrics, create_metrics_router, init_metrics, record_embedding_retry,
    record_http_request, record_ingestion, record_query,
};
