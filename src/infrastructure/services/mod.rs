//! Infrastructure services

mod ingestion_service;
mod query_service;

pub use ingestion_service::{IngestionService, IngestionServiceTrait};
pub use query_service::{QueryService, QueryServiceTrait};
