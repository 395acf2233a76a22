//! Infrastructure layer - Embedding providers, storage and services

pub mod embedding;
pub mod ingestion;
pub mod knowledge_base;
pub mod logging;
pub mod observability;
pub mod services;
