//! Ingestion request and result types

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::domain::knowledge_base::Scope;

/// A document submitted for ingestion into a scope
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub scope: Scope,
    pub filename: String,
    pub content: Bytes,
    pub content_type: Option<String>,
}

impl IngestRequest {
    pub fn new(scope: Scope, filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            scope,
            filename: filename.into(),
            content: content.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Summary returned after a document is fully indexed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionSummary {
    pub doc_id: String,
    pub chunks: usize,
    pub dimension: usize,
}

impl IngestionSummary {
    pub fn new(doc_id: impl Into<String>, chunks: usize, dimension: usize) -> Self {
        Self {
            doc_id: doc_id.into(),
            chunks,
            dimension,
        }
    }
}
