//! Search hit types shared by the vector index and the query engine

use serde::{Deserialize, Serialize};

/// Metadata stored alongside each vector in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRef {
    pub doc_id: String,
    pub ordinal: usize,
}

impl ChunkRef {
    pub fn new(doc_id: impl Into<String>, ordinal: usize) -> Self {
        Self {
            doc_id: doc_id.into(),
            ordinal,
        }
    }
}

/// A single index hit, before chunk text is resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexHit {
    pub chunk_id: String,
    pub chunk: ChunkRef,
    pub score: f32,
}

/// A resolved similarity result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub doc_id: String,
    pub chunk_id: String,
    pub ordinal: usize,
    pub text: String,
    pub score: f32,
}
