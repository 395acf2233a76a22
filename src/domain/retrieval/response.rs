//! Query and document management response shapes

use serde::{Deserialize, Serialize};

use crate::domain::knowledge_base::{Chunk, DocumentSummary, Scope, SearchResult};

/// Similarity-mode answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityResponse {
    pub tenant_id: String,
    pub kb_id: String,
    pub model: String,
    pub top_k: usize,
    pub min_score: f32,
    pub results: Vec<SearchResult>,
}

/// A chunk as shown in document-mode answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkView {
    pub chunk_id: String,
    pub ordinal: usize,
    pub text: String,
}

impl From<&Chunk> for ChunkView {
    fn from(chunk: &Chunk) -> Self {
        Self {
            chunk_id: chunk.id.clone(),
            ordinal: chunk.ordinal,
            text: chunk.text.clone(),
        }
    }
}

/// Document-mode answer. `document_text` is only present for `full=true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub tenant_id: String,
    pub kb_id: String,
    pub doc_id: String,
    pub filename: String,
    pub chunk_count: usize,
    pub chunks: Vec<ChunkView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_text: Option<String>,
}

/// Answer to a query in either mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Document(DocumentResponse),
    Similarity(SimilarityResponse),
}

/// One page of documents in a scope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListResponse {
    pub tenant_id: String,
    pub kb_id: String,
    pub page: usize,
    pub size: usize,
    pub total: usize,
    pub items: Vec<DocumentSummary>,
}

/// Stored chunks of one document, optionally with their vectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentChunksResponse {
    pub tenant_id: String,
    pub kb_id: String,
    pub doc_id: String,
    pub chunks: Vec<ChunkView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vectors: Option<Vec<Vec<f32>>>,
}

/// Result of deleting a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDocumentResponse {
    pub tenant_id: String,
    pub kb_id: String,
    pub doc_id: String,
    pub deleted_chunks: usize,
}

impl DeleteDocumentResponse {
    pub fn new(scope: &Scope, doc_id: impl Into<String>, deleted_chunks: usize) -> Self {
        Self {
            tenant_id: scope.tenant_id().to_string(),
            kb_id: scope.kb_id().to_string(),
            doc_id: doc_id.into(),
            deleted_chunks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_response_omits_text_when_absent() {
        let response = DocumentResponse {
            tenant_id: "t".to_string(),
            kb_id: "k".to_string(),
            doc_id: "d".to_string(),
            filename: "a.txt".to_string(),
            chunk_count: 1,
            chunks: vec![ChunkView {
                chunk_id: "d_0".to_string(),
                ordinal: 0,
                text: "hello".to_string(),
            }],
            document_text: None,
        };

        let json = serde_json::to_value(QueryResponse::Document(response)).unwrap();
        assert_eq!(json["chunkCount"], 1);
        assert_eq!(json["chunks"][0]["chunkId"], "d_0");
        assert!(json.get("documentText").is_none());
    }

    #[test]
    fn test_similarity_response_shape() {
        let response = SimilarityResponse {
            tenant_id: "t".to_string(),
            kb_id: "k".to_string(),
            model: "byte-histogram-128".to_string(),
            top_k: 5,
            min_score: 0.0,
            results: vec![SearchResult {
                doc_id: "d".to_string(),
                chunk_id: "d_0".to_string(),
                ordinal: 0,
                text: "hello".to_string(),
                score: 0.5,
            }],
        };

        let json = serde_json::to_value(QueryResponse::Similarity(response)).unwrap();
        assert_eq!(json["topK"], 5);
        assert_eq!(json["results"][0]["docId"], "d");
        assert_eq!(json["results"][0]["score"], 0.5);
    }
}
