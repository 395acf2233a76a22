//! Knowledge base document and chunk entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::Scope;

/// Default content type for ingested text
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// A document stored in a knowledge base scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    id: String,
    scope: Scope,
    filename: String,
    content_type: String,
    content_sha256: String,
    chunk_ids: Vec<String>,
    full_text: String,
    created_at: DateTime<Utc>,
}

impl Document {
    /// Create a new document with a freshly generated id
    pub fn new(scope: Scope, filename: impl Into<String>, full_text: impl Into<String>) -> Self {
        let full_text = full_text.into();

        Self {
            id: Uuid::new_v4().to_string(),
            scope,
            filename: filename.into(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            content_sha256: content_digest(&full_text),
            chunk_ids: Vec::new(),
            full_text,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_chunk_ids(mut self, chunk_ids: Vec<String>) -> Self {
        self.chunk_ids = chunk_ids;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    // Getters
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn content_sha256(&self) -> &str {
        &self.content_sha256
    }

    pub fn chunk_ids(&self) -> &[String] {
        &self.chunk_ids
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_ids.len()
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A chunk of a document with its embedding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub doc_id: String,
    pub scope: Scope,
    pub ordinal: usize,
    pub text: String,
    pub char_start: usize,
    pub char_end: usize,
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// Chunk ids are `<docId>_<ordinal>`, unique within a scope because doc ids are
    pub fn id_for(doc_id: &str, ordinal: usize) -> String {
        format!("{}_{}", doc_id, ordinal)
    }

    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}

/// A document and its chunks built fully in memory, ready to be committed as one unit
#[derive(Debug, Clone)]
pub struct StagedDocument {
    pub document: Document,
    pub chunks: Vec<Chunk>,
}

impl StagedDocument {
    /// Stage a document, linking the chunk ids onto it in ordinal order
    pub fn new(document: Document, mut chunks: Vec<Chunk>) -> Self {
        chunks.sort_by_key(|c| c.ordinal);
        let chunk_ids = chunks.iter().map(|c| c.id.clone()).collect();

        Self {
            document: document.with_chunk_ids(chunk_ids),
            chunks,
        }
    }

    pub fn doc_id(&self) -> &str {
        self.document.id()
    }
}

/// Summary of a document (without full text)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub doc_id: String,
    pub filename: String,
    pub content_type: String,
    /// Hex sha256 of the parsed text, so clients can spot re-uploads
    pub content_sha256: String,
    pub chunks: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            doc_id: doc.id().to_string(),
            filename: doc.filename().to_string(),
            content_type: doc.content_type().to_string(),
            content_sha256: doc.content_sha256().to_string(),
            chunks: doc.chunk_count(),
            created_at: doc.created_at(),
        }
    }
}

fn content_digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
