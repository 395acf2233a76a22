//! Document and chunk records for a single scope

use std::collections::{HashMap, HashSet};

use crate::domain::DomainError;
use crate::domain::ingestion::merge_chunk_texts;
use crate::domain::knowledge_base::{Chunk, Document, StagedDocument};

/// Documents of one scope with their ordered chunks.
///
/// Documents keep their ingestion order so listings are stable.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: HashMap<String, Document>,
    order: Vec<String>,
    chunks: HashMap<String, Chunk>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn chunk_len(&self) -> usize {
        self.chunks.len()
    }

    /// Validate a staged document against the current contents
    pub fn check_put(&self, staged: &StagedDocument) -> Result<(), DomainError> {
        let doc_id = staged.doc_id();

        if doc_id.trim().is_empty() {
            return Err(DomainError::internal("staged document has no id"));
        }

        if self.documents.contains_key(doc_id) {
            return Err(DomainError::internal(format!(
                "document '{}' already exists",
                doc_id
            )));
        }

        if staged.chunks.is_empty() {
            return Err(DomainError::internal(format!(
                "document '{}' has no chunks",
                doc_id
            )));
        }

        let mut seen = HashSet::with_capacity(staged.chunks.len());

        for (expected, chunk) in staged.chunks.iter().enumerate() {
            if chunk.ordinal != expected {
                return Err(DomainError::internal(format!(
                    "document '{}' has ordinal {} where {} was expected",
                    doc_id, chunk.ordinal, expected
                )));
            }

            if chunk.doc_id != doc_id || &chunk.scope != staged.document.scope() {
                return Err(DomainError::internal(format!(
                    "chunk '{}' does not belong to document '{}'",
                    chunk.id, doc_id
                )));
            }

            if self.chunks.contains_key(&chunk.id) || !seen.insert(chunk.id.as_str()) {
                return Err(DomainError::internal(format!(
                    "chunk '{}' already exists",
                    chunk.id
                )));
            }
        }

        Ok(())
    }

    /// Store a document and all its chunks, or nothing if validation fails
    pub fn put(&mut self, staged: StagedDocument) -> Result<(), DomainError> {
        self.check_put(&staged)?;

        let StagedDocument { document, chunks } = staged;
        let doc_id = document.id().to_string();

        for chunk in chunks {
            self.chunks.insert(chunk.id.clone(), chunk);
        }

        self.order.push(doc_id.clone());
        self.documents.insert(doc_id, document);

        Ok(())
    }

    pub fn get_by_id(&self, doc_id: &str) -> Result<&Document, DomainError> {
        self.documents
            .get(doc_id)
            .ok_or_else(|| DomainError::not_found(format!("Document '{}' not found", doc_id)))
    }

    pub fn chunk(&self, chunk_id: &str) -> Option<&Chunk> {
        self.chunks.get(chunk_id)
    }

    /// Chunks of a document in ordinal order
    pub fn chunks_for(&self, doc_id: &str) -> Result<Vec<&Chunk>, DomainError> {
        let document = self.get_by_id(doc_id)?;

        document
            .chunk_ids()
            .iter()
            .map(|id| {
                self.chunks.get(id).ok_or_else(|| {
                    DomainError::internal(format!("chunk '{}' of '{}' is missing", id, doc_id))
                })
            })
            .collect()
    }

    /// Rebuild the document text by joining its chunks in ordinal order,
    /// trimming the part of each chunk that overlaps the previous ones
    pub fn reconstruct_full_text(&self, doc_id: &str) -> Result<String, DomainError> {
        let chunks = self.chunks_for(doc_id)?;

        Ok(merge_chunk_texts(
            chunks.iter().map(|c| (c.char_start, c.text.as_str())),
        ))
    }

    /// One page of documents in ingestion order, plus the total count
    pub fn list(&self, offset: usize, limit: usize) -> (Vec<&Document>, usize) {
        let page = self
            .order
            .iter()
            .skip(offset)
            .take(limit)
            .filter_map(|id| self.documents.get(id))
            .collect();

        (page, self.order.len())
    }

    /// Remove a document and its chunks, returning the removed document
    pub fn remove(&mut self, doc_id: &str) -> Result<Document, DomainError> {
        let document = self
            .documents
            .remove(doc_id)
            .ok_or_else(|| DomainError::not_found(format!("Document '{}' not found", doc_id)))?;

        for chunk_id in document.chunk_ids() {
            self.chunks.remove(chunk_id);
        }

        self.order.retain(|id| id != doc_id);

        Ok(document)
    }
}
