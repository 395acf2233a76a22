//! One scope's index and store, committed together

use tracing::debug;

use super::document_store::DocumentStore;
use super::vector_index::{IndexInsert, VectorIndex};
use crate::domain::DomainError;
use crate::domain::knowledge_base::{ChunkRef, Scope, SearchResult, StagedDocument};

/// The vector index and document store of a single scope.
///
/// Callers hold the partition's write lock for [`ScopePartition::commit`] and
/// [`ScopePartition::delete_document`], so readers see a document together
/// with all of its vectors or not at all.
#[derive(Debug)]
pub struct ScopePartition {
    scope: Scope,
    index: VectorIndex,
    store: DocumentStore,
}

impl ScopePartition {
    pub fn new(scope: Scope, dimension: usize) -> Self {
        Self {
            scope,
            index: VectorIndex::new(dimension),
            store: DocumentStore::new(),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Make a staged document visible. Everything is validated before either
    /// structure is touched.
    pub fn commit(&mut self, staged: StagedDocument) -> Result<(), DomainError> {
        if staged.document.scope() != &self.scope {
            return Err(DomainError::internal(format!(
                "document for scope {} committed to {}",
                staged.document.scope(),
                self.scope
            )));
        }

        let inserts: Vec<IndexInsert> = staged
            .chunks
            .iter()
            .map(|chunk| IndexInsert {
                chunk_id: chunk.id.clone(),
                vector: chunk.embedding.clone(),
                chunk: ChunkRef::new(chunk.doc_id.clone(), chunk.ordinal),
            })
            .collect();

        self.store.check_put(&staged)?;
        self.index.check_inserts(&inserts)?;

        let doc_id = staged.doc_id().to_string();
        let chunks = inserts.len();

        self.index.insert_all(inserts)?;
        self.store.put(staged)?;

        debug!(scope = %self.scope, doc_id = %doc_id, chunks, "Committed document");

        Ok(())
    }

    /// Search the index and resolve every hit to its chunk text
    pub fn search(
        &self,
        query: &[f32],
        top_k: i64,
        min_score: f32,
    ) -> Result<Vec<SearchResult>, DomainError> {
        self.index
            .search(query, top_k, min_score)?
            .into_iter()
            .map(|hit| {
                let chunk = self.store.chunk(&hit.chunk_id).ok_or_else(|| {
                    DomainError::internal(format!("indexed chunk '{}' has no record", hit.chunk_id))
                })?;

                Ok(SearchResult {
                    doc_id: hit.chunk.doc_id,
                    chunk_id: hit.chunk_id,
                    ordinal: hit.chunk.ordinal,
                    text: chunk.text.clone(),
                    score: hit.score,
                })
            })
            .collect()
    }

    /// Remove a document from both structures, returning the number of chunks removed
    pub fn delete_document(&mut self, doc_id: &str) -> Result<usize, DomainError> {
        let document = self.store.remove(doc_id)?;
        let removed = self.index.remove_document(doc_id);

        debug!(
            scope = %self.scope,
            doc_id = %doc_id,
            chunks = document.chunk_count(),
            vectors = removed,
            "Deleted document"
        );

        Ok(document.chunk_count())
    }
}
