//! Query engine and document management for scoped knowledge bases

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::DomainError;
use crate::domain::embedding::RetryConfig;
use crate::domain::knowledge_base::{DocumentSummary, Scope};
use crate::domain::retrieval::{
    ChunkView, DeleteDocumentResponse, DocumentChunksResponse, DocumentListResponse,
    DocumentResponse, QueryLimits, QueryPlan, QueryRequest, QueryResponse, SimilarityResponse,
};
use crate::infrastructure::embedding::EmbedderAdapter;
use crate::infrastructure::knowledge_base::ScopeRegistry;
use crate::infrastructure::observability::record_query;

/// Answers similarity and document queries.
///
/// Queries never create partitions. An unknown scope behaves as an empty one.
pub struct QueryService {
    registry: Arc<ScopeRegistry>,
    embedder: EmbedderAdapter,
    limits: QueryLimits,
    retry: RetryConfig,
}

impl std::fmt::Debug for QueryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryService")
            .field("model", &self.embedder.model_id())
            .field("limits", &self.limits)
            .finish()
    }
}

impl QueryService {
    pub fn new(registry: Arc<ScopeRegistry>, embedder: EmbedderAdapter) -> Self {
        Self {
            registry,
            embedder,
            limits: QueryLimits::default(),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_limits(mut self, limits: QueryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Validate a request and answer it in the selected mode
    pub async fn query(&self, request: QueryRequest) -> Result<QueryResponse, DomainError> {
        let plan = request.plan(&self.limits)?;
        let mode = plan.mode();
        let started = Instant::now();

        let result = match plan {
            QueryPlan::Similarity {
                scope,
                query,
                top_k,
                min_score,
            } => self
                .similarity(&scope, &query, top_k, min_score)
                .await
                .map(QueryResponse::Similarity),
            QueryPlan::Document {
                scope,
                doc_id,
                full,
            } => self
                .document(&scope, &doc_id, full)
                .await
                .map(QueryResponse::Document),
        };

        record_query(mode, result.is_ok(), started.elapsed());

        result
    }

    /// Top-K chunks of the scope most similar to `query`
    pub async fn similarity(
        &self,
        scope: &Scope,
        query: &str,
        top_k: usize,
        min_score: f32,
    ) -> Result<SimilarityResponse, DomainError> {
        let results = match self.registry.get(scope).await {
            Some(partition) => {
                // Embed before taking the lock
                let vector = self.embedder.embed_one_with_retry(query, &self.retry).await?;
                partition.read().await.search(&vector, top_k as i64, min_score)?
            }
            None => Vec::new(),
        };

        debug!(
            tenant_id = %scope.tenant_id(),
            kb_id = %scope.kb_id(),
            top_k,
            min_score,
            results = results.len(),
            "Similarity query"
        );

        Ok(SimilarityResponse {
            tenant_id: scope.tenant_id().to_string(),
            kb_id: scope.kb_id().to_string(),
            model: self.embedder.model_id(),
            top_k,
            min_score,
            results,
        })
    }

    /// A document's chunks, plus its reconstructed text when `full` is set
    pub async fn document(
        &self,
        scope: &Scope,
        doc_id: &str,
        full: bool,
    ) -> Result<DocumentResponse, DomainError> {
        let partition = self
            .registry
            .get(scope)
            .await
            .ok_or_else(|| document_not_found(doc_id))?;
        let partition = partition.read().await;
        let store = partition.store();

        let document = store.get_by_id(doc_id)?;
        let chunks: Vec<ChunkView> = store
            .chunks_for(doc_id)?
            .into_iter()
            .map(ChunkView::from)
            .collect();

        let document_text = if full {
            Some(store.reconstruct_full_text(doc_id)?)
        } else {
            None
        };

        debug!(
            tenant_id = %scope.tenant_id(),
            kb_id = %scope.kb_id(),
            doc_id = %doc_id,
            full,
            "Document query"
        );

        Ok(DocumentResponse {
            tenant_id: scope.tenant_id().to_string(),
            kb_id: scope.kb_id().to_string(),
            doc_id: document.id().to_string(),
            filename: document.filename().to_string(),
            chunk_count: chunks.len(),
            chunks,
            document_text,
        })
    }

    /// One page of the scope's documents in ingestion order
    pub async fn list_documents(
        &self,
        scope: &Scope,
        page: usize,
        size: usize,
    ) -> Result<DocumentListResponse, DomainError> {
        let offset = page.saturating_sub(1).saturating_mul(size);

        let (items, total) = match self.registry.get(scope).await {
            Some(partition) => {
                let partition = partition.read().await;
                let (docs, total) = partition.store().list(offset, size);
                (docs.into_iter().map(DocumentSummary::from).collect(), total)
            }
            None => (Vec::new(), 0),
        };

        Ok(DocumentListResponse {
            tenant_id: scope.tenant_id().to_string(),
            kb_id: scope.kb_id().to_string(),
            page,
            size,
            total,
            items,
        })
    }

    /// Stored chunks of one document, optionally with their vectors
    pub async fn document_chunks(
        &self,
        scope: &Scope,
        doc_id: &str,
        include_vectors: bool,
    ) -> Result<DocumentChunksResponse, DomainError> {
        let partition = self
            .registry
            .get(scope)
            .await
            .ok_or_else(|| document_not_found(doc_id))?;
        let partition = partition.read().await;
        let chunks = partition.store().chunks_for(doc_id)?;

        let (dimension, vectors) = if include_vectors {
            (
                Some(partition.index().dimension()),
                Some(chunks.iter().map(|c| c.embedding.clone()).collect()),
            )
        } else {
            (None, None)
        };

        Ok(DocumentChunksResponse {
            tenant_id: scope.tenant_id().to_string(),
            kb_id: scope.kb_id().to_string(),
            doc_id: doc_id.to_string(),
            chunks: chunks.into_iter().map(ChunkView::from).collect(),
            dimension,
            vectors,
        })
    }

    /// Remove a document with all its chunks and vectors
    pub async fn delete_document(
        &self,
        scope: &Scope,
        doc_id: &str,
    ) -> Result<DeleteDocumentResponse, DomainError> {
        let partition = self
            .registry
            .get(scope)
            .await
            .ok_or_else(|| document_not_found(doc_id))?;

        let deleted = partition.write().await.delete_document(doc_id)?;

        info!(
            tenant_id = %scope.tenant_id(),
            kb_id = %scope.kb_id(),
            doc_id = %doc_id,
            chunks = deleted,
            "Document deleted"
        );

        Ok(DeleteDocumentResponse::new(scope, doc_id, deleted))
    }
}

fn document_not_found(doc_id: &str) -> DomainError {
    DomainError::not_found(format!("Document '{}' not found", doc_id))
}

/// Trait for query service operations
#[async_trait]
pub trait QueryServiceTrait: Send + Sync + std::fmt::Debug {
    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, DomainError>;

    async fn list_documents(
        &self,
        scope: &Scope,
        page: usize,
        size: usize,
    ) -> Result<DocumentListResponse, DomainError>;

    async fn document_chunks(
        &self,
        scope: &Scope,
        doc_id: &str,
        include_vectors: bool,
    ) -> Result<DocumentChunksResponse, DomainError>;

    async fn delete_document(
        &self,
        scope: &Scope,
        doc_id: &str,
    ) -> Result<DeleteDocumentResponse, DomainError>;
}

#[async_trait]
impl QueryServiceTrait for QueryService {
    async fn query(&self, request: QueryRequest) -> Result<QueryResponse, DomainError> {
        QueryService::query(self, request).await
    }

    async fn list_documents(
        &self,
        scope: &Scope,
        page: usize,
        size: usize,
    ) -> Result<DocumentListResponse, DomainError> {
        QueryService::list_documents(self, scope, page, size).await
    }

    async fn document_chunks(
        &self,
        scope: &Scope,
        doc_id: &str,
        include_vectors: bool,
    ) -> Result<DocumentChunksResponse, DomainError> {
        QueryService::document_chunks(self, scope, doc_id, include_vectors).await
    }

    async fn delete_document(
        &self,
        scope: &Scope,
        doc_id: &str,
    ) -> Result<DeleteDocumentResponse, DomainError> {
        QueryService::delete_document(self, scope, doc_id).await
    }
}
