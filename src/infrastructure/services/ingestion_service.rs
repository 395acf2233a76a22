//! Document ingestion service for scoped knowledge bases

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::domain::DomainError;
use crate::domain::embedding::RetryConfig;
use crate::domain::ingestion::{
    ChunkingConfig, ChunkingStrategy, DocumentParser, IngestRequest, IngestionSummary,
    ParserInput,
};
use crate::domain::knowledge_base::{Chunk, Document, StagedDocument};
use crate::infrastructure::embedding::EmbedderAdapter;
use crate::infrastructure::ingestion::{BoundaryChunker, PlainTextParser};
use crate::infrastructure::knowledge_base::ScopeRegistry;
use crate::infrastructure::observability::record_ingestion;

/// Turns uploaded bytes into a fully indexed document.
///
/// Parsing, chunking and embedding all happen before any lock is taken. The
/// finished document is then committed to its scope in one step, so a failure
/// at any stage leaves nothing behind.
pub struct IngestionService {
    registry: Arc<ScopeRegistry>,
    embedder: EmbedderAdapter,
    parser: Arc<dyn DocumentParser>,
    chunker: Arc<dyn ChunkingStrategy>,
    chunking: ChunkingConfig,
    retry: RetryConfig,
}

impl std::fmt::Debug for IngestionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionService")
            .field("model", &self.embedder.model_id())
            .field("dimension", &self.embedder.dimension())
            .field("chunker", &self.chunker.name())
            .field("chunking", &self.chunking)
            .finish()
    }
}

impl IngestionService {
    pub fn new(
        registry: Arc<ScopeRegistry>,
        embedder: EmbedderAdapter,
        chunking: ChunkingConfig,
    ) -> Self {
        Self {
            registry,
            embedder,
            parser: Arc::new(PlainTextParser::new()),
            chunker: Arc::new(BoundaryChunker::new()),
            chunking,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_chunker(mut self, chunker: Arc<dyn ChunkingStrategy>) -> Self {
        self.chunker = chunker;
        self
    }

    /// Ingest one document into its scope
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestionSummary, DomainError> {
        let started = Instant::now();
        let tenant_id = request.scope.tenant_id().to_string();
        let kb_id = request.scope.kb_id().to_string();

        let result = self.run(request).await;

        let chunks = result.as_ref().map(|s| s.chunks).unwrap_or_default();
        record_ingestion(result.is_ok(), chunks, started.elapsed());

        if let Err(e) = &result {
            warn!(tenant_id = %tenant_id, kb_id = %kb_id, error = %e, "Ingestion failed");
        }

        result
    }

    async fn run(&self, request: IngestRequest) -> Result<IngestionSummary, DomainError> {
        let IngestRequest {
            scope,
            filename,
            content,
            content_type,
        } = request;

        let mut input = ParserInput::from_bytes(content).with_filename(&filename);

        if let Some(content_type) = &content_type {
            input = input.with_content_type(content_type);
        }

        if !self.parser.accepts(&input) {
            return Err(DomainError::unsupported_media_type(format!(
                "cannot ingest '{}' as {}",
                filename,
                input.mime_essence().unwrap_or_else(|| "unknown type".to_string())
            )));
        }

        let parsed = self.parser.parse(input).await?;
        let pieces = self.chunker.chunk(&parsed.content, &self.chunking)?;

        debug!(
            tenant_id = %scope.tenant_id(),
            kb_id = %scope.kb_id(),
            filename = %filename,
            chunks = pieces.len(),
            chunker = self.chunker.name(),
            "Chunked document"
        );

        let texts: Vec<String> = pieces.iter().map(|p| p.content.clone()).collect();
        let vectors = self.embedder.embed_with_retry(&texts, &self.retry).await?;

        let document = Document::new(scope.clone(), filename, parsed.content)
            .with_content_type(parsed.mime_type);
        let doc_id = document.id().to_string();

        let chunks = pieces
            .into_iter()
            .zip(vectors)
            .map(|(piece, embedding)| Chunk {
                id: Chunk::id_for(&doc_id, piece.ordinal),
                doc_id: doc_id.clone(),
                scope: scope.clone(),
                ordinal: piece.ordinal,
                text: piece.content,
                char_start: piece.char_start,
                char_end: piece.char_end,
                embedding,
            })
            .collect();

        let staged = StagedDocument::new(document, chunks);
        let chunk_count = staged.chunks.len();

        let partition = self.registry.get_or_create(&scope).await;
        partition.write().await.commit(staged)?;

        info!(
            tenant_id = %scope.tenant_id(),
            kb_id = %scope.kb_id(),
            doc_id = %doc_id,
            chunks = chunk_count,
            "Document ingested"
        );

        Ok(IngestionSummary::new(
            doc_id,
            chunk_count,
            self.embedder.dimension(),
        ))
    }
}

/// Trait for ingestion service operations
#[async_trait]
pub trait IngestionServiceTrait: Send + Sync + std::fmt::Debug {
    async fn ingest(&self, request: IngestRequest) -> Result<IngestionSummary, DomainError>;
}

#[async_trait]
impl IngestionServiceTrait for IngestionService {
    async fn ingest(&self, request: IngestRequest) -> Result<IngestionSummary, DomainError> {
        IngestionService::ingest(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::knowledge_base::Scope;
    use crate::infrastructure::embedding::ByteHistogramEmbeddingProvider;

    const SAMPLE: &str = "This is a small text...\nIt should produce vector embeddings.\n";

    fn scope() -> Scope {
        Scope::new("tenant1", "kb1").unwrap()
    }

    fn service(registry: Arc<ScopeRegistry>, chunking: ChunkingConfig) -> IngestionService {
        let provider = Arc::new(ByteHistogramEmbeddingProvider::new(16).unwrap());
        let embedder = EmbedderAdapter::new(provider, 16, 8).unwrap();

        IngestionService::new(registry, embedder, chunking)
    }

    #[tokio::test]
    async fn test_ingest_reports_chunks_and_dimension() {
        let registry = Arc::new(ScopeRegistry::new(16));
        let service = service(registry.clone(), ChunkingConfig::default());

        let summary = service
            .ingest(IngestRequest::new(scope(), "sample.txt", SAMPLE))
            .await
            .unwrap();

        assert!(!summary.doc_id.is_empty());
        assert!(summary.chunks >= 1);
        assert_eq!(summary.dimension, 16);

        let partition = registry.get(&scope()).await.unwrap();
        let partition = partition.read().await;
        let doc = partition.store().get_by_id(&summary.doc_id).unwrap();

        assert_eq!(doc.chunk_count(), summary.chunks);
        assert_eq!(doc.filename(), "sample.txt");
        assert_eq!(partition.index().len(), summary.chunks);
    }

    #[tokio::test]
    async fn test_round_trip_without_overlap_is_exact() {
        let registry = Arc::new(ScopeRegistry::new(16));
        let service = service(registry.clone(), ChunkingConfig::new(40, 0));
        let text = "Alpha beta gamma. Delta epsilon zeta.\n\nEta theta iota kappa lambda mu nu xi omicron pi rho.";

        let summary = service
            .ingest(IngestRequest::new(scope(), "greek.txt", text))
            .await
            .unwrap();

        assert!(summary.chunks > 1);

        let partition = registry.get(&scope()).await.unwrap();
        let rebuilt = partition
            .read()
            .await
            .store()
            .reconstruct_full_text(&summary.doc_id)
            .unwrap();

        assert_eq!(rebuilt, text);
    }

    #[tokio::test]
    async fn test_round_trip_with_overlap() {
        let registry = Arc::new(ScopeRegistry::new(16));
        let service = service(registry.clone(), ChunkingConfig::new(30, 8));
        let text = "one two three four five six seven eight nine ten eleven twelve thirteen";

        let summary = service
            .ingest(IngestRequest::new(scope(), "numbers.txt", text))
            .await
            .unwrap();

        let partition = registry.get(&scope()).await.unwrap();
        let rebuilt = partition
            .read()
            .await
            .store()
            .reconstruct_full_text(&summary.doc_id)
            .unwrap();

        assert_eq!(rebuilt, text);
    }

    #[tokio::test]
    async fn test_unsupported_media_type() {
        let registry = Arc::new(ScopeRegistry::new(16));
        let service = service(registry.clone(), ChunkingConfig::default());

        let err = service
            .ingest(
                IngestRequest::new(scope(), "report.pdf", "%PDF-1.4")
                    .with_content_type("application/pdf"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::UnsupportedMediaType { .. }));
        assert_eq!(registry.scope_count().await, 0);
    }

    #[tokio::test]
    async fn test_blank_text_is_unsupported() {
        let registry = Arc::new(ScopeRegistry::new(16));
        let service = service(registry, ChunkingConfig::default());

        let err = service
            .ingest(IngestRequest::new(scope(), "blank.txt", "  \n\t "))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::UnsupportedMediaType { .. }));
    }

    #[tokio::test]
    async fn test_embedding_failure_leaves_no_document() {
        let mut mock = MockEmbeddingProvider::new();
        mock.expect_dimension().return_const(16usize);
        mock.expect_model_id().return_const("mock".to_string());
        mock.expect_embed_batch()
            .times(2)
            .returning(|_: &[String]| Err(DomainError::embedding_unavailable("down")));

        let registry = Arc::new(ScopeRegistry::new(16));
        let embedder = EmbedderAdapter::new(Arc::new(mock), 16, 8).unwrap();
        let service = IngestionService::new(registry.clone(), embedder, ChunkingConfig::default())
            .with_retry(RetryConfig::new(1).with_initial_delay(1));

        let err = service
            .ingest(IngestRequest::new(scope(), "sample.txt", SAMPLE))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::EmbeddingUnavailable { .. }));
        assert!(registry.get(&scope()).await.is_none());
    }

    #[tokio::test]
    async fn test_repeated_ingestion_creates_new_documents() {
        let registry = Arc::new(ScopeRegistry::new(16));
        let service = service(registry.clone(), ChunkingConfig::default());

        let first = service
            .ingest(IngestRequest::new(scope(), "a.txt", SAMPLE))
            .await
            .unwrap();
        let second = service
            .ingest(IngestRequest::new(scope(), "a.txt", SAMPLE))
            .await
            .unwrap();

        assert_ne!(first.doc_id, second.doc_id);

        let partition = registry.get(&scope()).await.unwrap();
        assert_eq!(partition.read().await.store().len(), 2);
    }
}
