//! Domain layer - Core business logic and entities

pub mod embedding;
pub mod error;
pub mod ingestion;
pub mod knowledge_base;
pub mod retrieval;

pub use embedding::{EmbeddingProvider, RetryConfig, cosine_similarity};
pub use error::DomainError;
pub use ingestion::{
    ChunkingConfig, ChunkingStrategy, DocumentParser, IngestRequest, IngestionSummary,
    ParsedDocument, ParserInput, TextChunk,
};
pub use knowledge_base::{
    Chunk, ChunkRef, Document, DocumentSummary, IndexHit, Scope, SearchResult, StagedDocument,
};
pub use retrieval::{
    DocumentChunksResponse, DocumentListResponse, DocumentResponse, QueryLimits, QueryPlan,
    QueryRequest, QueryResponse, SimilarityResponse,
};
