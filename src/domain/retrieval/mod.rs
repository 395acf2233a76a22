//! Retrieval domain - query validation and response shapes

mod request;
mod response;

pub use request::{
    DEFAULT_PAGE, DEFAULT_PAGE_SIZE, DEFAULT_TOP_K, MAX_TOP_K, QueryLimits, QueryPlan,
    QueryRequest, normalize_page,
};
pub use response::{
    ChunkView, DeleteDocumentResponse, DocumentChunksResponse, DocumentListResponse,
    DocumentResponse, QueryResponse, SimilarityResponse,
};
