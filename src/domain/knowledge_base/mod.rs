//! Knowledge Base domain - scoped documents, chunks and search hits

mod document;
mod scope;
mod search;

pub use document::{Chunk, DEFAULT_CONTENT_TYPE, Document, DocumentSummary, StagedDocument};
pub use scope::{MAX_SCOPE_ID_LENGTH, Scope};
pub use search::{ChunkRef, IndexHit, SearchResult};
