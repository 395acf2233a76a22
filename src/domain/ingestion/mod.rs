//! Document ingestion domain types and traits
//!
//! This module provides:
//! - `DocumentParser` trait for decoding uploaded documents into text
//! - `ChunkingStrategy` trait for splitting text into ordered chunks
//! - Request and summary types for the ingestion pipeline

pub mod chunker;
pub mod parser;
pub mod pipeline;
pub mod validation;

// Re-export main types
pub use chunker::{ChunkingConfig, ChunkingStrategy, TextChunk, merge_chunk_texts};
pub use parser::{DocumentParser, ParsedDocument, ParserInput};
pub use pipeline::{IngestRequest, IngestionSummary};
pub use validation::{
    DEFAULT_UPLOAD_FILENAME, MAX_FILENAME_LENGTH, detect_mime_from_filename, validate_text_body,
    validate_text_filename,
};
