//! Document ingestion infrastructure
//!
//! This module provides implementations for document parsing and chunking.

pub mod chunkers;
pub mod parsers;

// Re-export parsers
pub use parsers::PlainTextParser;

// Re-export chunkers
pub use chunkers::{BoundaryChunker, BoundaryKind};
