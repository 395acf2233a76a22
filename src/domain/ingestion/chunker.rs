//! Chunking strategy trait and types

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Configuration for chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub max_chunk_chars: usize,
    /// Characters shared between consecutive chunks
    pub overlap_chars: usize,
    /// How far back from the hard limit a natural boundary may be taken
    pub lookback_chars: usize,
}

impl ChunkingConfig {
    /// Create a new chunking configuration
    pub fn new(max_chunk_chars: usize, overlap_chars: usize) -> Self {
        Self {
            max_chunk_chars,
            overlap_chars,
            lookback_chars: (max_chunk_chars / 4).max(1),
        }
    }

    /// Set the boundary lookback window
    pub fn with_lookback_chars(mut self, lookback_chars: usize) -> Self {
        self.lookback_chars = lookback_chars;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.max_chunk_chars == 0 {
            return Err(DomainError::configuration(
                "max_chunk_chars must be greater than 0",
            ));
        }

        if self.overlap_chars >= self.max_chunk_chars {
            return Err(DomainError::configuration(
                "overlap_chars must be less than max_chunk_chars",
            ));
        }

        if self.lookback_chars > self.max_chunk_chars {
            return Err(DomainError::configuration(
                "lookback_chars must be less than or equal to max_chunk_chars",
            ));
        }

        Ok(())
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_chars: 800,
            overlap_chars: 0,
            lookback_chars: 200,
        }
    }
}

/// A contiguous slice of the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    /// Position of this chunk in the document (0-based, contiguous)
    pub ordinal: usize,
    /// Raw chunk text, an exact slice of the source
    pub content: String,
    /// Character offset where this chunk starts
    pub char_start: usize,
    /// Character offset where this chunk ends (exclusive)
    pub char_end: usize,
}

impl TextChunk {
    pub fn new(ordinal: usize, content: impl Into<String>, char_start: usize, char_end: usize) -> Self {
        Self {
            ordinal,
            content: content.into(),
            char_start,
            char_end,
        }
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.char_end - self.char_start
    }
}

/// Trait for chunking strategies
pub trait ChunkingStrategy: Send + Sync + Debug {
    /// Split content into ordered chunks. Blank content is an `EmptyInput` error.
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<TextChunk>, DomainError>;

    /// Get the strategy name
    fn name(&self) -> &'static str;
}

/// Rebuild the source text from `(char_start, text)` pairs given in ordinal order.
///
/// Every non-first piece has its prefix dropped up to the furthest character
/// already emitted, so windows produced with an overlap are stitched back
/// without duplication. Disjoint windows are concatenated unchanged.
pub fn merge_chunk_texts<'a, I>(pieces: I) -> String
where
    I: IntoIterator<Item = (usize, &'a str)>,
{
    let mut out = String::new();
    let mut covered: Option<usize> = None;

    for (char_start, text) in pieces {
        let char_len = text.chars().count();
        let char_end = char_start + char_len;

        let skip = match covered {
            Some(end) => end.saturating_sub(char_start).min(char_len),
            None => 0,
        };

        let byte_skip = text
            .char_indices()
            .nth(skip)
            .map(|(idx, _)| idx)
            .unwrap_or(text.len());

        out.push_str(&text[byte_skip..]);
        covered = Some(covered.map_or(char_end, |end| end.max(char_end)));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunking_config_default() {
        let config = ChunkingConfig::default();
        assert_eq!(config.max_chunk_chars, 800);
        assert_eq!(config.overlap_chars, 0);
        assert_eq!(config.lookback_chars, 200);
    }

    #[test]
    fn test_chunking_config_validation() {
        assert!(ChunkingConfig::new(100, 50).validate().is_ok());
        assert!(ChunkingConfig::new(0, 0).validate().is_err());
        assert!(ChunkingConfig::new(100, 100).validate().is_err());
        assert!(
            ChunkingConfig::new(100, 0)
                .with_lookback_chars(101)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_merge_disjoint_pieces() {
        let merged = merge_chunk_texts(vec![(0, "Hello "), (6, "wide "), (11, "world")]);
        assert_eq!(merged, "Hello wide world");
    }

    #[test]
    fn test_merge_overlapping_pieces() {
        // "abcdefghij" chunked with max 4, overlap 2
        let merged = merge_chunk_texts(vec![(0, "abcd"), (2, "cdef"), (4, "efgh"), (6, "ghij")]);
        assert_eq!(merged, "abcdefghij");
    }

    #[test]
    fn test_merge_multibyte_overlap() {
        let merged = merge_chunk_texts(vec![(0, "héllo"), (3, "lo wörld")]);
        assert_eq!(merged, "héllo wörld");
    }

    #[test]
    fn test_merge_empty() {
        let merged = merge_chunk_texts(Vec::<(usize, &str)>::new());
        assert!(merged.is_empty());
    }
}
