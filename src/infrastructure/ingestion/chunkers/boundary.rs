//! Greedy boundary-seeking chunking strategy

use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

use crate::domain::DomainError;
use crate::domain::ingestion::{ChunkingConfig, ChunkingStrategy, TextChunk};

/// Kind of break a chunk was cut at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    Paragraph,
    Sentence,
    Whitespace,
    Hard,
    EndOfText,
}

/// Chunking strategy that scans forward greedily and cuts each window at the
/// best natural break inside a lookback window before the size limit.
///
/// Breaks are preferred in the order paragraph, sentence, whitespace. When
/// none exists the window is hard cut at `max_chunk_chars`. Chunks are exact
/// slices of the input, and each chunk after the first starts exactly
/// `overlap_chars` characters before the end of its predecessor.
#[derive(Debug, Clone, Default)]
pub struct BoundaryChunker;

impl BoundaryChunker {
    /// Create a new boundary chunker
    pub fn new() -> Self {
        Self
    }

    /// Find the cut position (char index, exclusive) for the window `[start, hard_end)`.
    ///
    /// Any returned cut is strictly greater than `floor`, which keeps every
    /// chunk longer than the overlap so the scan always advances.
    fn find_cut(
        text: &str,
        offsets: &[usize],
        floor: usize,
        hard_end: usize,
        lookback: usize,
    ) -> (usize, BoundaryKind) {
        let window_start = floor.max(hard_end.saturating_sub(lookback));

        if window_start >= hard_end {
            return (hard_end, BoundaryKind::Hard);
        }

        let byte_lo = offsets[window_start];
        let window = &text[byte_lo..offsets[hard_end]];

        let candidates = [
            (Self::paragraph_break(window), BoundaryKind::Paragraph),
            (Self::sentence_break(window), BoundaryKind::Sentence),
            (Self::whitespace_break(window), BoundaryKind::Whitespace),
        ];

        for (byte_cut, kind) in candidates {
            let Some(byte_cut) = byte_cut else { continue };

            if let Ok(cut) = offsets.binary_search(&(byte_lo + byte_cut)) {
                if cut > floor && cut <= hard_end {
                    return (cut, kind);
                }
            }
        }

        (hard_end, BoundaryKind::Hard)
    }

    /// Byte position just after the last blank-line run in the window
    fn paragraph_break(window: &str) -> Option<usize> {
        let pos = window.rfind("\n\n")?;
        let run = window[pos..].bytes().take_while(|b| *b == b'\n').count();

        Some(pos + run)
    }

    /// Byte position where the last complete sentence in the window ends
    fn sentence_break(window: &str) -> Option<usize> {
        window
            .split_sentence_bound_indices()
            .map(|(idx, _)| idx)
            .filter(|idx| *idx > 0)
            .last()
    }

    /// Byte position just after the last whitespace character in the window
    fn whitespace_break(window: &str) -> Option<usize> {
        window
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(idx, c)| idx + c.len_utf8())
    }
}

impl ChunkingStrategy for BoundaryChunker {
    fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<TextChunk>, DomainError> {
        config.validate()?;

        if content.trim().is_empty() {
            return Err(DomainError::empty_input("cannot chunk blank text"));
        }

        // Byte offset of every char, plus the end of the text
        let offsets: Vec<usize> = content
            .char_indices()
            .map(|(idx, _)| idx)
            .chain(std::iter::once(content.len()))
            .collect();
        let total_chars = offsets.len() - 1;

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let hard_end = (start + config.max_chunk_chars).min(total_chars);

            let (end, kind) = if hard_end == total_chars {
                (total_chars, BoundaryKind::EndOfText)
            } else {
                Self::find_cut(
                    content,
                    &offsets,
                    start + config.overlap_chars,
                    hard_end,
                    config.lookback_chars,
                )
            };

            trace!(ordinal = chunks.len(), start, end, boundary = ?kind, "Chunk cut");

            chunks.push(TextChunk::new(
                chunks.len(),
                &content[offsets[start]..offsets[end]],
                start,
                end,
            ));

            if end >= total_chars {
                break;
            }

            start = end - config.overlap_chars;
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "boundary"
    }
}
