//! Plain text document parser

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::ingestion::{DocumentParser, ParsedDocument, ParserInput};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Parser for plain text files.
///
/// Decodes UTF-8 (dropping a leading BOM) and normalizes line endings to `\n`.
/// The text is otherwise kept verbatim so it can be reconstructed exactly.
#[derive(Debug, Clone, Default)]
pub struct PlainTextParser;

impl PlainTextParser {
    /// Create a new plain text parser
    pub fn new() -> Self {
        Self
    }

    fn normalize_line_endings(text: &str) -> String {
        if !text.contains('\r') {
            return text.to_string();
        }

        text.replace("\r\n", "\n").replace('\r', "\n")
    }
}

#[async_trait]
impl DocumentParser for PlainTextParser {
    fn supported_extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn supported_mime_types(&self) -> &[&str] {
        &["text/plain"]
    }

    async fn parse(&self, input: ParserInput) -> Result<ParsedDocument, DomainError> {
        let raw = input
            .content
            .strip_prefix(UTF8_BOM)
            .unwrap_or(&input.content[..]);

        let decoded = std::str::from_utf8(raw).map_err(|e| {
            DomainError::unsupported_media_type(format!("content is not valid UTF-8 text: {}", e))
        })?;

        let content = Self::normalize_line_endings(decoded);

        if content.trim().is_empty() {
            return Err(DomainError::unsupported_media_type(
                "decoded text is empty",
            ));
        }

        Ok(ParsedDocument::new(content, "text/plain"))
    }
}
