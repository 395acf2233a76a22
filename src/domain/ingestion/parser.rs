//! Document parser trait and types

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

use super::validation::detect_mime_from_filename;
use crate::domain::DomainError;

/// Input for document parsing
#[derive(Debug, Clone)]
pub struct ParserInput {
    /// Raw document bytes
    pub content: Bytes,
    /// Optional filename for type detection
    pub filename: Option<String>,
    /// Declared content type, if any
    pub content_type: Option<String>,
}

impl ParserInput {
    /// Create input from raw bytes
    pub fn from_bytes(content: impl Into<Bytes>) -> Self {
        Self {
            content: content.into(),
            filename: None,
            content_type: None,
        }
    }

    /// Create input from text content
    pub fn from_text(content: impl Into<String>) -> Self {
        Self::from_bytes(Bytes::from(content.into()))
    }

    /// Set the filename
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Set the declared content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Declared MIME essence (`text/plain; charset=utf-8` becomes `text/plain`)
    pub fn mime_essence(&self) -> Option<String> {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase())
            .filter(|ct| !ct.is_empty())
    }

    /// Lowercased filename extension, if any
    pub fn extension(&self) -> Option<String> {
        self.filename
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Result of parsing a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Normalized text content
    pub content: String,
    /// MIME type the content was decoded as
    pub mime_type: String,
}

impl ParsedDocument {
    pub fn new(content: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Trait for document parsers
#[async_trait]
pub trait DocumentParser: Send + Sync + Debug {
    /// Get supported file extensions (e.g., ["txt", "text"])
    fn supported_extensions(&self) -> &[&str];

    /// Get supported MIME types (e.g., ["text/plain"])
    fn supported_mime_types(&self) -> &[&str];

    /// Decode a document into normalized text
    async fn parse(&self, input: ParserInput) -> Result<ParsedDocument, DomainError>;

    /// Check if this parser supports a given extension
    fn supports_extension(&self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }

    /// Check if this parser supports a given MIME type
    fn supports_mime(&self, mime_type: &str) -> bool {
        self.supported_mime_types()
            .iter()
            .any(|mime| mime.eq_ignore_ascii_case(mime_type))
    }

    /// Whether the input can be handled, by declared type, extension or guessed type
    fn accepts(&self, input: &ParserInput) -> bool {
        if input.mime_essence().is_some_and(|mime| self.supports_mime(&mime)) {
            return true;
        }

        if input.extension().is_some_and(|ext| self.supports_extension(&ext)) {
            return true;
        }

        input
            .filename
            .as_deref()
            .and_then(detect_mime_from_filename)
            .is_some_and(|mime| self.supports_mime(&mime))
    }
}
