use thiserror::Error;

/// Core domain errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Empty input: {message}")]
    EmptyInput { message: String },

    #[error("Unsupported media type: {message}")]
    UnsupportedMediaType { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding unavailable: {message}")]
    EmbeddingUnavailable { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn empty_input(message: impl Into<String>) -> Self {
        Self::EmptyInput {
            message: message.into(),
        }
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::UnsupportedMediaType {
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    pub fn embedding_unavailable(message: impl Into<String>) -> Self {
        Self::EmbeddingUnavailable {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Only an unreachable or misbehaving embedder is worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::EmbeddingUnavailable { .. })
    }

    /// Whether the error was caused by the caller rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::BadRequest { .. }
                | Self::NotFound { .. }
                | Self::EmptyInput { .. }
                | Self::UnsupportedMediaType { .. }
                | Self::InvalidArgument { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Document 'doc-1' not found");
        assert_eq!(error.to_string(), "Not found: Document 'doc-1' not found");
    }

    #[test]
    fn test_bad_request_error() {
        let error = DomainError::bad_request("tenantId is required");
        assert_eq!(error.to_string(), "Bad request: tenantId is required");
    }

    #[test]
    fn test_dimension_mismatch_error() {
        let error = DomainError::dimension_mismatch(128, 64);
        assert_eq!(
            error.to_string(),
            "Dimension mismatch: expected 128, got 64"
        );
    }

    #[test]
    fn test_only_embedding_unavailable_is_retryable() {
        assert!(DomainError::embedding_unavailable("timeout").is_retryable());
        assert!(!DomainError::dimension_mismatch(1, 2).is_retryable());
        assert!(!DomainError::internal("boom").is_retryable());
        assert!(!DomainError::bad_request("nope").is_retryable());
    }

    #[test]
    fn test_client_errors() {
        assert!(DomainError::empty_input("blank").is_client_error());
        assert!(DomainError::unsupported_media_type("pdf").is_client_error());
        assert!(DomainError::invalid_argument("topK").is_client_error());
        assert!(!DomainError::embedding_unavailable("down").is_client_error());
        assert!(!DomainError::configuration("bad").is_client_error());
    }
}
