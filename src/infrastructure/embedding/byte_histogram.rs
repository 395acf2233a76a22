//! Deterministic local embedding provider

use async_trait::async_trait;

use crate::domain::DomainError;
use crate::domain::embedding::{EmbeddingProvider, l2_normalize};

/// Default dimension of the local provider
pub const DEFAULT_LOCAL_DIMENSION: usize = 128;

/// Local embedder that needs no external service.
///
/// Each UTF-8 byte of the text increments bucket `byte % dimension`, and the
/// histogram is L2-normalized. Texts sharing many characters score close to
/// each other, which is enough for development and tests.
#[derive(Debug, Clone)]
pub struct ByteHistogramEmbeddingProvider {
    dimension: usize,
}

impl ByteHistogramEmbeddingProvider {
    pub fn new(dimension: usize) -> Result<Self, DomainError> {
        if dimension == 0 {
            return Err(DomainError::configuration(
                "embedding dimension must be greater than 0",
            ));
        }

        Ok(Self { dimension })
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut histogram = vec![0.0f32; self.dimension];

        for byte in text.bytes() {
            histogram[byte as usize % self.dimension] += 1.0;
        }

        l2_normalize(&histogram)
    }
}

impl Default for ByteHistogramEmbeddingProvider {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_LOCAL_DIMENSION,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for ByteHistogramEmbeddingProvider {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn model_id(&self) -> String {
        format!("byte-histogram-{}", self.dimension)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::{cosine_similarity, l2_norm};

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_vectors_have_configured_dimension() {
        let provider = ByteHistogramEmbeddingProvider::new(64).unwrap();

        let vectors = provider.embed_batch(&texts(&["hello", "world"])).await.unwrap();

        assert_eq!(vectors.len(), 2);
        assert!(vectors.iter().all(|v| v.len() == 64));
        assert_eq!(provider.model_id(), "byte-histogram-64");
    }

    #[tokio::test]
    async fn test_vectors_are_unit_length() {
        let provider = ByteHistogramEmbeddingProvider::default();

        let vectors = provider.embed_batch(&texts(&["Some text"])).await.unwrap();

        assert!((l2_norm(&vectors[0]) - 1.0).abs() < 0.0001);
    }

    #[tokio::test]
    async fn test_empty_text_is_zero_vector() {
        let provider = ByteHistogramEmbeddingProvider::default();

        let vectors = provider.embed_batch(&texts(&[""])).await.unwrap();

        assert!(vectors[0].iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn test_deterministic_and_similar_for_shared_content() {
        let provider = ByteHistogramEmbeddingProvider::default();

        let vectors = provider
            .embed_batch(&texts(&[
                "pre-commit ingestion",
                "pre-commit ingestion",
                "zzzzqqqq",
            ]))
            .await
            .unwrap();

        assert_eq!(vectors[0], vectors[1]);
        assert!(
            cosine_similarity(&vectors[0], &vectors[1]) > cosine_similarity(&vectors[0], &vectors[2])
        );
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(ByteHistogramEmbeddingProvider::new(0).is_err());
    }
}
