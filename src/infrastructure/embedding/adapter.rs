//! Embedder adapter enforcing the deployment's vector contract

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::DomainError;
use crate::domain::embedding::{EmbeddingProvider, RetryConfig};
use crate::infrastructure::observability::record_embedding_retry;

/// Wraps an [`EmbeddingProvider`] so every caller gets exactly one finite
/// vector of the configured dimension per input text, in input order.
#[derive(Debug, Clone)]
pub struct EmbedderAdapter {
    provider: Arc<dyn EmbeddingProvider>,
    dimension: usize,
    batch_size: usize,
}

impl EmbedderAdapter {
    /// Build an adapter. A provider declaring a different dimension than the
    /// deployment is a fatal configuration problem.
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        dimension: usize,
        batch_size: usize,
    ) -> Result<Self, DomainError> {
        if dimension == 0 {
            return Err(DomainError::configuration(
                "embedding dimension must be greater than 0",
            ));
        }

        if batch_size == 0 {
            return Err(DomainError::configuration(
                "embedding batch_size must be greater than 0",
            ));
        }

        let declared = provider.dimension();

        if declared != dimension {
            return Err(DomainError::dimension_mismatch(dimension, declared));
        }

        Ok(Self {
            provider,
            dimension,
            batch_size,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn model_id(&self) -> String {
        self.provider.model_id()
    }

    /// Embed all texts, splitting them into provider calls of at most `batch_size`
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            let embedded = self.provider.embed_batch(batch).await?;
            self.check_batch(batch.len(), &embedded)?;
            vectors.extend(embedded);
        }

        debug!(
            texts = texts.len(),
            dimension = self.dimension,
            "Embedded texts"
        );

        Ok(vectors)
    }

    /// Embed a single text
    pub async fn embed_one(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let mut vectors = self.embed(&[text.to_string()]).await?;

        vectors
            .pop()
            .ok_or_else(|| DomainError::embedding_unavailable("embedder returned no vector"))
    }

    /// Embed with bounded exponential backoff on retryable failures
    pub async fn embed_with_retry(
        &self,
        texts: &[String],
        retry: &RetryConfig,
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        let max_attempts = retry.max_retries + 1;
        let mut last_error = None;

        for attempt in 0..max_attempts {
            if attempt > 0 {
                let delay = retry.delay_for_attempt(attempt - 1);
                record_embedding_retry();
                tokio::time::sleep(delay).await;
            }

            match self.embed(texts).await {
                Ok(vectors) => return Ok(vectors),
                Err(e) if e.is_retryable() => {
                    warn!(
                        attempt = attempt + 1,
                        max_attempts,
                        error = %e,
                        "Embedding attempt failed"
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| DomainError::embedding_unavailable("no embedding attempt was made")))
    }

    /// Single-text variant of [`Self::embed_with_retry`]
    pub async fn embed_one_with_retry(
        &self,
        text: &str,
        retry: &RetryConfig,
    ) -> Result<Vec<f32>, DomainError> {
        let mut vectors = self.embed_with_retry(&[text.to_string()], retry).await?;

        vectors
            .pop()
            .ok_or_else(|| DomainError::embedding_unavailable("embedder returned no vector"))
    }

    fn check_batch(&self, expected: usize, vectors: &[Vec<f32>]) -> Result<(), DomainError> {
        if vectors.len() != expected {
            return Err(DomainError::embedding_unavailable(format!(
                "embedder returned {} vectors for {} texts",
                vectors.len(),
                expected
            )));
        }

        for (i, vector) in vectors.iter().enumerate() {
            if vector.len() != self.dimension {
                return Err(DomainError::embedding_unavailable(format!(
                    "vector {} has dimension {}, expected {}",
                    i,
                    vector.len(),
                    self.dimension
                )));
            }

            if vector.iter().any(|x| !x.is_finite()) {
                return Err(DomainError::embedding_unavailable(format!(
                    "vector {} contains non-finite values",
                    i
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use tokio_test::{assert_err, assert_ok};

    fn mock_provider(dimension: usize) -> MockEmbeddingProvider {
        let mut mock = MockEmbeddingProvider::new();
        mock.expect_dimension().return_const(dimension);
        mock.expect_model_id().return_const("mock-model".to_string());
        mock
    }

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("text {}", i)).collect()
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig::new(2).with_initial_delay(1).with_max_delay(2)
    }

    #[test]
    fn test_declared_dimension_mismatch_is_fatal() {
        let err = EmbedderAdapter::new(Arc::new(mock_provider(64)), 128, 8).unwrap_err();

        assert_eq!(err, DomainError::dimension_mismatch(128, 64));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        assert_err!(EmbedderAdapter::new(Arc::new(mock_provider(4)), 4, 0));
    }

    #[tokio::test]
    async fn test_batches_preserve_order() {
        let mut mock = mock_provider(2);
        mock.expect_embed_batch()
            .times(3)
            .returning(|batch: &[String]| {
                Ok(batch
                    .iter()
                    .map(|t| {
                        let n: f32 = t.trim_start_matches("text ").parse().unwrap();
                        vec![n, 1.0]
                    })
                    .collect())
            });

        let adapter = EmbedderAdapter::new(Arc::new(mock), 2, 2).unwrap();
        let vectors = adapter.embed(&texts(5)).await.unwrap();

        let firsts: Vec<f32> = vectors.iter().map(|v| v[0]).collect();
        assert_eq!(firsts, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[tokio::test]
    async fn test_wrong_count_is_unavailable() {
        let mut mock = mock_provider(2);
        mock.expect_embed_batch()
            .returning(|_: &[String]| Ok(vec![vec![1.0, 0.0]]));

        let adapter = EmbedderAdapter::new(Arc::new(mock), 2, 8).unwrap();
        let err = adapter.embed(&texts(2)).await.unwrap_err();

        assert!(matches!(err, DomainError::EmbeddingUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_wrong_dimension_is_unavailable() {
        let mut mock = mock_provider(2);
        mock.expect_embed_batch()
            .returning(|_: &[String]| Ok(vec![vec![1.0, 0.0, 0.0]]));

        let adapter = EmbedderAdapter::new(Arc::new(mock), 2, 8).unwrap();
        let err = adapter.embed_one("hello").await.unwrap_err();

        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_non_finite_is_unavailable() {
        let mut mock = mock_provider(2);
        mock.expect_embed_batch()
            .returning(|_: &[String]| Ok(vec![vec![f32::NAN, 0.0]]));

        let adapter = EmbedderAdapter::new(Arc::new(mock), 2, 8).unwrap();

        assert_err!(adapter.embed_one("hello").await);
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failure() {
        let mut calls = 0;
        let mut mock = mock_provider(2);
        mock.expect_embed_batch()
            .times(2)
            .returning(move |_: &[String]| {
                calls += 1;
                if calls == 1 {
                    Err(DomainError::embedding_unavailable("connection reset"))
                } else {
                    Ok(vec![vec![0.0, 1.0]])
                }
            });

        let adapter = EmbedderAdapter::new(Arc::new(mock), 2, 8).unwrap();
        let vector = assert_ok!(adapter.embed_one_with_retry("hello", &fast_retry()).await);

        assert_eq!(vector, vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let mut mock = mock_provider(2);
        mock.expect_embed_batch()
            .times(3)
            .returning(|_: &[String]| Err(DomainError::embedding_unavailable("down")));

        let adapter = EmbedderAdapter::new(Arc::new(mock), 2, 8).unwrap();
        let err = adapter
            .embed_with_retry(&texts(1), &fast_retry())
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::embedding_unavailable("down"));
    }

    #[tokio::test]
    async fn test_non_retryable_error_not_retried() {
        let mut mock = mock_provider(2);
        mock.expect_embed_batch()
            .times(1)
            .returning(|_: &[String]| Err(DomainError::internal("bug")));

        let adapter = EmbedderAdapter::new(Arc::new(mock), 2, 8).unwrap();
        let err = adapter
            .embed_with_retry(&texts(1), &fast_retry())
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::internal("bug"));
    }
}
