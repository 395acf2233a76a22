//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Narrow capability over an external embedding model: texts in, vectors out
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Embed a batch of texts, one vector per text in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError>;

    /// Identifier of the model producing the vectors
    fn model_id(&self) -> String;

    /// Dimension of every vector this provider produces
    fn dimension(&self) -> usize;
}
