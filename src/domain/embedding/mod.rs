//! Embedding provider domain models and traits

mod provider;
mod retry;
mod vector;

pub use provider::EmbeddingProvider;
pub use retry::RetryConfig;
pub use vector::{cosine_similarity, dot, l2_norm, l2_normalize};

#[cfg(test)]
pub use provider::MockEmbeddingProvider;
