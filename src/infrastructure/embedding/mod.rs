//! Embedding provider implementations

mod adapter;
mod byte_histogram;
mod factory;
mod http_client;
mod openai;

pub use adapter::EmbedderAdapter;
pub use byte_histogram::{ByteHistogramEmbeddingProvider, DEFAULT_LOCAL_DIMENSION};
pub use factory::{DEFAULT_OPENAI_MODEL, EmbeddingProviderFactory};
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::{DEFAULT_OPENAI_BASE_URL, OpenAiEmbeddingProvider};

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
