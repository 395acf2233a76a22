//! Knowledge base storage - per-scope vector index and document store

mod document_store;
mod partition;
mod registry;
mod vector_index;

pub use document_store::DocumentStore;
pub use partition::ScopePartition;
pub use registry::{ScopeRegistry, SharedPartition};
pub use vector_index::{IndexInsert, VectorIndex};
