//! Scope registry - one independently locked partition per (tenant, knowledge base)

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use super::partition::ScopePartition;
use crate::domain::knowledge_base::Scope;

/// Shared handle to one scope's partition
pub type SharedPartition = Arc<RwLock<ScopePartition>>;

/// Registry of scope partitions.
///
/// The outer lock only guards the map itself. Work on a scope happens under
/// that scope's own lock, so scopes never block each other.
#[derive(Debug)]
pub struct ScopeRegistry {
    dimension: usize,
    partitions: RwLock<HashMap<Scope, SharedPartition>>,
}

impl ScopeRegistry {
    /// Create an empty registry whose partitions index vectors of `dimension`
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            partitions: RwLock::new(HashMap::new()),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Get an existing partition. Reads never create one.
    pub async fn get(&self, scope: &Scope) -> Option<SharedPartition> {
        self.partitions.read().await.get(scope).cloned()
    }

    /// Get a partition, creating it on first write
    pub async fn get_or_create(&self, scope: &Scope) -> SharedPartition {
        if let Some(partition) = self.get(scope).await {
            return partition;
        }

        let mut partitions = self.partitions.write().await;

        partitions
            .entry(scope.clone())
            .or_insert_with(|| {
                info!(scope = %scope, "Creating scope partition");
                Arc::new(RwLock::new(ScopePartition::new(scope.clone(), self.dimension)))
            })
            .clone()
    }

    /// Check if a scope has received any write
    pub async fn has_scope(&self, scope: &Scope) -> bool {
        self.partitions.read().await.contains_key(scope)
    }

    /// List all known scopes
    pub async fn list_scopes(&self) -> Vec<Scope> {
        self.partitions.read().await.keys().cloned().collect()
    }

    /// Get partition count
    pub async fn scope_count(&self) -> usize {
        self.partitions.read().await.len()
    }
}
