//! Exact cosine vector index for a single scope

use std::collections::HashSet;

use crate::domain::DomainError;
use crate::domain::embedding::{dot, l2_normalize};
use crate::domain::knowledge_base::{ChunkRef, IndexHit};

#[derive(Debug, Clone)]
struct IndexEntry {
    seq: u64,
    chunk_id: String,
    chunk: ChunkRef,
    /// Unit-length copy of the inserted vector
    unit: Vec<f32>,
}

/// A vector waiting to be inserted
#[derive(Debug, Clone)]
pub struct IndexInsert {
    pub chunk_id: String,
    pub vector: Vec<f32>,
    pub chunk: ChunkRef,
}

/// Linear-scan index over the vectors of one scope.
///
/// Entries are immutable once inserted. Search ranks by cosine similarity and
/// breaks ties by insertion order.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    dimension: usize,
    entries: Vec<IndexEntry>,
    ids: HashSet<String>,
    next_seq: u64,
}

impl VectorIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            entries: Vec::new(),
            ids: HashSet::new(),
            next_seq: 0,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, chunk_id: &str) -> bool {
        self.ids.contains(chunk_id)
    }

    /// Insert one entry
    pub fn insert(
        &mut self,
        chunk_id: impl Into<String>,
        vector: &[f32],
        chunk: ChunkRef,
    ) -> Result<(), DomainError> {
        let chunk_id = chunk_id.into();
        self.check_vector(vector)?;

        if self.ids.contains(&chunk_id) {
            return Err(DomainError::invalid_argument(format!(
                "chunk '{}' is already indexed",
                chunk_id
            )));
        }

        self.push(chunk_id, vector, chunk);
        Ok(())
    }

    /// Insert several entries, or none of them if any is invalid
    pub fn insert_all(&mut self, inserts: Vec<IndexInsert>) -> Result<(), DomainError> {
        self.check_inserts(&inserts)?;

        for insert in inserts {
            self.push(insert.chunk_id, &insert.vector, insert.chunk);
        }

        Ok(())
    }

    /// Validate a batch without modifying the index
    pub fn check_inserts(&self, inserts: &[IndexInsert]) -> Result<(), DomainError> {
        let mut seen = HashSet::with_capacity(inserts.len());

        for insert in inserts {
            self.check_vector(&insert.vector)?;

            if self.ids.contains(&insert.chunk_id) || !seen.insert(insert.chunk_id.as_str()) {
                return Err(DomainError::invalid_argument(format!(
                    "chunk '{}' is already indexed",
                    insert.chunk_id
                )));
            }
        }

        Ok(())
    }

    /// Top-K cosine search. Results are sorted by descending score, then by
    /// insertion order, and only include scores of at least `min_score`.
    pub fn search(
        &self,
        query: &[f32],
        top_k: i64,
        min_score: f32,
    ) -> Result<Vec<IndexHit>, DomainError> {
        if top_k <= 0 {
            return Err(DomainError::invalid_argument("topK must be greater than 0"));
        }

        self.check_vector(query)?;

        let query = l2_normalize(query);

        let mut scored: Vec<(&IndexEntry, f32)> = self
            .entries
            .iter()
            .map(|entry| (entry, dot(&query, &entry.unit).clamp(-1.0, 1.0)))
            .filter(|(_, score)| *score >= min_score)
            .collect();

        scored.sort_by(|(a, sa), (b, sb)| sb.total_cmp(sa).then(a.seq.cmp(&b.seq)));
        scored.truncate(top_k as usize);

        Ok(scored
            .into_iter()
            .map(|(entry, score)| IndexHit {
                chunk_id: entry.chunk_id.clone(),
                chunk: entry.chunk.clone(),
                score,
            })
            .collect())
    }

    /// Remove every entry belonging to a document, returning how many were removed
    pub fn remove_document(&mut self, doc_id: &str) -> usize {
        let before = self.entries.len();
        let ids = &mut self.ids;

        self.entries.retain(|entry| {
            if entry.chunk.doc_id == doc_id {
                ids.remove(&entry.chunk_id);
                false
            } else {
                true
            }
        });

        before - self.entries.len()
    }

    fn check_vector(&self, vector: &[f32]) -> Result<(), DomainError> {
        if vector.len() != self.dimension {
            return Err(DomainError::dimension_mismatch(self.dimension, vector.len()));
        }

        Ok(())
    }

    fn push(&mut self, chunk_id: String, vector: &[f32], chunk: ChunkRef) {
        self.ids.insert(chunk_id.clone());
        self.entries.push(IndexEntry {
            seq: self.next_seq,
            chunk_id,
            chunk,
            unit: l2_normalize(vector),
        });
        self.next_seq += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(vectors: &[(&str, Vec<f32>)]) -> VectorIndex {
        let mut index = VectorIndex::new(3);

        for (i, (id, vector)) in vectors.iter().enumerate() {
            index.insert(*id, vector, ChunkRef::new("doc", i)).unwrap();
        }

        index
    }

    fn ids(hits: &[IndexHit]) -> Vec<&str> {
        hits.iter().map(|h| h.chunk_id.as_str()).collect()
    }

    #[test]
    fn test_insert_rejects_wrong_dimension() {
        let mut index = VectorIndex::new(3);

        let err = index
            .insert("c", &[1.0, 0.0], ChunkRef::new("d", 0))
            .unwrap_err();

        assert_eq!(err, DomainError::dimension_mismatch(3, 2));
        assert!(index.is_empty());
    }

    #[test]
    fn test_search_orders_by_score() {
        let index = index_with(&[
            ("far", vec![0.0, 1.0, 0.0]),
            ("near", vec![1.0, 0.1, 0.0]),
            ("exact", vec![2.0, 0.0, 0.0]),
        ]);

        let hits = index.search(&[1.0, 0.0, 0.0], 10, -1.0).unwrap();

        assert_eq!(ids(&hits), vec!["exact", "near", "far"]);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_ties_break_by_insertion_order() {
        let index = index_with(&[
            ("first", vec![1.0, 1.0, 0.0]),
            ("second", vec![2.0, 2.0, 0.0]),
            ("third", vec![0.5, 0.5, 0.0]),
        ]);

        for _ in 0..3 {
            let hits = index.search(&[1.0, 1.0, 0.0], 3, 0.0).unwrap();
            assert_eq!(ids(&hits), vec!["first", "second", "third"]);
        }
    }

    #[test]
    fn test_min_score_and_top_k() {
        let index = index_with(&[
            ("a", vec![1.0, 0.0, 0.0]),
            ("b", vec![0.0, 1.0, 0.0]),
            ("c", vec![-1.0, 0.0, 0.0]),
            ("d", vec![0.9, 0.1, 0.0]),
        ]);

        let hits = index.search(&[1.0, 0.0, 0.0], 10, 0.5).unwrap();
        assert_eq!(ids(&hits), vec!["a", "d"]);

        let hits = index.search(&[1.0, 0.0, 0.0], 1, 0.0).unwrap();
        assert_eq!(ids(&hits), vec!["a"]);

        let hits = index.search(&[1.0, 0.0, 0.0], 10, -1.0).unwrap();
        assert_eq!(hits.len(), 4);
        assert!((hits[3].score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_positive_top_k_rejected() {
        let index = index_with(&[("a", vec![1.0, 0.0, 0.0])]);

        assert!(matches!(
            index.search(&[1.0, 0.0, 0.0], 0, 0.0),
            Err(DomainError::InvalidArgument { .. })
        ));
        assert!(index.search(&[1.0, 0.0, 0.0], -3, 0.0).is_err());
    }

    #[test]
    fn test_query_dimension_checked() {
        let index = index_with(&[("a", vec![1.0, 0.0, 0.0])]);

        assert!(matches!(
            index.search(&[1.0], 1, 0.0),
            Err(DomainError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_index_returns_empty() {
        let index = VectorIndex::new(3);

        assert!(index.search(&[1.0, 0.0, 0.0], 5, 0.0).unwrap().is_empty());
    }

    #[test]
    fn test_insert_all_is_all_or_nothing() {
        let mut index = VectorIndex::new(2);

        let err = index
            .insert_all(vec![
                IndexInsert {
                    chunk_id: "d_0".to_string(),
                    vector: vec![1.0, 0.0],
                    chunk: ChunkRef::new("d", 0),
                },
                IndexInsert {
                    chunk_id: "d_1".to_string(),
                    vector: vec![1.0, 0.0, 0.0],
                    chunk: ChunkRef::new("d", 1),
                },
            ])
            .unwrap_err();

        assert!(matches!(err, DomainError::DimensionMismatch { .. }));
        assert!(index.is_empty());
    }

    #[test]
    fn test_duplicate_chunk_id_rejected() {
        let mut index = index_with(&[("a", vec![1.0, 0.0, 0.0])]);

        assert!(index.insert("a", &[0.0, 1.0, 0.0], ChunkRef::new("doc", 9)).is_err());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_remove_document() {
        let mut index = VectorIndex::new(2);
        index.insert("x_0", &[1.0, 0.0], ChunkRef::new("x", 0)).unwrap();
        index.insert("y_0", &[1.0, 0.0], ChunkRef::new("y", 0)).unwrap();
        index.insert("x_1", &[0.0, 1.0], ChunkRef::new("x", 1)).unwrap();

        assert_eq!(index.remove_document("x"), 2);
        assert_eq!(index.len(), 1);
        assert!(!index.contains("x_0"));

        let hits = index.search(&[1.0, 1.0], 10, -1.0).unwrap();
        assert_eq!(ids(&hits), vec!["y_0"]);
    }
}
