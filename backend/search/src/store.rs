use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use wardrobe_core::{BotError, SearchMatch, VectorIndex};

#[derive(Debug, Clone)]
struct Entry {
    vector: Vec<f32>,
    metadata: serde_json::Value,
}

/// Brute-force inner-product index. Stands in for the hosted index in the
/// catalog and webhook tests.
#[derive(Clone, Default)]
pub struct InMemoryIndex {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the vector stored under `id`.
    pub async fn upsert(
        &self,
        id: impl Into<String>,
        vector: Vec<f32>,
        metadata: serde_json::Value,
    ) {
        self.entries.write().await.insert(id.into(), Entry { vector, metadata });
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    fn dot_product(v1: &[f32], v2: &[f32]) -> Option<f32> {
        if v1.len() != v2.len() {
            return None;
        }
        Some(v1.iter().zip(v2).map(|(a, b)| a * b).sum())
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<SearchMatch>, BotError> {
        let entries = self.entries.read().await;
        let mut results = Vec::with_capacity(entries.len());
        for (id, entry) in entries.iter() {
            let score = Self::dot_product(vector, &entry.vector).ok_or_else(|| {
                BotError::search(format!(
                    "query dimension {} does not match entry {} ({})",
                    vector.len(),
                    id,
                    entry.vector.len()
                ))
            })?;
            results.push(SearchMatch {
                id: id.clone(),
                score,
                metadata: entry.metadata.clone(),
            });
        }

        // Highest score first; ties broken by id so results are stable.
        results.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        results.truncate(top_k);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn ranks_by_inner_product() {
        let index = InMemoryIndex::new();
        index.upsert("0", vec![1.0, 0.0, 0.0], json!({})).await;
        index.upsert("1", vec![0.0, 1.0, 0.0], json!({})).await;
        index.upsert("2", vec![0.6, 0.6, 0.0], json!({"tag": "mixed"})).await;

        let results = index.query(&[0.9, 0.1, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].id, "0");
        assert_eq!(results[1].id, "2");
        assert_eq!(results[1].metadata["tag"], "mixed");
    }

    #[tokio::test]
    async fn empty_index_returns_no_matches() {
        let results = InMemoryIndex::new().query(&[1.0], 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_existing_entry() {
        let index = InMemoryIndex::new();
        index.upsert("a", vec![1.0], json!({})).await;
        index.upsert("a", vec![-1.0], json!({})).await;
        assert_eq!(index.len().await, 1);
        let results = index.query(&[1.0], 5).await.unwrap();
        assert_eq!(results[0].score, -1.0);
    }

    #[tokio::test]
    async fn dimension_mismatch_is_search_error() {
        let index = InMemoryIndex::new();
        index.upsert("a", vec![1.0, 2.0], json!({})).await;
        let err = index.query(&[1.0], 5).await.unwrap_err();
        assert!(matches!(err, BotError::Search(_)));
    }
}
