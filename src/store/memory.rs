//! In-memory [`VectorStore`] implementation for testing.
//!
//! Uses a `Vec` behind `std::sync::RwLock` for thread safety. Similarity
//! search is brute-force cosine over all stored vectors.

use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::embedding::cosine_similarity;
use crate::models::{Chunk, ScoredChunk};

use super::{IndexedEntry, VectorStore};

/// In-memory store for tests and ephemeral sessions.
pub struct InMemoryStore {
    entries: RwLock<Vec<IndexedEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryStore {
    async fn upsert(&self, entries: &[IndexedEntry]) -> Result<()> {
        let mut stored = self.entries.write().unwrap();
        stored.extend_from_slice(entries);
        Ok(())
    }

    async fn similarity_search(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        let stored = self.entries.read().unwrap();

        let mut scored: Vec<ScoredChunk> = stored
            .iter()
            .map(|entry| ScoredChunk {
                chunk: Chunk {
                    text: entry.text.clone(),
                    source_file_name: entry.source_file_name.clone(),
                },
                score: cosine_similarity(query_vec, &entry.vector),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);

        Ok(scored)
    }

    async fn list_sources(&self) -> Result<Vec<String>> {
        let stored = self.entries.read().unwrap();
        let mut sources: Vec<String> = Vec::new();
        for entry in stored.iter() {
            if !sources.contains(&entry.source_file_name) {
                sources.push(entry.source_file_name.clone());
            }
        }
        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, source: &str, vector: Vec<f32>) -> IndexedEntry {
        IndexedEntry {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
            source_file_name: source.to_string(),
            vector,
            model: "test".to_string(),
            hash: String::new(),
        }
    }

    #[tokio::test]
    async fn test_empty_store_empty_result() {
        let store = InMemoryStore::new();
        let results = store.similarity_search(&[1.0, 0.0], 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_orders_by_descending_similarity() {
        let store = InMemoryStore::new();
        store
            .upsert(&[
                entry("far", "a.pdf", vec![0.0, 1.0]),
                entry("near", "b.pdf", vec![1.0, 0.1]),
                entry("exact", "c.pdf", vec![1.0, 0.0]),
            ])
            .await
            .unwrap();

        let results = store.similarity_search(&[1.0, 0.0], 3).await.unwrap();
        let texts: Vec<&str> = results.iter().map(|r| r.chunk.text.as_str()).collect();
        assert_eq!(texts, vec!["exact", "near", "far"]);
        assert!(results[0].score >= results[1].score);
        assert!(results[1].score >= results[2].score);
    }

    #[tokio::test]
    async fn test_search_respects_k() {
        let store = InMemoryStore::new();
        store
            .upsert(&[
                entry("one", "a.pdf", vec![1.0, 0.0]),
                entry("two", "a.pdf", vec![0.9, 0.1]),
                entry("three", "a.pdf", vec![0.8, 0.2]),
            ])
            .await
            .unwrap();

        let results = store.similarity_search(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn test_list_sources_deduplicates() {
        let store = InMemoryStore::new();
        store
            .upsert(&[
                entry("c1", "a.pdf", vec![1.0]),
                entry("c2", "a.pdf", vec![0.5]),
                entry("c3", "b.pdf", vec![0.2]),
            ])
            .await
            .unwrap();

        let mut sources = store.list_sources().await.unwrap();
        sources.sort();
        assert_eq!(sources, vec!["a.pdf".to_string(), "b.pdf".to_string()]);
    }
}
