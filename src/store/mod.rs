//! Vector store abstraction.
//!
//! The [`VectorStore`] trait defines the three operations the pipeline
//! needs from a persistence backend: committing embedded chunks, similarity
//! search, and listing indexed sources. Backends own their durability and
//! concurrency; the pipeline adds no locking of its own.
//!
//! Implementations must be `Send + Sync` so one store handle can be shared
//! by concurrent sessions.

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::ScoredChunk;

/// The store's persisted unit: an embedding vector plus the chunk text and
/// its provenance metadata.
///
/// `dims` is fixed by the embedding provider and must be uniform across all
/// entries in one store.
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    /// Entry UUID.
    pub id: String,
    /// Chunk body text.
    pub text: String,
    /// Basename of the originating document. Never empty.
    pub source_file_name: String,
    /// Embedding vector.
    pub vector: Vec<f32>,
    /// Embedding model that produced the vector.
    pub model: String,
    /// SHA-256 of the chunk text, for staleness inspection.
    pub hash: String,
}

/// Abstract vector storage backend.
///
/// Search ranks by whatever similarity metric the backend implements
/// (cosine in both bundled backends); callers treat the score as opaque,
/// higher meaning more similar.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Commit a batch of entries. Entries are appended; committing the same
    /// document twice stores both copies.
    async fn upsert(&self, entries: &[IndexedEntry]) -> Result<()>;

    /// Return the `k` entries most similar to `query_vec`, most similar
    /// first. An empty store yields an empty result.
    async fn similarity_search(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredChunk>>;

    /// Return the de-duplicated set of `source_file_name` values present in
    /// the store's metadata. Order is unspecified.
    async fn list_sources(&self) -> Result<Vec<String>>;
}
