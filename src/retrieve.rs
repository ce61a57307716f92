//! Similarity retrieval over the shared vector store.
//!
//! A [`Retriever`] embeds the question and delegates ranking to the store's
//! similarity search. Store or embedding failure degrades the turn to an
//! empty "no context" result with a logged warning rather than failing the
//! conversation.

use std::sync::Arc;

use tracing::warn;

use crate::embedding::{embed_query, Embedder};
use crate::error::ChatError;
use crate::models::ScoredChunk;
use crate::store::VectorStore;

/// Top-K similarity retriever bound to one store and embedding provider.
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl Retriever {
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>, top_k: usize) -> Self {
        Self {
            store,
            embedder,
            top_k,
        }
    }

    /// Return up to `top_k` chunks ranked most-similar first.
    ///
    /// An empty store yields an empty result. Failures also yield an empty
    /// result, after logging — the conversation continues without context.
    pub async fn retrieve(&self, query: &str) -> Vec<ScoredChunk> {
        match self.try_retrieve(query).await {
            Ok(results) => results,
            Err(e) => {
                warn!(error = %e, "retrieval degraded to empty context");
                Vec::new()
            }
        }
    }

    async fn try_retrieve(&self, query: &str) -> Result<Vec<ScoredChunk>, ChatError> {
        let query_vec = embed_query(self.embedder.as_ref(), query)
            .await
            .map_err(|e| ChatError::Retrieval(e.to_string()))?;

        self.store
            .similarity_search(&query_vec, self.top_k)
            .await
            .map_err(|e| ChatError::Retrieval(e.to_string()))
    }
}
