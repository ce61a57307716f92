//! Ingestion pipeline orchestration.
//!
//! Coordinates the flow from an uploaded document to committed store
//! entries: extract text → chunk → tag provenance → embed batch → upsert.
//!
//! Each ingest is atomic for its document: any failure aborts the whole
//! ingest and leaves prior store state untouched. Re-ingesting the same
//! file is not idempotent — it appends a second copy of every chunk. That
//! matches the reference behavior and is asserted by tests, not "fixed".

use std::path::Path;

use anyhow::Result;
use sha2::{Digest, Sha256};
use tracing::info;
use uuid::Uuid;

use crate::chunk::split;
use crate::config::ChunkingConfig;
use crate::embedding::Embedder;
use crate::error::ChatError;
use crate::extract::extract_text;
use crate::store::{IndexedEntry, VectorStore};

/// Ingest one document from raw bytes. Returns the number of chunks committed.
///
/// `file_name` is reduced to its final path segment before being stored as
/// `source_file_name`, so provenance never leaks directory structure.
pub async fn ingest_bytes(
    store: &dyn VectorStore,
    embedder: &dyn Embedder,
    chunking: &ChunkingConfig,
    file_name: &str,
    bytes: &[u8],
) -> Result<usize, ChatError> {
    let source_file_name = basename(file_name);
    if source_file_name.is_empty() {
        return Err(ChatError::Ingestion(format!(
            "invalid file name: {:?}",
            file_name
        )));
    }

    let text = extract_text(&source_file_name, bytes)
        .map_err(|e| ChatError::Ingestion(e.to_string()))?;

    let chunks = split(&text, chunking.chunk_size, chunking.chunk_overlap);
    if chunks.is_empty() {
        return Err(ChatError::Ingestion(format!(
            "no text extracted from {}",
            source_file_name
        )));
    }

    let vectors = embedder
        .embed(&chunks)
        .await
        .map_err(|e| ChatError::Ingestion(e.to_string()))?;

    if vectors.len() != chunks.len() {
        return Err(ChatError::Ingestion(format!(
            "embedding count mismatch: {} chunks, {} vectors",
            chunks.len(),
            vectors.len()
        )));
    }

    let entries: Vec<IndexedEntry> = chunks
        .into_iter()
        .zip(vectors)
        .map(|(text, vector)| {
            let mut hasher = Sha256::new();
            hasher.update(text.as_bytes());
            IndexedEntry {
                id: Uuid::new_v4().to_string(),
                hash: format!("{:x}", hasher.finalize()),
                text,
                source_file_name: source_file_name.clone(),
                vector,
                model: embedder.model_name().to_string(),
            }
        })
        .collect();

    store
        .upsert(&entries)
        .await
        .map_err(|e| ChatError::Ingestion(e.to_string()))?;

    info!(
        source = %source_file_name,
        chunks = entries.len(),
        "document ingested"
    );

    Ok(entries.len())
}

/// Ingest one document from the filesystem.
pub async fn ingest_path(
    store: &dyn VectorStore,
    embedder: &dyn Embedder,
    chunking: &ChunkingConfig,
    path: &Path,
) -> Result<usize, ChatError> {
    let bytes = std::fs::read(path)
        .map_err(|e| ChatError::Ingestion(format!("failed to read {}: {}", path.display(), e)))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| ChatError::Ingestion(format!("invalid path: {}", path.display())))?;

    ingest_bytes(store, embedder, chunking, file_name, &bytes).await
}

/// Reduce a client-supplied file name to its final path segment.
///
/// Uploaded filenames are untrusted; stripping directories here prevents
/// path traversal when the intake copy is written to disk.
pub fn basename(file_name: &str) -> String {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename_strips_directories() {
        assert_eq!(basename("docs/papers/sky.pdf"), "sky.pdf");
        assert_eq!(basename("..\\..\\evil.pdf"), "evil.pdf");
        assert_eq!(basename("plain.pdf"), "plain.pdf");
    }

    #[test]
    fn test_basename_empty_for_trailing_slash() {
        assert_eq!(basename("docs/"), "");
    }
}
