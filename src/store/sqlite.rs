//! SQLite-backed [`VectorStore`].
//!
//! Vectors are stored as little-endian f32 BLOBs; similarity search fetches
//! all vectors and ranks by cosine similarity in Rust. Appropriate for
//! single-process corpora of uploaded documents; SQLite's WAL mode gives
//! concurrent readers a consistent view while ingestion writes.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::embedding::{blob_to_vec, cosine_similarity, vec_to_blob};
use crate::models::{Chunk, ScoredChunk};

use super::{IndexedEntry, VectorStore};

/// Vector store persisted in a SQLite database.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Wrap an already-connected pool. Schema creation is handled by
    /// [`crate::migrate::run_migrations`].
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VectorStore for SqliteStore {
    async fn upsert(&self, entries: &[IndexedEntry]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        for entry in entries {
            sqlx::query(
                r#"
                INSERT INTO entries (id, source_file_name, text, model, dims, hash, vector)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&entry.id)
            .bind(&entry.source_file_name)
            .bind(&entry.text)
            .bind(&entry.model)
            .bind(entry.vector.len() as i64)
            .bind(&entry.hash)
            .bind(vec_to_blob(&entry.vector))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn similarity_search(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
        let rows = sqlx::query("SELECT text, source_file_name, vector FROM entries")
            .fetch_all(&self.pool)
            .await?;

        let mut scored: Vec<ScoredChunk> = rows
            .iter()
            .map(|row| {
                let blob: Vec<u8> = row.get("vector");
                let score = cosine_similarity(query_vec, &blob_to_vec(&blob));
                ScoredChunk {
                    chunk: Chunk {
                        text: row.get("text"),
                        source_file_name: row.get("source_file_name"),
                    },
                    score,
                }
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
        let sources: Vec<String> = sqlx::query_scalar("SELECT DISTINCT source_file_name FROM entries")
            .fetch_all(&self.pool)
            .await?;
        Ok(sources)
    }
}
