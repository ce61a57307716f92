use anyhow::Result;
use sqlx::SqlitePool;

/// Create the vector store schema. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id TEXT PRIMARY KEY,
            source_file_name TEXT NOT NULL,
            text TEXT NOT NULL,
            model TEXT NOT NULL,
            dims INTEGER NOT NULL,
            hash TEXT NOT NULL,
            vector BLOB NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_entries_source ON entries(source_file_name)")
        .execute(pool)
        .await?;

    Ok(())
}
