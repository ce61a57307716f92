//! Pipeline integration tests: ingestion, retrieval, answering, and the
//! SQLite store, exercised through the library with fake providers.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use ragchat::answer::AnswerEngine;
use ragchat::config::{ChunkingConfig, Config};
use ragchat::embedding::Embedder;
use ragchat::ingest::ingest_bytes;
use ragchat::llm::LanguageModel;
use ragchat::memory::ConversationMemory;
use ragchat::retrieve::Retriever;
use ragchat::store::memory::InMemoryStore;
use ragchat::store::sqlite::SqliteStore;
use ragchat::store::VectorStore;
use ragchat::{db, migrate};

/// Deterministic bag-of-words embedder: each lowercase word hashes into one
/// of 16 buckets. Similar texts share buckets, so cosine ranking behaves
/// sensibly without a model.
struct WordHashEmbedder;

fn word_hash_vector(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; 16];
    for word in text.split_whitespace() {
        let word: String = word
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        if word.is_empty() {
            continue;
        }
        let bucket = word.bytes().fold(0usize, |acc, b| {
            acc.wrapping_mul(31).wrapping_add(b as usize)
        }) % 16;
        v[bucket] += 1.0;
    }
    v
}

#[async_trait]
impl Embedder for WordHashEmbedder {
    fn model_name(&self) -> &str {
        "word-hash"
    }
    fn dims(&self) -> usize {
        16
    }
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| word_hash_vector(t)).collect())
    }
}

/// Model that echoes its prompt, so answers observably contain the
/// retrieved context and rendered history.
struct EchoPromptModel;

#[async_trait]
impl LanguageModel for EchoPromptModel {
    fn model_name(&self) -> &str {
        "echo"
    }
    async fn generate(&self, prompt: &str) -> Result<String> {
        Ok(prompt.to_string())
    }
}

fn chunking() -> ChunkingConfig {
    ChunkingConfig {
        chunk_size: 200,
        chunk_overlap: 20,
    }
}

#[tokio::test]
async fn test_ingest_tags_chunks_with_basename() {
    let store = InMemoryStore::new();
    let count = ingest_bytes(
        &store,
        &WordHashEmbedder,
        &chunking(),
        "uploads/notes/sky.txt",
        b"The sky is blue.",
    )
    .await
    .unwrap();

    assert_eq!(count, 1);
    assert_eq!(store.list_sources().await.unwrap(), vec!["sky.txt"]);
}

#[tokio::test]
async fn test_double_ingest_appends_duplicates() {
    // Re-ingesting is documented as non-idempotent: the second pass appends
    // a second copy of every chunk instead of replacing the first.
    let store = InMemoryStore::new();
    let text = "The sky is blue. ".repeat(40);

    let first = ingest_bytes(&store, &WordHashEmbedder, &chunking(), "sky.txt", text.as_bytes())
        .await
        .unwrap();
    let second = ingest_bytes(&store, &WordHashEmbedder, &chunking(), "sky.txt", text.as_bytes())
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(store.len(), first * 2);
    // The source list still deduplicates
    assert_eq!(store.list_sources().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_ingest_rejects_empty_document() {
    let store = InMemoryStore::new();
    let result = ingest_bytes(&store, &WordHashEmbedder, &chunking(), "empty.txt", b"").await;
    assert!(result.is_err());
    assert_eq!(store.len(), 0);
}

#[tokio::test]
async fn test_retrieval_ranks_relevant_document_first() {
    let store = Arc::new(InMemoryStore::new());
    ingest_bytes(
        store.as_ref(),
        &WordHashEmbedder,
        &chunking(),
        "sky.txt",
        b"The sky is blue.",
    )
    .await
    .unwrap();
    ingest_bytes(
        store.as_ref(),
        &WordHashEmbedder,
        &chunking(),
        "cooking.txt",
        b"Simmer the onions gently in butter.",
    )
    .await
    .unwrap();

    let retriever = Retriever::new(store, Arc::new(WordHashEmbedder), 4);
    let results = retriever.retrieve("is the sky blue").await;

    assert!(!results.is_empty());
    assert_eq!(results[0].chunk.source_file_name, "sky.txt");
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[tokio::test]
async fn test_retrieval_empty_store_yields_empty() {
    let retriever = Retriever::new(Arc::new(InMemoryStore::new()), Arc::new(WordHashEmbedder), 4);
    assert!(retriever.retrieve("anything").await.is_empty());
}

#[tokio::test]
async fn test_memory_grows_one_turn_per_cycle() {
    let store = Arc::new(InMemoryStore::new());
    let retriever = Retriever::new(store, Arc::new(WordHashEmbedder), 4);
    let engine = AnswerEngine::new(retriever, Arc::new(EchoPromptModel));

    let mut memory = ConversationMemory::new();
    for i in 0..5 {
        engine
            .answer(&format!("question number {}?", i), &mut memory)
            .await
            .unwrap();
    }

    assert_eq!(memory.turns().len(), 5);
    for (i, turn) in memory.turns().iter().enumerate() {
        assert_eq!(turn.question, format!("question number {}?", i));
    }
}

#[tokio::test]
async fn test_answer_prompt_sees_prior_history() {
    let store = Arc::new(InMemoryStore::new());
    let retriever = Retriever::new(store, Arc::new(WordHashEmbedder), 4);
    let engine = AnswerEngine::new(retriever, Arc::new(EchoPromptModel));

    let mut memory = ConversationMemory::new();
    engine.answer("first question?", &mut memory).await.unwrap();
    let second = engine.answer("second question?", &mut memory).await.unwrap();

    assert!(second.answer_text.contains("Human: first question?"));
}

// ============ SQLite store ============

fn sqlite_config(dir: &tempfile::TempDir) -> Config {
    let content = format!(
        r#"
[db]
path = "{}/ragchat.sqlite"

[server]
bind = "127.0.0.1:0"
"#,
        dir.path().display()
    );
    let path = dir.path().join("ragchat.toml");
    std::fs::write(&path, content).unwrap();
    ragchat::config::load_config(&path).unwrap()
}

#[tokio::test]
async fn test_sqlite_store_roundtrip() {
    let tmp = tempfile::TempDir::new().unwrap();
    let config = sqlite_config(&tmp);

    let pool = db::connect(&config).await.unwrap();
    migrate::run_migrations(&pool).await.unwrap();
    // Migrations are idempotent
    migrate::run_migrations(&pool).await.unwrap();

    let store = SqliteStore::new(pool);
    ingest_bytes(
        &store,
        &WordHashEmbedder,
        &chunking(),
        "sky.txt",
        b"The sky is blue.",
    )
    .await
    .unwrap();
    ingest_bytes(
        &store,
        &WordHashEmbedder,
        &chunking(),
        "grass.txt",
        b"The grass is green.",
    )
    .await
    .unwrap();

    let query = word_hash_vector("what color is the sky");
    let results = store.similarity_search(&query, 2).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].chunk.source_file_name, "sky.txt");
    assert!(results[0].score >= results[1].score);

    let mut sources = store.list_sources().await.unwrap();
    sources.sort();
    assert_eq!(sources, vec!["grass.txt".to_string(), "sky.txt".to_string()]);
}

#[tokio::test]
async fn test_sqlite_store_double_ingest_duplicates() {
    let tmp = tempfile::TempDir::new().unwrap();
    let config = sqlite_config(&tmp);

    let pool = db::connect(&config).await.unwrap();
    migrate::run_migrations(&pool).await.unwrap();
    let store = SqliteStore::new(pool);

    for _ in 0..2 {
        ingest_bytes(
            &store,
            &WordHashEmbedder,
            &chunking(),
            "sky.txt",
            b"The sky is blue.",
        )
        .await
        .unwrap();
    }

    let query = word_hash_vector("sky");
    let results = store.similarity_search(&query, 10).await.unwrap();
    assert_eq!(results.len(), 2);
}
