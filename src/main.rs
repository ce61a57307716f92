//! # ragchat CLI
//!
//! The `ragchat` binary drives the chat service. It provides commands for
//! database initialization, document ingestion, retrieval debugging, and
//! starting the HTTP + WebSocket server.
//!
//! ## Usage
//!
//! ```bash
//! ragchat --config ./config/ragchat.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ragchat init` | Create the SQLite database and run schema migrations |
//! | `ragchat serve` | Start the HTTP + WebSocket chat server |
//! | `ragchat ingest <path>` | Index one document from the filesystem |
//! | `ragchat search "<query>"` | Debug retrieval: print ranked chunks |
//! | `ragchat documents` | List indexed source file names |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ragchat::config::load_config;
use ragchat::embedding::{create_embedder, embed_query};
use ragchat::store::{sqlite::SqliteStore, VectorStore};
use ragchat::{db, ingest, migrate, server};

/// ragchat — a retrieval-augmented PDF chat service.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/ragchat.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "ragchat",
    about = "ragchat — a retrieval-augmented PDF chat service",
    version,
    long_about = "ragchat indexes uploaded PDF documents into a vector store and answers \
    questions about them over a streaming WebSocket channel, with conversational memory \
    and source attribution."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/ragchat.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the vector entries table.
    /// This command is idempotent — running it multiple times is safe.
    Init,

    /// Start the HTTP + WebSocket chat server.
    Serve,

    /// Index one document from the filesystem.
    ///
    /// PDFs are extracted with pdf-extract; other files are read as plain
    /// UTF-8 text. Ingesting the same file twice stores both copies.
    Ingest {
        /// Path to the document.
        path: PathBuf,
    },

    /// Debug retrieval: print the top-K chunks for a query.
    Search {
        /// The query text.
        query: String,
    },

    /// List indexed source file names.
    Documents,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let pool = db::connect(&config).await?;
            migrate::run_migrations(&pool).await?;
            pool.close().await;
            println!("Database initialized at {}", config.db.path.display());
        }
        Commands::Serve => {
            server::run_server(&config).await?;
        }
        Commands::Ingest { path } => {
            let pool = db::connect(&config).await?;
            migrate::run_migrations(&pool).await?;
            let store = SqliteStore::new(pool);
            let embedder = create_embedder(&config.embedding)?;
            let count =
                ingest::ingest_path(&store, embedder.as_ref(), &config.chunking, &path).await?;
            println!("ingested {} ({} chunks)", path.display(), count);
        }
        Commands::Search { query } => {
            let pool = db::connect(&config).await?;
            let store = SqliteStore::new(pool);
            let embedder = create_embedder(&config.embedding)?;
            let query_vec = embed_query(embedder.as_ref(), &query).await?;
            let results = store
                .similarity_search(&query_vec, config.retrieval.top_k)
                .await?;

            if results.is_empty() {
                println!("No results.");
            }
            for (i, result) in results.iter().enumerate() {
                let excerpt: String = result.chunk.text.chars().take(120).collect();
                println!(
                    "{}. [{:.3}] {}",
                    i + 1,
                    result.score,
                    result.chunk.source_file_name
                );
                println!("    excerpt: \"{}\"", excerpt.replace('\n', " "));
            }
        }
        Commands::Documents => {
            let pool = db::connect(&config).await?;
            let store = SqliteStore::new(pool);
            let sources = store.list_sources().await?;
            if sources.is_empty() {
                println!("No documents indexed.");
            }
            for source in sources {
                println!("{}", source);
            }
        }
    }

    Ok(())
}
