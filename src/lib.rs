//! # ragchat
//!
//! A retrieval-augmented PDF chat service.
//!
//! Users upload PDF documents, ragchat indexes them into a searchable
//! vector store, and clients converse with the corpus over a persistent
//! WebSocket, receiving word-incremental answers followed by source
//! attributions.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────────┐   ┌──────────┐
//! │  Upload  │──▶│    Pipeline      │──▶│  SQLite   │
//! │  (PDF)   │   │  Chunk + Embed   │   │ Vectors  │
//! └──────────┘   └──────────────────┘   └────┬─────┘
//!                                            │
//!            ┌───────────────────────────────┤
//!            ▼                               ▼
//!      ┌──────────┐   ┌─────────┐   ┌──────────────┐
//!      │ Retrieve │──▶│ Answer  │──▶│  Stream (WS) │
//!      │  top-K   │   │  (LLM)  │   │ + citations  │
//!      └──────────┘   └─────────┘   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! ragchat init                        # create database
//! ragchat ingest ./paper.pdf          # index a document
//! ragchat search "deployment"        # debug retrieval
//! ragchat serve                       # start HTTP + WebSocket server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`error`] | Failure taxonomy and propagation policy |
//! | [`extract`] | PDF text extraction |
//! | [`chunk`] | Overlapping fixed-size chunking |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`llm`] | Language-model provider abstraction |
//! | [`store`] | Vector store trait and backends |
//! | [`ingest`] | Ingestion pipeline |
//! | [`retrieve`] | Top-K similarity retrieval |
//! | [`memory`] | Per-session conversation memory |
//! | [`prompt`] | Prompt assembly |
//! | [`answer`] | Retrieval-augmented answer engine |
//! | [`stream`] | Paced answer streaming + attribution |
//! | [`server`] | HTTP + WebSocket server |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod answer;
pub mod chunk;
pub mod config;
pub mod db;
pub mod embedding;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod llm;
pub mod memory;
pub mod migrate;
pub mod models;
pub mod prompt;
pub mod retrieve;
pub mod server;
pub mod store;
pub mod stream;
