//! Core data models used throughout the chat pipeline.
//!
//! These types represent the chunks, retrieval results, and conversation
//! turns that flow between ingestion, retrieval, and answer streaming.

use serde::{Deserialize, Serialize};

/// A bounded span of document text tagged with its provenance.
///
/// Every chunk carries a non-empty `source_file_name` (the basename of the
/// uploaded document) so answers can be attributed back to their sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub source_file_name: String,
}

/// A chunk returned from similarity search, paired with its score.
///
/// Higher scores are more similar. The scoring metric belongs to the store
/// backend and is treated as opaque by the rest of the pipeline.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// One question/answer exchange in a conversation session.
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub question: String,
    pub answer: String,
}

/// The outcome of one retrieval-augmented generation cycle.
///
/// `used_chunks` are the chunks retrieved for this turn, in similarity
/// order. They may repeat a `source_file_name`; de-duplication happens at
/// attribution time in the streaming dispatcher.
#[derive(Debug, Clone)]
pub struct AnswerResult {
    pub answer_text: String,
    pub used_chunks: Vec<Chunk>,
}
