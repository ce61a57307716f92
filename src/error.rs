//! Error taxonomy for the chat pipeline.
//!
//! Each variant maps to one propagation policy:
//! - [`ChatError::Ingestion`] — rejected at the upload boundary, no retry.
//! - [`ChatError::Retrieval`] — logged and degraded to an empty context;
//!   the conversation turn continues.
//! - [`ChatError::Generation`] — surfaced to the client as an error event;
//!   conversation memory is left unmodified.
//! - [`ChatError::Transport`] — the affected session loop terminates; the
//!   rest of the service is unaffected.

/// Classified failure from the ingestion/retrieval/generation/streaming path.
#[derive(Debug)]
pub enum ChatError {
    /// Document unreadable, unparseable, or embedding/store failure during ingest.
    Ingestion(String),
    /// Vector store or query embedding unavailable during retrieval.
    Retrieval(String),
    /// Language-model call failed (provider error, timeout, rate limit).
    Generation(String),
    /// Client disconnected or the send path failed mid-stream.
    Transport(String),
}

impl std::fmt::Display for ChatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatError::Ingestion(e) => write!(f, "ingestion failed: {}", e),
            ChatError::Retrieval(e) => write!(f, "retrieval failed: {}", e),
            ChatError::Generation(e) => write!(f, "generation failed: {}", e),
            ChatError::Transport(e) => write!(f, "transport failed: {}", e),
        }
    }
}

impl std::error::Error for ChatError {}
