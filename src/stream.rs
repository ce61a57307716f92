//! Paced answer streaming with source attribution.
//!
//! The dispatcher fragments a completed answer on whitespace boundaries and
//! pushes each fragment through an [`EventSink`] with a fixed inter-send
//! delay, emulating incremental generation. Fragments keep their trailing
//! separator, so concatenating all `data` fields reproduces the answer text
//! exactly. After the text, a single attribution frame lists the
//! contributing documents, de-duplicated by file name.
//!
//! A send failure (client gone) aborts the remaining sequence immediately;
//! the dead sink is never iterated further.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::models::{AnswerResult, Chunk};

/// One JSON frame on the conversational channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_type: String,
    pub data: String,
}

impl Event {
    /// An answer fragment (or the attribution block).
    pub fn answer(data: impl Into<String>) -> Self {
        Self {
            event_type: "answer".to_string(),
            data: data.into(),
        }
    }

    /// A visible error surfaced to the client, e.g. a failed generation.
    pub fn error(data: impl Into<String>) -> Self {
        Self {
            event_type: "error".to_string(),
            data: data.into(),
        }
    }
}

/// Ordered delivery channel for one session's event frames.
///
/// Implemented over the WebSocket in the server and over a plain `Vec` in
/// tests. A `Transport` error from `send` means the client is gone.
#[async_trait]
pub trait EventSink: Send {
    async fn send(&mut self, event: Event) -> Result<(), ChatError>;
}

/// Stream a completed answer through `sink`, pacing fragments by `delay`.
///
/// Sends are strictly ordered: all text fragments first, then (only when
/// `used_chunks` is non-empty) one attribution frame. Returns
/// [`ChatError::Transport`] as soon as any send fails, skipping the rest.
pub async fn stream_answer(
    result: &AnswerResult,
    sink: &mut dyn EventSink,
    delay: Duration,
) -> Result<(), ChatError> {
    for fragment in result.answer_text.split_inclusive(char::is_whitespace) {
        sink.send(Event::answer(fragment)).await?;
        tokio::time::sleep(delay).await;
    }

    if let Some(block) = sources_block(&result.used_chunks) {
        sink.send(Event::answer(block)).await?;
    }

    Ok(())
}

/// Build the markdown attribution block for a turn's retrieved chunks.
///
/// File names are de-duplicated in first-seen (retrieval) order and bolded,
/// one per line. Returns `None` when there is nothing to attribute.
pub fn sources_block(used_chunks: &[Chunk]) -> Option<String> {
    let mut names: Vec<&str> = Vec::new();
    for chunk in used_chunks {
        if !names.contains(&chunk.source_file_name.as_str()) {
            names.push(&chunk.source_file_name);
        }
    }

    if names.is_empty() {
        return None;
    }

    let list = names
        .iter()
        .map(|n| format!("**{}**", n))
        .collect::<Vec<_>>()
        .join("\n");

    Some(format!("\n\nSources:\n\n{}", list))
}
