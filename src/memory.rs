//! Per-session conversation memory.
//!
//! One [`ConversationMemory`] is constructed when a chat connection is
//! accepted, passed explicitly into the answer engine, and dropped when the
//! connection closes. It is owned by its session, so no locking is needed.
//! Size is unbounded; eviction and summarization are out of scope.

use crate::models::ConversationTurn;

/// Ordered history of question/answer turns, oldest first.
#[derive(Debug, Default)]
pub struct ConversationMemory {
    turns: Vec<ConversationTurn>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed turn.
    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(ConversationTurn {
            question: question.into(),
            answer: answer.into(),
        });
    }

    /// All turns in chronological order.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Serialize the history for prompt inclusion, one `Human:`/`AI:` line
    /// pair per turn.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for turn in &self.turns {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str("Human: ");
            out.push_str(&turn.question);
            out.push_str("\nAI: ");
            out.push_str(&turn.answer);
        }
        out
    }
}
