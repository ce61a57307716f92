//! Retrieval-augmented answer engine.
//!
//! One [`AnswerEngine`] per process: it holds the shared retriever and
//! language model. Conversation memory is session-owned and passed in
//! explicitly for each call, never held here.

use std::sync::Arc;

use crate::error::ChatError;
use crate::llm::LanguageModel;
use crate::memory::ConversationMemory;
use crate::models::AnswerResult;
use crate::prompt;
use crate::retrieve::Retriever;

/// Executes one retrieval → assemble → generate cycle per question.
pub struct AnswerEngine {
    retriever: Retriever,
    model: Arc<dyn LanguageModel>,
}

impl AnswerEngine {
    pub fn new(retriever: Retriever, model: Arc<dyn LanguageModel>) -> Self {
        Self { retriever, model }
    }

    /// Answer a question against the indexed corpus.
    ///
    /// Retrieves context for the question, assembles the prompt with the
    /// session history, and invokes the language model. On success the
    /// `{question, answer}` turn is recorded into `memory` and the result
    /// carries the retrieved chunks for attribution. On generation failure
    /// memory is left untouched — no partial turn is recorded.
    pub async fn answer(
        &self,
        question: &str,
        memory: &mut ConversationMemory,
    ) -> Result<AnswerResult, ChatError> {
        let retrieved = self.retriever.retrieve(question).await;
        let prompt = prompt::assemble(question, &retrieved, &memory.render());

        let answer_text = self
            .model
            .generate(&prompt)
            .await
            .map_err(|e| ChatError::Generation(e.to_string()))?;

        memory.push(question, answer_text.clone());

        Ok(AnswerResult {
            answer_text,
            used_chunks: retrieved.into_iter().map(|s| s.chunk).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::Embedder;
    use crate::store::memory::InMemoryStore;
    use anyhow::Result;
    use async_trait::async_trait;

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        fn model_name(&self) -> &str {
            "fixed"
        }
        fn dims(&self) -> usize {
            2
        }
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    struct EchoModel;

    #[async_trait]
    impl LanguageModel for EchoModel {
        fn model_name(&self) -> &str {
            "echo"
        }
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(format!("echo: {}", prompt.len()))
        }
    }

    struct FailingModel;

    #[async_trait]
    impl LanguageModel for FailingModel {
        fn model_name(&self) -> &str {
            "failing"
        }
        async fn generate(&self, _prompt: &str) -> Result<String> {
            anyhow::bail!("rate limited")
        }
    }

    fn engine(model: Arc<dyn LanguageModel>) -> AnswerEngine {
        let retriever = Retriever::new(Arc::new(InMemoryStore::new()), Arc::new(FixedEmbedder), 4);
        AnswerEngine::new(retriever, model)
    }

    #[tokio::test]
    async fn test_successful_answer_records_turn() {
        let engine = engine(Arc::new(EchoModel));
        let mut memory = ConversationMemory::new();

        let result = engine.answer("What color is the sky?", &mut memory).await;
        assert!(result.is_ok());
        assert_eq!(memory.turns().len(), 1);
        assert_eq!(memory.turns()[0].question, "What color is the sky?");
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_memory_untouched() {
        let engine = engine(Arc::new(FailingModel));
        let mut memory = ConversationMemory::new();

        let err = engine.answer("anything?", &mut memory).await.unwrap_err();
        assert!(matches!(err, ChatError::Generation(_)));
        assert!(memory.turns().is_empty());
    }

    #[tokio::test]
    async fn test_empty_store_yields_no_used_chunks() {
        let engine = engine(Arc::new(EchoModel));
        let mut memory = ConversationMemory::new();

        let result = engine.answer("q", &mut memory).await.unwrap();
        assert!(result.used_chunks.is_empty());
    }
}
