//! Prompt assembly.
//!
//! A pure template function: retrieved context, rendered history, and the
//! literal question are substituted into a fixed instruction template. No
//! de-duplication happens here — context chunks are concatenated raw, in
//! retrieval order.

use crate::models::ScoredChunk;

const TEMPLATE: &str = "\
Answer the question based on the context, in a concise manner, in markdown and using bullet points where applicable.

Context: {context}
History: {history}

Question: {question}
Answer:
";

/// Build the generation prompt from the turn's inputs.
pub fn assemble(question: &str, chunks: &[ScoredChunk], history: &str) -> String {
    let context = chunks
        .iter()
        .map(|c| c.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    TEMPLATE
        .replacen("{context}", &context, 1)
        .replacen("{history}", history, 1)
        .replacen("{question}", question, 1)
}
