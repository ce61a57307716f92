//! Fixed-size overlapping text chunker.
//!
//! Splits document body text into windows of at most `chunk_size`
//! characters, with consecutive windows sharing `chunk_overlap` characters
//! so context spanning a boundary is preserved in both chunks.
//!
//! Splitting is character-based (not byte-based) so multi-byte UTF-8 text
//! never lands on an invalid boundary. Output is deterministic for a given
//! input and configuration.

/// Split text into overlapping windows of at most `chunk_size` characters.
///
/// The window advances by `chunk_size - chunk_overlap` characters, so every
/// character of the input appears in at least one chunk and consecutive
/// chunks share exactly `chunk_overlap` characters (the final chunk may be
/// shorter). Empty input yields no chunks; no chunk is ever empty.
///
/// `chunk_overlap` must be less than `chunk_size` (enforced at config load);
/// the step is clamped to 1 so the loop always makes progress.
pub fn split(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    let step = chunk_size.saturating_sub(chunk_overlap).max(1);
    let chars: Vec<char> = text.chars().collect();

    let mut chunks = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Undo the overlap: keep the first chunk, then drop each subsequent
    /// chunk's first `overlap` characters, and concatenate.
    fn reassemble(chunks: &[String], overlap: usize) -> String {
        let mut out = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                out.push_str(chunk);
            } else {
                out.extend(chunk.chars().skip(overlap));
            }
        }
        out
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunks = split("Hello, world!", 1000, 20);
        assert_eq!(chunks, vec!["Hello, world!".to_string()]);
    }

    #[test]
    fn test_empty_text_no_chunks() {
        assert!(split("", 1000, 20).is_empty());
    }

    #[test]
    fn test_reassembly_reconstructs_input() {
        let text: String = (0..50)
            .map(|i| format!("Sentence number {} in the source document. ", i))
            .collect();
        let chunks = split(&text, 100, 15);
        assert!(chunks.len() > 1);
        assert_eq!(reassemble(&chunks, 15), text);
    }

    #[test]
    fn test_chunk_length_bounded() {
        let text = "x".repeat(2500);
        for chunk in split(&text, 100, 15) {
            assert!(chunk.chars().count() <= 100);
        }
    }

    #[test]
    fn test_consecutive_chunks_share_exact_overlap() {
        let text: String = ('a'..='z').cycle().take(500).collect();
        let chunks = split(&text, 100, 20);
        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].chars().collect();
            let next: Vec<char> = pair[1].chars().collect();
            // All chunks before the last are full-length, so the tail of
            // one must equal the head of the next.
            assert_eq!(prev[prev.len() - 20..], next[..20]);
        }
    }

    #[test]
    fn test_no_empty_chunks() {
        let text = "abc".repeat(40);
        assert!(split(&text, 7, 3).iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_multibyte_text_splits_on_char_boundaries() {
        let text = "日本語のテキスト。".repeat(30);
        let chunks = split(&text, 50, 10);
        assert_eq!(reassemble(&chunks, 10), text);
    }

    #[test]
    fn test_deterministic() {
        let text = "The sky is blue. The grass is green. ".repeat(10);
        assert_eq!(split(&text, 80, 10), split(&text, 80, 10));
    }
}
