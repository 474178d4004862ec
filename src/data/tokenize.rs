// ============================================================
// Layer 4 — Tokenisation
// ============================================================
// Pure functions that turn a document string into tokens.
// Lower-casing happens here, before any splitting, so the
// vocabulary only ever sees lower-case words.
//
// Word and sentence boundaries follow Unicode UAX#29 via the
// unicode-segmentation crate. Punctuation marks are kept as
// tokens of their own ("kenobi", "!") because the pretrained
// embeddings contain entries for them; only whitespace is
// discarded.

use unicode_segmentation::UnicodeSegmentation;

/// Tokenise a document into a flat word sequence.
///
/// `word_tokenize("Hello There! General Kenobi!")`
/// → `["hello", "there", "!", "general", "kenobi", "!"]`
pub fn word_tokenize(doc: &str) -> Vec<String> {
    split_words(&doc.to_lowercase())
}

/// Tokenise a document into sentences of words.
///
/// `sent_word_tokenize("Hello There! General Kenobi!")`
/// → `[["hello", "there", "!"], ["general", "kenobi", "!"]]`
pub fn sent_word_tokenize(doc: &str) -> Vec<Vec<String>> {
    doc.to_lowercase()
        .unicode_sentences()
        .map(split_words)
        .filter(|sentence| !sentence.is_empty())
        .collect()
}

/// Split on word boundaries, dropping whitespace-only segments.
fn split_words(text: &str) -> Vec<String> {
    text.split_word_bounds()
        .filter(|segment| !segment.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_tokenize_lowercases_and_keeps_punctuation() {
        assert_eq!(
            word_tokenize("Hello There! General Kenobi!"),
            vec!["hello", "there", "!", "general", "kenobi", "!"]
        );
    }

    #[test]
    fn test_sent_word_tokenize_splits_sentences() {
        assert_eq!(
            sent_word_tokenize("Hello There! General Kenobi!"),
            vec![
                vec!["hello", "there", "!"],
                vec!["general", "kenobi", "!"]
            ]
        );
    }

    #[test]
    fn test_empty_document() {
        assert!(word_tokenize("").is_empty());
        assert!(sent_word_tokenize("").is_empty());
    }

    #[test]
    fn test_whitespace_only_document() {
        assert!(word_tokenize("   \n\t ").is_empty());
        assert!(sent_word_tokenize("   \n\t ").is_empty());
    }
}
