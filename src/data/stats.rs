// ============================================================
// Layer 4 — Corpus Length Statistics
// ============================================================
// Padding bounds are a trade-off: too tight truncates real
// content, too loose wastes compute on PAD slots. This module
// measures the three distributions the bounds are chosen from
// (sentences per document, words per sentence, words per
// document) and reports the usual percentile candidates.

use crate::data::tokenize;
use crate::domain::document::LabeledDocument;

/// Percentiles reported for each length distribution.
const PERCENTILES: [u8; 4] = [80, 90, 95, 99];

/// Raw per-unit counts collected from one corpus split.
pub struct CorpusStats {
    pub sent_per_doc: Vec<usize>,
    pub words_per_sent: Vec<usize>,
    pub words_per_doc: Vec<usize>,
}

/// Tokenise every document and collect the three length lists.
pub fn corpus_stats(docs: &[LabeledDocument]) -> CorpusStats {
    let mut sent_per_doc = Vec::with_capacity(docs.len());
    let mut words_per_sent = Vec::new();
    let mut words_per_doc = Vec::with_capacity(docs.len());

    for doc in docs {
        let sentences = tokenize::sent_word_tokenize(&doc.text);
        sent_per_doc.push(sentences.len());
        let mut words = 0;
        for sentence in &sentences {
            words_per_sent.push(sentence.len());
            words += sentence.len();
        }
        words_per_doc.push(words);
    }

    CorpusStats { sent_per_doc, words_per_sent, words_per_doc }
}

impl CorpusStats {
    /// Multi-line report of the percentile candidates for each
    /// padding bound, ready for printing.
    pub fn report(&self) -> String {
        let mut out = String::new();
        for (name, values) in [
            ("sentences per document", &self.sent_per_doc),
            ("words per sentence", &self.words_per_sent),
            ("words per document", &self.words_per_doc),
        ] {
            let mut sorted = values.clone();
            sorted.sort_unstable();
            out.push_str(&format!("{name}:\n"));
            for p in PERCENTILES {
                out.push_str(&format!("  p{p}: {}\n", percentile(&sorted, p)));
            }
        }
        out
    }
}

/// Nearest-rank percentile of an ascending-sorted slice.
fn percentile(sorted: &[usize], p: u8) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    let rank = ((p as f64 / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_match_tokenisation() {
        let docs = vec![
            LabeledDocument::new(0, "First document. First document again"),
            LabeledDocument::new(1, "Second doc."),
        ];
        let stats = corpus_stats(&docs);
        assert_eq!(stats.sent_per_doc, vec![2, 1]);
        assert_eq!(stats.words_per_sent, vec![3, 3, 3]);
        assert_eq!(stats.words_per_doc, vec![6, 3]);
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let sorted: Vec<usize> = (1..=100).collect();
        assert_eq!(percentile(&sorted, 80), 80);
        assert_eq!(percentile(&sorted, 99), 99);
    }

    #[test]
    fn test_percentile_of_empty_is_zero() {
        assert_eq!(percentile(&[], 90), 0);
    }
}
