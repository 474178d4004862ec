// ============================================================
// Layer 4 — Padding Pipeline and Datasets
// ============================================================
// Turns raw documents into fixed-shape index sequences and
// exposes them through burn's Dataset trait so the DataLoader
// can shuffle and batch them.
//
// Padding policy (identical for training and validation, so the
// input distribution cannot drift between the two):
//   - tokens are mapped through the vocabulary, OOV → UNK
//   - sequences longer than the bound are truncated at the end
//   - shorter sequences are padded at the end with PAD
//   - a document with zero tokens becomes an all-PAD encoding;
//     no document is ever dropped, keeping labels and documents
//     positionally aligned
//
// Encoding happens eagerly at construction. The raw text is not
// retained: after this point only index tensors flow.

use burn::data::dataset::Dataset;

use crate::data::tokenize;
use crate::data::vocab::Vocabulary;
use crate::domain::document::LabeledDocument;

// ─── Samples ─────────────────────────────────────────────────────────────────

/// One flat encoded document: exactly `words_per_doc` indices.
#[derive(Debug, Clone)]
pub struct FlatSample {
    pub label: i64,
    pub words: Vec<i64>,
}

/// One hierarchical encoded document: exactly
/// `sent_per_doc` rows of `words_per_sent` indices each.
#[derive(Debug, Clone)]
pub struct HierSample {
    pub label: i64,
    pub sentences: Vec<Vec<i64>>,
}

// ─── Encoding ────────────────────────────────────────────────────────────────

fn encode_flat(text: &str, vocab: &Vocabulary, words_per_doc: usize) -> Vec<i64> {
    let pad = vocab.pad_index() as i64;
    let mut words: Vec<i64> = tokenize::word_tokenize(text)
        .iter()
        .take(words_per_doc)
        .map(|w| vocab.index_of(w) as i64)
        .collect();
    words.resize(words_per_doc, pad);
    words
}

fn encode_hier(
    text: &str,
    vocab: &Vocabulary,
    sent_per_doc: usize,
    words_per_sent: usize,
) -> Vec<Vec<i64>> {
    let pad = vocab.pad_index() as i64;
    let mut sentences: Vec<Vec<i64>> = tokenize::sent_word_tokenize(text)
        .iter()
        .take(sent_per_doc)
        .map(|sentence| {
            let mut row: Vec<i64> = sentence
                .iter()
                .take(words_per_sent)
                .map(|w| vocab.index_of(w) as i64)
                .collect();
            row.resize(words_per_sent, pad);
            row
        })
        .collect();
    // missing sentences become fully-PAD rows
    sentences.resize(sent_per_doc, vec![pad; words_per_sent]);
    sentences
}

// ─── Datasets ────────────────────────────────────────────────────────────────

/// Word-sequence dataset for the flat (FAN) model.
pub struct FlatDataset {
    samples: Vec<FlatSample>,
}

impl FlatDataset {
    pub fn new(docs: &[LabeledDocument], vocab: &Vocabulary, words_per_doc: usize) -> Self {
        let samples = docs
            .iter()
            .map(|doc| FlatSample {
                label: doc.label,
                words: encode_flat(&doc.text, vocab, words_per_doc),
            })
            .collect();
        Self { samples }
    }
}

impl Dataset<FlatSample> for FlatDataset {
    fn get(&self, index: usize) -> Option<FlatSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

/// Sentence-of-words dataset for the hierarchical (HAN) model.
pub struct HierarchicalDataset {
    samples: Vec<HierSample>,
}

impl HierarchicalDataset {
    pub fn new(
        docs: &[LabeledDocument],
        vocab: &Vocabulary,
        sent_per_doc: usize,
        words_per_sent: usize,
    ) -> Self {
        let samples = docs
            .iter()
            .map(|doc| HierSample {
                label: doc.label,
                sentences: encode_hier(&doc.text, vocab, sent_per_doc, words_per_sent),
            })
            .collect();
        Self { samples }
    }
}

impl Dataset<HierSample> for HierarchicalDataset {
    fn get(&self, index: usize) -> Option<HierSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::vocab::{tiny_vocab, UNK};

    #[test]
    fn test_flat_shape_matches_bound_regardless_of_length() {
        let vocab = tiny_vocab(&["good", "bad"]);
        // longer than the bound: truncated
        assert_eq!(encode_flat("good bad good bad good", &vocab, 3).len(), 3);
        // shorter: padded
        assert_eq!(encode_flat("good", &vocab, 3).len(), 3);
    }

    #[test]
    fn test_flat_truncates_from_the_end_preserving_order() {
        let vocab = tiny_vocab(&["good", "bad"]);
        let good = vocab.index_of("good") as i64;
        let bad = vocab.index_of("bad") as i64;
        assert_eq!(encode_flat("good bad good bad", &vocab, 2), vec![good, bad]);
    }

    #[test]
    fn test_flat_pads_at_the_end() {
        let vocab = tiny_vocab(&["good"]);
        let good = vocab.index_of("good") as i64;
        let pad = vocab.pad_index() as i64;
        assert_eq!(encode_flat("good", &vocab, 3), vec![good, pad, pad]);
    }

    #[test]
    fn test_oov_becomes_unk_never_an_error() {
        let vocab = tiny_vocab(&["good"]);
        let encoded = encode_flat("zyzzyva good", &vocab, 2);
        assert_eq!(encoded[0], vocab.unk_index() as i64);
        assert_eq!(vocab.word_of(encoded[0] as usize), Some(UNK));
    }

    #[test]
    fn test_empty_document_is_all_pad_not_a_failure() {
        let vocab = tiny_vocab(&[]);
        let pad = vocab.pad_index() as i64;
        assert_eq!(encode_flat("", &vocab, 4), vec![pad; 4]);
        assert_eq!(encode_hier("", &vocab, 2, 3), vec![vec![pad; 3]; 2]);
    }

    #[test]
    fn test_hier_shape_is_exact_grid() {
        let vocab = tiny_vocab(&["good", "bad"]);
        let grid = encode_hier("Good bad. Bad good. Good.", &vocab, 2, 2);
        assert_eq!(grid.len(), 2);
        assert!(grid.iter().all(|row| row.len() == 2));
    }

    #[test]
    fn test_hier_pads_missing_sentences() {
        let vocab = tiny_vocab(&["good"]);
        let pad = vocab.pad_index() as i64;
        let grid = encode_hier("good.", &vocab, 3, 2);
        assert_eq!(grid[1], vec![pad; 2]);
        assert_eq!(grid[2], vec![pad; 2]);
    }

    #[test]
    fn test_dataset_keeps_every_document() {
        let vocab = tiny_vocab(&["good"]);
        let docs = vec![
            LabeledDocument::new(0, "good good"),
            LabeledDocument::new(1, ""),
        ];
        let dataset = FlatDataset::new(&docs, &vocab, 3);
        assert_eq!(dataset.len(), 2);
        // label/document alignment is positional
        assert_eq!(dataset.get(1).unwrap().label, 1);
    }

    #[test]
    fn test_round_trip_decodes_to_original_or_unk() {
        let vocab = tiny_vocab(&["good", "fine"]);
        let encoded = encode_flat("good zyzzyva fine", &vocab, 3);
        let decoded: Vec<&str> = encoded
            .iter()
            .map(|&i| vocab.word_of(i as usize).unwrap())
            .collect();
        assert_eq!(decoded, vec!["good", UNK, "fine"]);
    }
}
