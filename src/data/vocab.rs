// ============================================================
// Layer 4 — Vocabulary and Pretrained Embeddings
// ============================================================
// The vocabulary maps a word to the row index of its pretrained
// embedding vector. It is produced by an external word-embedding
// trainer and loaded here read-only; the model fine-tunes the
// vectors but this table itself never changes after loading.
//
// Two entries are reserved and must exist in every embedding
// file:
//   PAD — fills the empty slots created by padding
//   UNK — the target of every out-of-vocabulary lookup
//
// Because every unknown word maps to UNK, index lookup is total:
// it cannot fail on any input text.
//
// File format (gensim save_word2vec_format, text mode):
//   <word_count> <dim>
//   word v1 v2 ... v<dim>
//   ...

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reserved padding word.
pub const PAD: &str = "PAD";
/// Reserved out-of-vocabulary word.
pub const UNK: &str = "UNK";

/// Immutable word → embedding-row mapping plus the embedding
/// rows themselves (row-major `len() * dim()` floats).
pub struct Vocabulary {
    index: HashMap<String, usize>,
    words: Vec<String>,
    vectors: Vec<f32>,
    dim: usize,
    pad_index: usize,
    unk_index: usize,
}

impl Vocabulary {
    /// Build from parallel word/vector lists. All vectors must
    /// share one dimensionality and PAD/UNK must be present.
    pub fn from_entries(entries: Vec<(String, Vec<f32>)>) -> Result<Self> {
        anyhow::ensure!(!entries.is_empty(), "vocabulary is empty");
        let dim = entries[0].1.len();
        anyhow::ensure!(dim > 0, "embedding dimension is zero");

        let mut index = HashMap::with_capacity(entries.len());
        let mut words = Vec::with_capacity(entries.len());
        let mut vectors = Vec::with_capacity(entries.len() * dim);

        for (word, vector) in entries {
            anyhow::ensure!(
                vector.len() == dim,
                "embedding row for '{word}' has {} values, expected {dim}",
                vector.len()
            );
            anyhow::ensure!(
                !index.contains_key(&word),
                "duplicate vocabulary entry '{word}'"
            );
            index.insert(word.clone(), words.len());
            words.push(word);
            vectors.extend_from_slice(&vector);
        }

        let pad_index = *index
            .get(PAD)
            .with_context(|| format!("vocabulary is missing the reserved '{PAD}' entry"))?;
        let unk_index = *index
            .get(UNK)
            .with_context(|| format!("vocabulary is missing the reserved '{UNK}' entry"))?;

        Ok(Self { index, words, vectors, dim, pad_index, unk_index })
    }

    /// Load a word2vec text-format embedding file.
    pub fn from_word2vec_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("cannot open embedding file '{}'", path.display()))?;
        let mut lines = BufReader::new(file).lines();

        // Header: "<count> <dim>"
        let header = lines
            .next()
            .context("embedding file is empty")?
            .context("cannot read embedding file header")?;
        let mut parts = header.split_whitespace();
        let count: usize = parts
            .next()
            .and_then(|s| s.parse().ok())
            .context("embedding header is missing the word count")?;
        let dim: usize = parts
            .next()
            .and_then(|s| s.parse().ok())
            .context("embedding header is missing the dimension")?;

        let mut entries = Vec::with_capacity(count);
        for line in lines {
            let line = line.context("cannot read embedding row")?;
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let word = fields
                .next()
                .context("embedding row is missing the word column")?
                .to_string();
            let vector: Vec<f32> = fields
                .map(|v| {
                    v.parse::<f32>()
                        .with_context(|| format!("bad embedding value for '{word}'"))
                })
                .collect::<Result<_>>()?;
            anyhow::ensure!(
                vector.len() == dim,
                "embedding row for '{word}' has {} values, header says {dim}",
                vector.len()
            );
            entries.push((word, vector));
        }

        tracing::info!(
            "Loaded {} embedding rows of dimension {} from '{}'",
            entries.len(),
            dim,
            path.display()
        );
        Self::from_entries(entries)
    }

    /// Total index lookup: unknown words map to UNK's index.
    pub fn index_of(&self, word: &str) -> usize {
        *self.index.get(word).unwrap_or(&self.unk_index)
    }

    /// Inverse mapping, for decoding index sequences back to words.
    pub fn word_of(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn pad_index(&self) -> usize {
        self.pad_index
    }

    pub fn unk_index(&self) -> usize {
        self.unk_index
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Embedding dimensionality.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Row-major embedding matrix data, `len() * dim()` floats.
    /// The model copies this into a trainable parameter.
    pub fn embedding_rows(&self) -> &[f32] {
        &self.vectors
    }
}

/// Small fixed vocabulary for unit tests across the crate:
/// PAD, UNK, then the given words, 2-dimensional vectors.
#[cfg(test)]
pub(crate) fn tiny_vocab(extra: &[&str]) -> Vocabulary {
    let mut entries = vec![
        (PAD.to_string(), vec![0.0, 0.0]),
        (UNK.to_string(), vec![0.1, -0.1]),
    ];
    for (i, word) in extra.iter().enumerate() {
        let v = 0.1 * (i as f32 + 1.0);
        entries.push((word.to_string(), vec![v, -v]));
    }
    Vocabulary::from_entries(entries).unwrap()
}
