// ============================================================
// Layer 4 — Synthetic Corpus Generator
// ============================================================
// Builds a 5-class toy corpus where each document is filler
// text with exactly one class-specific keyword planted into one
// of its sentences. A model that learns anything at all must
// learn to attend to that keyword, which makes this corpus a
// fast sanity check for the whole pipeline.
//
// Output files under the data directory:
//   synthetic_train.csv / synthetic_val.csv / synthetic_test.csv
//     (stratified 80/10/10 split, `label,text` columns)
//   synthetic.vec
//     random-vector embeddings for the generated vocabulary,
//     standing in for the external word-embedding trainer so
//     the synthetic dataset is trainable out of the box

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal};
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::data::tokenize;
use crate::data::vocab::{PAD, UNK};
use crate::domain::document::LabeledDocument;

/// One keyword list per class; the planted keyword is drawn
/// uniformly from the document's class list.
const KEYWORDS: [&[&str]; 5] = [
    &["bad", "worst", "dirty", "irritating", "disgusting"],
    &["vague", "vain", "untouchable", "selfish", "rude"],
    &["perverse", "possessive", "arrogant", "cruel", "calm"],
    &["clever", "comfortable", "creative", "clean", "gentle"],
    &["nice", "fantastic", "good", "modern", "quite"],
];

/// Filler words the neutral sentences are sampled from.
const LEXICON: &[&str] = &[
    "the", "a", "room", "service", "table", "day", "place", "time", "staff",
    "order", "menu", "visit", "evening", "window", "street", "coffee", "price",
    "plate", "music", "corner", "light", "water", "bread", "again", "always",
    "never", "very", "really", "was", "were", "felt", "seemed", "looked",
];

/// Fraction of documents per class going to the train split;
/// the remainder is halved between validation and test.
const TRAIN_FRACTION: f64 = 0.8;

/// Generate the corpus and its stand-in embedding file.
pub fn generate(data_dir: &str, num_samples: usize, embedding_dim: usize, seed: u64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let per_class = num_samples / KEYWORDS.len();
    anyhow::ensure!(per_class > 0, "num_samples must be at least {}", KEYWORDS.len());

    let dir = Path::new(data_dir);
    fs::create_dir_all(dir)
        .with_context(|| format!("cannot create data directory '{}'", dir.display()))?;

    // One shuffled, stratified split per class so every split
    // sees every label.
    let mut train = Vec::new();
    let mut val = Vec::new();
    let mut test = Vec::new();
    for label in 0..KEYWORDS.len() {
        let mut docs: Vec<LabeledDocument> = (0..per_class)
            .map(|_| LabeledDocument::new(label as i64, generate_document(&mut rng, label)))
            .collect();
        docs.shuffle(&mut rng);

        let n_train = ((docs.len() as f64) * TRAIN_FRACTION).round() as usize;
        let n_val = (docs.len() - n_train) / 2;
        for (i, doc) in docs.into_iter().enumerate() {
            if i < n_train {
                train.push(doc);
            } else if i < n_train + n_val {
                val.push(doc);
            } else {
                test.push(doc);
            }
        }
    }
    train.shuffle(&mut rng);
    val.shuffle(&mut rng);
    test.shuffle(&mut rng);

    write_csv(&dir.join("synthetic_train.csv"), &train)?;
    write_csv(&dir.join("synthetic_val.csv"), &val)?;
    write_csv(&dir.join("synthetic_test.csv"), &test)?;

    write_embeddings(&dir.join("synthetic.vec"), &train, &val, embedding_dim, &mut rng)?;

    tracing::info!(
        "Synthetic corpus written: {} train, {} val, {} test documents",
        train.len(),
        val.len(),
        test.len()
    );
    Ok(())
}

/// A document is a handful of filler sentences with one keyword
/// inserted at a random non-final position of a random sentence.
fn generate_document(rng: &mut StdRng, label: usize) -> String {
    // sentence counts roughly log-normal, mode around 7
    let sent_dist = LogNormal::new(2.0, 0.3).expect("valid log-normal parameters");
    let num_sentences = (sent_dist.sample(rng) as usize).max(1);

    let mut sentences: Vec<Vec<&str>> = (0..num_sentences)
        .map(|_| {
            let len = rng.gen_range(4..10);
            let mut words: Vec<&str> = (0..len)
                .map(|_| LEXICON[rng.gen_range(0..LEXICON.len())])
                .collect();
            words.push(".");
            words
        })
        .collect();

    let keyword = KEYWORDS[label][rng.gen_range(0..KEYWORDS[label].len())];
    let target = rng.gen_range(0..sentences.len());
    // exclude the final position, it holds the full stop
    let slot = rng.gen_range(0..sentences[target].len() - 1);
    sentences[target].insert(slot, keyword);

    sentences
        .iter()
        .map(|words| words.join(" "))
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_csv(path: &Path, docs: &[LabeledDocument]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("cannot create '{}'", path.display()))?;
    for doc in docs {
        writer.serialize(doc)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a word2vec text-format file with small random vectors
/// for every word seen in the train+validation text, plus the
/// reserved PAD and UNK rows. This replaces the external
/// embedding trainer for the synthetic dataset only; real
/// datasets bring their own pretrained file.
fn write_embeddings(
    path: &Path,
    train: &[LabeledDocument],
    val: &[LabeledDocument],
    dim: usize,
    rng: &mut StdRng,
) -> Result<()> {
    let mut words: BTreeSet<String> = BTreeSet::new();
    for doc in train.iter().chain(val.iter()) {
        words.extend(tokenize::word_tokenize(&doc.text));
    }

    let mut out = String::new();
    writeln!(out, "{} {dim}", words.len() + 2)?;
    // PAD starts at zero so padding slots begin inert
    writeln!(out, "{PAD}{}", " 0.0".repeat(dim))?;
    let mut random_row = |out: &mut String, word: &str| -> Result<()> {
        write!(out, "{word}")?;
        for _ in 0..dim {
            write!(out, " {:.6}", rng.gen_range(-0.5..0.5))?;
        }
        writeln!(out)?;
        Ok(())
    };
    random_row(&mut out, UNK)?;
    for word in &words {
        random_row(&mut out, word)?;
    }

    fs::write(path, out).with_context(|| format!("cannot write '{}'", path.display()))?;
    Ok(())
}
