// ============================================================
// Layer 4 — CSV Corpus Source
// ============================================================
// Loads the train/validation/test splits of a dataset from CSV
// files with a `label,text` header row. Deserialisation goes
// through serde straight into LabeledDocument, so column order
// does not matter and missing text cells become "".
//
// I/O failures are surfaced to the caller with context; this
// layer never retries.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

use crate::domain::document::LabeledDocument;
use crate::domain::selectors::DatasetPaths;
use crate::domain::traits::{CorpusSource, Split};

/// Corpus backed by the three CSV split files of one dataset.
pub struct CsvCorpus {
    paths: DatasetPaths,
}

impl CsvCorpus {
    pub fn new(paths: DatasetPaths) -> Self {
        Self { paths }
    }

    fn read_csv(path: &Path) -> Result<Vec<LabeledDocument>> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("cannot open corpus file '{}'", path.display()))?;

        let mut docs = Vec::new();
        for row in reader.deserialize() {
            let doc: LabeledDocument = row
                .with_context(|| format!("malformed row in '{}'", path.display()))?;
            docs.push(doc);
        }

        tracing::debug!("Loaded {} documents from '{}'", docs.len(), path.display());
        Ok(docs)
    }
}

impl CorpusSource for CsvCorpus {
    fn load_split(&self, split: Split) -> Result<Vec<LabeledDocument>> {
        let path = match split {
            Split::Train => &self.paths.train_csv,
            Split::Validation => &self.paths.val_csv,
            Split::Test => &self.paths.test_csv,
        };
        Self::read_csv(path)
    }
}

/// Derive the number of classes from the labels of the training
/// split. Labels must form the dense range [0, k); anything else
/// is a configuration error that would silently corrupt the
/// classification head, so it fails fast here.
pub fn num_classes(docs: &[LabeledDocument]) -> Result<usize> {
    let distinct: BTreeSet<i64> = docs.iter().map(|d| d.label).collect();
    let k = distinct.len();
    anyhow::ensure!(k > 0, "training split contains no documents");

    for &label in &distinct {
        anyhow::ensure!(
            label >= 0 && (label as usize) < k,
            "labels must be dense in [0, {k}), found label {label}"
        );
    }
    Ok(k)
}

/// Check that every label of a non-training split falls inside
/// the class range the model was (or will be) trained with. An
/// out-of-range label would otherwise surface much later as an
/// out-of-bounds index inside the backend.
pub fn ensure_labels_within(
    docs: &[LabeledDocument],
    num_classes: usize,
    split_name: &str,
) -> Result<()> {
    for doc in docs {
        anyhow::ensure!(
            doc.label >= 0 && (doc.label as usize) < num_classes,
            "{split_name} split contains label {} outside the training range 0..{num_classes}",
            doc.label
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(label: i64) -> LabeledDocument {
        LabeledDocument::new(label, "text")
    }

    #[test]
    fn test_num_classes_dense() {
        let docs = vec![doc(0), doc(2), doc(1), doc(1)];
        assert_eq!(num_classes(&docs).unwrap(), 3);
    }

    #[test]
    fn test_num_classes_rejects_gaps() {
        // labels {0, 2} are not dense: 2 >= k (k = 2)
        let docs = vec![doc(0), doc(2)];
        assert!(num_classes(&docs).is_err());
    }

    #[test]
    fn test_num_classes_rejects_negative() {
        let docs = vec![doc(-1), doc(0)];
        assert!(num_classes(&docs).is_err());
    }

    #[test]
    fn test_num_classes_rejects_empty_split() {
        assert!(num_classes(&[]).is_err());
    }

    #[test]
    fn test_labels_within_range_accepted() {
        let docs = vec![doc(0), doc(2), doc(1)];
        assert!(ensure_labels_within(&docs, 3, "test").is_ok());
    }

    #[test]
    fn test_out_of_range_label_is_a_clear_error() {
        let docs = vec![doc(0), doc(3)];
        let err = ensure_labels_within(&docs, 3, "test").unwrap_err();
        assert!(err.to_string().contains("label 3"));
        assert!(err.to_string().contains("0..3"));
    }

    #[test]
    fn test_negative_label_rejected_in_any_split() {
        let docs = vec![doc(-1)];
        assert!(ensure_labels_within(&docs, 3, "validation").is_err());
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = std::env::temp_dir().join("doc_attn_corpus_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tiny.csv");
        std::fs::write(&path, "label,text\n1,\"hello there\"\n0,\n").unwrap();

        let docs = CsvCorpus::read_csv(&path).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].label, 1);
        assert_eq!(docs[0].text, "hello there");
        // empty text cell is kept as an empty document
        assert_eq!(docs[1].label, 0);
        assert_eq!(docs[1].text, "");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = CsvCorpus::read_csv(Path::new("no/such/file.csv"));
        assert!(err.is_err());
    }
}
