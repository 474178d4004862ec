// ============================================================
// Layer 3 — Run Selectors
// ============================================================
// The dataset, model kind, and padding bounds are each chosen
// exactly once, at configuration time, and resolved into these
// tagged enums. Everything downstream matches on the enum —
// there is no string comparison scattered across call sites.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ─── Dataset selector ────────────────────────────────────────────────────────

/// Which corpus to train on. Each selector maps to a fixed set
/// of file names under the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetSelector {
    Yelp,
    Yahoo,
    Amazon,
    Synthetic,
}

/// Resolved file locations for one dataset.
#[derive(Debug, Clone)]
pub struct DatasetPaths {
    pub train_csv: PathBuf,
    pub val_csv: PathBuf,
    pub test_csv: PathBuf,
    /// Pretrained embeddings in word2vec text format
    pub embedding_file: PathBuf,
}

impl DatasetSelector {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetSelector::Yelp => "yelp",
            DatasetSelector::Yahoo => "yahoo",
            DatasetSelector::Amazon => "amazon",
            DatasetSelector::Synthetic => "synthetic",
        }
    }

    /// File layout convention: `{data_dir}/{name}_train.csv` etc.,
    /// embeddings at `{data_dir}/{name}.vec`.
    pub fn paths(&self, data_dir: &str) -> DatasetPaths {
        let dir = PathBuf::from(data_dir);
        let name = self.as_str();
        DatasetPaths {
            train_csv: dir.join(format!("{name}_train.csv")),
            val_csv: dir.join(format!("{name}_val.csv")),
            test_csv: dir.join(format!("{name}_test.csv")),
            embedding_file: dir.join(format!("{name}.vec")),
        }
    }
}

// ─── Model kind ──────────────────────────────────────────────────────────────

/// Flat (FAN) or hierarchical (HAN) architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Fan,
    Han,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Fan => "fan",
            ModelKind::Han => "han",
        }
    }
}

// ─── Device selector ─────────────────────────────────────────────────────────

/// Which compute device to run on. Only CPU is available with the
/// ndarray backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSelector {
    Cpu,
}

// ─── Padding bounds ──────────────────────────────────────────────────────────

/// The fixed tensor shape every document is padded/truncated to.
/// Flat documents are a single word sequence; hierarchical
/// documents are a sentence-of-words grid. The same bounds are
/// applied to train, validation, and test splits so the input
/// distribution cannot drift between phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaddingSpec {
    Flat { words_per_doc: usize },
    Hierarchical { sent_per_doc: usize, words_per_sent: usize },
}

impl PaddingSpec {
    /// Short key used in checkpoint file names, e.g. "100w" or "15s25w".
    pub fn key(&self) -> String {
        match self {
            PaddingSpec::Flat { words_per_doc } => format!("{words_per_doc}w"),
            PaddingSpec::Hierarchical { sent_per_doc, words_per_sent } => {
                format!("{sent_per_doc}s{words_per_sent}w")
            }
        }
    }
}
