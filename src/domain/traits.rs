// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types we
// can swap implementations without touching the callers:
//   - CsvCorpus implements CorpusSource
//   - a future ParquetCorpus could implement it too
//   - the application layer only ever sees CorpusSource

use anyhow::Result;

use crate::domain::document::LabeledDocument;

/// The three corpus splits every dataset provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split {
    Train,
    Validation,
    Test,
}

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can produce the labelled documents of a split.
///
/// Implementations:
///   - CsvCorpus → reads `label,text` CSV files
pub trait CorpusSource {
    /// Load every document of the split, in file order.
    /// Documents with empty text are kept, never dropped.
    fn load_split(&self, split: Split) -> Result<Vec<LabeledDocument>>;
}
