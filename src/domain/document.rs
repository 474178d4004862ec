// ============================================================
// Layer 3 — Labelled Document Domain Type
// ============================================================
// One row of a corpus split: a class label and the raw text.
// The serde derives map directly onto the CSV column headers
// (`label,text`), so the corpus loader can deserialize rows
// into this struct without any glue code.

use serde::{Deserialize, Serialize};

/// A raw document paired with its integer class label.
///
/// The text is consumed exactly once by the padding pipeline
/// (tokenised, index-mapped, then discarded); it is never
/// mutated. An empty text cell is a valid document and encodes
/// to an all-PAD tensor rather than being dropped, so labels
/// and documents stay positionally aligned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledDocument {
    /// Class index, expected dense in [0, num_classes)
    pub label: i64,

    /// The full raw document text before tokenisation
    #[serde(default)]
    pub text: String,
}

impl LabeledDocument {
    pub fn new(label: i64, text: impl Into<String>) -> Self {
        Self { label, text: text.into() }
    }
}
