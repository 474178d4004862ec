// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from raw CSV rows to tensor batches.
//
// The pipeline flows in this order:
//
//   {dataset}_train.csv / _val.csv / _test.csv
//       │
//       ▼
//   CsvCorpus              → reads rows into LabeledDocuments
//       │
//       ▼
//   tokenize               → lower-cases, splits into words
//       │                    (or sentences of words for HAN)
//       ▼
//   Vocabulary             → maps words to embedding indices,
//       │                    OOV words to UNK, never fails
//       ▼
//   FlatDataset /          → pads + truncates to the fixed
//   HierarchicalDataset      bounds, implements burn Dataset
//       │
//       ▼
//   FlatBatcher /          → stacks samples into Int tensors
//   HierBatcher
//       │
//       ▼
//   DataLoader             → shuffles and feeds the train loop
//
// Each module is responsible for exactly one step.

/// Reads `label,text` CSV corpus splits
pub mod corpus;

/// Word and sentence tokenisation (UAX#29 boundaries)
pub mod tokenize;

/// Vocabulary with PAD/UNK and pretrained embedding rows
pub mod vocab;

/// Fixed-shape encoding + burn Dataset implementations
pub mod dataset;

/// Burn Batcher implementations producing index tensors
pub mod batcher;

/// Keyword-planted synthetic corpus generator
pub mod synthetic;

/// Corpus length statistics for choosing padding bounds
pub mod stats;
