// ============================================================
// Layer 4 — Batchers
// ============================================================
// Implements burn's Batcher trait to stack already-encoded
// samples into Int tensors. All sequences were padded to the
// same fixed bounds by the dataset, so batching is a pure
// flatten-and-reshape:
//
//   flat:  N samples of W indices        → [N, W]
//   hier:  N samples of S×W index grids  → [N, S, W]
//
// Labels ride along as a [N] tensor; a batch is atomic, the
// labels and documents always share their first dimension.

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::{FlatSample, HierSample};

// ─── Label access shared by both batch shapes ────────────────────────────────

/// A batch whose first dimension carries one label per document.
/// The generic training loop only needs this view plus the
/// model-specific forward pass.
pub trait LabeledBatch<B: Backend> {
    fn labels(&self) -> Tensor<B, 1, Int>;
    /// Number of documents in the batch.
    fn size(&self) -> usize;
}

// ─── Flat batches ────────────────────────────────────────────────────────────

/// A batch of flat encoded documents.
#[derive(Debug, Clone)]
pub struct FlatBatch<B: Backend> {
    /// Class labels — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
    /// Word index sequences — shape: [batch_size, words_per_doc]
    pub documents: Tensor<B, 2, Int>,
}

impl<B: Backend> LabeledBatch<B> for FlatBatch<B> {
    fn labels(&self) -> Tensor<B, 1, Int> {
        self.labels.clone()
    }

    fn size(&self) -> usize {
        self.labels.dims()[0]
    }
}

/// Stacks FlatSamples into a FlatBatch on the held device.
#[derive(Clone, Debug)]
pub struct FlatBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> FlatBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<FlatSample, FlatBatch<B>> for FlatBatcher<B> {
    fn batch(&self, items: Vec<FlatSample>) -> FlatBatch<B> {
        // the loader never emits an empty batch
        assert!(!items.is_empty(), "cannot batch zero samples");
        let batch_size = items.len();
        let words_per_doc = items[0].words.len();

        let word_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.words.iter().map(|&w| w as i32))
            .collect();
        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        FlatBatch {
            labels: Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device),
            documents: Tensor::<B, 1, Int>::from_ints(word_flat.as_slice(), &self.device)
                .reshape([batch_size, words_per_doc]),
        }
    }
}

// ─── Hierarchical batches ────────────────────────────────────────────────────

/// A batch of hierarchical encoded documents.
#[derive(Debug, Clone)]
pub struct HierBatch<B: Backend> {
    /// Class labels — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
    /// Word index grids — shape: [batch_size, sent_per_doc, words_per_sent]
    pub documents: Tensor<B, 3, Int>,
}

impl<B: Backend> LabeledBatch<B> for HierBatch<B> {
    fn labels(&self) -> Tensor<B, 1, Int> {
        self.labels.clone()
    }

    fn size(&self) -> usize {
        self.labels.dims()[0]
    }
}

/// Stacks HierSamples into a HierBatch on the held device.
#[derive(Clone, Debug)]
pub struct HierBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> HierBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<HierSample, HierBatch<B>> for HierBatcher<B> {
    fn batch(&self, items: Vec<HierSample>) -> HierBatch<B> {
        // the loader never emits an empty batch
        assert!(!items.is_empty(), "cannot batch zero samples");
        let batch_size = items.len();
        let sent_per_doc = items[0].sentences.len();
        let words_per_sent = items[0].sentences[0].len();

        let word_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.sentences.iter())
            .flat_map(|row| row.iter().map(|&w| w as i32))
            .collect();
        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        HierBatch {
            labels: Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device),
            documents: Tensor::<B, 1, Int>::from_ints(word_flat.as_slice(), &self.device)
                .reshape([batch_size, sent_per_doc, words_per_sent]),
        }
    }
}
