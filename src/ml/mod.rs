// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code apart
// from the Dataset/Batcher glue in Layer 4.
//
// What's in this layer:
//
//   encoder.rs   — The attention encoder building block:
//                  bi-directional GRU annotations, learned
//                  context-vector attention, weighted sum.
//
//   model.rs     — FAN (one word-level encoder) and HAN (word
//                  encoder per sentence + sentence encoder),
//                  both behind the DocumentModel trait so one
//                  training loop serves both.
//
//   loss.rs      — Negative log-likelihood over log-softmax
//                  outputs, plus prediction counting.
//
//   window.rs    — Fixed-capacity rolling window for the
//                  recent-batches training statistics.
//
//   scheduler.rs — Reduce-LR-on-plateau controller.
//
//   stopping.rs  — Early-stopping state machine with
//                  best-snapshot bookkeeping.
//
//   trainer.rs   — The epoch loop tying all of it together.
//
// Reference: Yang et al. (2016) Hierarchical Attention Networks
//            for Document Classification

use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};

use crate::domain::selectors::DeviceSelector;

/// Attention encoder building block
pub mod encoder;

/// FAN and HAN classifiers
pub mod model;

/// Classification loss and accuracy helpers
pub mod loss;

/// Rolling window over recent batch statistics
pub mod window;

/// Adaptive learning-rate reduction
pub mod scheduler;

/// Early stopping with best-snapshot rollback
pub mod stopping;

/// The training loop
pub mod trainer;

// One in-process backend pair: plain NdArray for inference and
// validation, its autodiff wrapper for training.
pub type InnerBackend = NdArray<f32>;
pub type TrainBackend = Autodiff<InnerBackend>;

/// Resolve the configured device selector to a burn device.
pub fn resolve_device(selector: DeviceSelector) -> NdArrayDevice {
    match selector {
        DeviceSelector::Cpu => NdArrayDevice::Cpu,
    }
}
