// ============================================================
// Layer 6 — Infrastructure
// ============================================================
// Everything that touches the filesystem on behalf of a training
// run lives here:
//
//   checkpoint.rs — model weights (burn CompactRecorder) and the
//                   JSON run record needed to rebuild the model
//                   for later evaluation
//   metrics.rs    — per-epoch metrics CSV and the free-text
//                   hyperparameter summary

/// Model checkpoints and run records
pub mod checkpoint;

/// Training metrics persistence
pub mod metrics;
