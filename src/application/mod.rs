// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestration only: each use case wires the data layer, the
// models and the infrastructure together for one user-visible
// operation. No tensor math happens here.

/// Train a classifier end to end
pub mod train_use_case;

/// Score a trained checkpoint on the held-out test split
pub mod eval_use_case;
