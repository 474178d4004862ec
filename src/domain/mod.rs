// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust types that define the core concepts of the system.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain structs, enums, and traits
//
// This layer says what things ARE (a labelled document, a model
// kind, a padding policy), not how they are computed.

// A raw document with its class label
pub mod document;

// Dataset / model / padding selectors resolved once at startup
pub mod selectors;

// Abstractions (traits) that other layers implement
pub mod traits;
