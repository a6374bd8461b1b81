// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust types that define what the system talks about:
// corpus rows, the sentiment taxonomy, the error kinds, and the
// trait seams other layers implement.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain structs, enums, and traits

// Sentiment taxonomy, thresholds, and the raw corpus row
pub mod sentiment;

// Typed fatal errors for the whole pipeline
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
