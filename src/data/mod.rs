// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between raw CSV partitions on disk and tensor
// batches: loading, vocabulary/sequence encoding, label encoding,
// and the dataset/batcher glue.

// Partitioned CSV corpus loading
pub mod loader;

// Word→index vocabulary and fixed-length sequence encoding
pub mod tokenizer;

// Categorical label → integer code mapping
pub mod labels;

// Encoded samples + Burn Dataset impl
pub mod dataset;

// Samples → tensors
pub mod batcher;
