// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer consumes corpora through this trait so the
// concrete storage format stays a data-layer concern.
//
// Implementations:
//   - PartitionedCsvLoader → reads part-* CSV shards from a work dir
//   - in tests, small in-memory sources

use anyhow::Result;

use crate::domain::sentiment::CorpusRow;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can produce a normalized (text, label) corpus.
pub trait CorpusSource {
    /// Load every valid row from this source. Rows with a missing or
    /// empty field never appear in the returned Vec.
    fn load_all(&self) -> Result<Vec<CorpusRow>>;
}
