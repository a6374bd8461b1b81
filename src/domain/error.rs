// ============================================================
// Layer 3 — Pipeline Errors
// ============================================================
// Every fatal condition the training pipeline can hit, as one
// typed enum. All of these abort the whole run — a half-processed
// corpus would leave the vocabulary and label mappings inconsistent,
// so nothing here is retried or skipped per-row.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The corpus produced no token meeting the minimum-frequency
    /// threshold, so there is nothing to embed. Raised before any
    /// classifier construction happens.
    #[error(
        "no token occurs at least {min_count} times in the corpus; \
         cannot build an embedding vocabulary"
    )]
    EmptyVocabulary { min_count: usize },

    /// A label showed up during transform that was never seen during fit.
    #[error("unknown label '{0}' — not present when the encoder was fitted")]
    UnknownLabel(String),

    /// The label encoder fitted a number of classes the binary
    /// classifier cannot train on. Detected before training starts.
    #[error("binary training requires exactly 2 label classes, found {0}")]
    LabelCardinality(usize),

    /// Writing the tokenizer or model artifact failed. A run that hits
    /// this is failed even if some artifacts were already written.
    #[error("failed to write artifact '{path}': {reason}")]
    ArtifactWrite { path: String, reason: String },

    /// Training loss became NaN or infinite. Not retried.
    #[error("non-finite training loss at epoch {epoch}")]
    NonFiniteLoss { epoch: usize },
}
