// ============================================================
// Layer 4 — Label Encoder
// ============================================================
// Maps categorical sentiment labels to contiguous integer codes.
//
// Codes are assigned in lexicographic order of the distinct labels
// seen during fit, so one corpus always produces one mapping.
// Transforming a label that was absent during fit is a fatal
// UnknownLabel error — never silently coerced.

use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;

// ─── LabelEncoder ─────────────────────────────────────────────────────────────
/// Bijective label ↔ code mapping for one training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    /// classes[code] = label; sorted lexicographically at fit time
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Observe the distinct labels present and fix their codes.
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut classes: Vec<String> =
            labels.iter().map(|l| l.as_ref().to_string()).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Number of distinct classes seen during fit.
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Code for a single label.
    pub fn encode(&self, label: &str) -> Result<u32, PipelineError> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map(|i| i as u32)
            .map_err(|_| PipelineError::UnknownLabel(label.to_string()))
    }

    /// Codes for a batch of labels; fails on the first unseen label.
    pub fn transform<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<u32>, PipelineError> {
        labels.iter().map(|l| self.encode(l.as_ref())).collect()
    }

    /// The label behind a code, if the code is in range.
    pub fn decode(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(|s| s.as_str())
    }
}
