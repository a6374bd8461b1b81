// ============================================================
// Layer 4 — Sentiment Dataset
// ============================================================
// Fully encoded training samples plus Burn's Dataset impl so the
// DataLoader can batch them.

use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One encoded sample: a fixed-length index sequence and its
/// 0/1 label code. The sequence length is uniform across a run —
/// the tokenizer guarantees it, the batcher relies on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentSample {
    pub input_ids: Vec<u32>,
    pub label: u32,
}

impl SentimentSample {
    pub fn new(input_ids: Vec<u32>, label: u32) -> Self {
        Self { input_ids, label }
    }
}

pub struct SentimentDataset {
    samples: Vec<SentimentSample>,
}

impl SentimentDataset {
    pub fn new(samples: Vec<SentimentSample>) -> Self {
        Self { samples }
    }

    /// Zip encoded sequences with their label codes.
    pub fn from_encoded(sequences: Vec<Vec<u32>>, labels: Vec<u32>) -> Self {
        let samples = sequences
            .into_iter()
            .zip(labels)
            .map(|(ids, label)| SentimentSample::new(ids, label))
            .collect();
        Self { samples }
    }
}

impl Dataset<SentimentSample> for SentimentDataset {
    fn get(&self, index: usize) -> Option<SentimentSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
