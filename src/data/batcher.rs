// ============================================================
// Layer 4 — Sentiment Batcher
// ============================================================
// Implements Burn's Batcher trait: stacks a Vec of encoded
// samples into the tensors one forward pass consumes.
//
//   input_ids: [batch, seq_len]  (Int) — every row pre-padded
//   labels:    [batch]           (Int) — 0/1 class codes
//
// All sequences already share one length, so stacking is a flat
// collect + reshape and no dynamic padding happens here.

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::SentimentSample;

// ─── SentimentBatch ───────────────────────────────────────────────────────────
/// A batch of encoded samples ready for the model.
#[derive(Debug, Clone)]
pub struct SentimentBatch<B: Backend> {
    /// Token index sequences — shape [batch, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// Label codes — shape [batch]
    pub labels: Tensor<B, 1, Int>,
}

// ─── SentimentBatcher ─────────────────────────────────────────────────────────
/// Holds the target device so tensors land where the model runs.
#[derive(Clone, Debug)]
pub struct SentimentBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> SentimentBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SentimentSample, SentimentBatch<B>> for SentimentBatcher<B> {
    fn batch(&self, items: Vec<SentimentSample>) -> SentimentBatch<B> {
        let batch_size = items.len();
        let seq_len = items[0].input_ids.len();

        let ids_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.input_ids.iter().map(|&id| id as i32))
            .collect();

        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let input_ids = Tensor::<B, 1, Int>::from_ints(ids_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);

        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        SentimentBatch { input_ids, labels }
    }
}
