// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Drives epochs over the encoded corpus with Burn's DataLoader
// and Adam, consulting the TrainingController at every epoch
// boundary for the learning rate and the early-stop decision.
//
// Backend split:
//   - Training runs on Autodiff<NdArray> for gradients
//   - Validation/eval use model.valid() on the inner backend,
//     which also disables dropout for deterministic measurement
//
// An epoch consumes at most `steps` mini-batches of `batch_size`
// from the shuffled training split. Non-finite loss is fatal:
// the run transitions to FAILED and nothing is retried.

use std::sync::Arc;

use anyhow::Result;
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};
use ndarray::Array2;

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{SentimentBatch, SentimentBatcher},
    dataset::SentimentDataset,
};
use crate::domain::error::PipelineError;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::controller::{RunState, TrainingController};
use crate::ml::model::{SentimentModel, SentimentModelConfig};

pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;
pub type EvalBackend = burn::backend::NdArray;

/// How a training run ended.
#[derive(Debug)]
pub struct TrainReport {
    pub state: RunState,
    pub epochs_run: usize,
}

/// Train the classifier, returning the final model and a run report.
pub fn run_training(
    cfg: &TrainConfig,
    model_cfg: &SentimentModelConfig,
    embedding_matrix: &Array2<f32>,
    train_dataset: SentimentDataset,
    val_dataset: SentimentDataset,
    metrics: &MetricsLogger,
) -> Result<(SentimentModel<TrainBackend>, TrainReport)> {
    let device = Default::default();

    let mut model: SentimentModel<TrainBackend> = model_cfg.init(embedding_matrix, &device);
    tracing::info!(
        "Model ready: vocab={}, dim={}, hidden={}",
        model_cfg.vocab_size,
        model_cfg.embedding_dim,
        model_cfg.hidden_size,
    );

    let optim_cfg = AdamConfig::new().with_epsilon(1e-8);
    let mut optim = optim_cfg.init();
    let mut controller = TrainingController::new(cfg.lr);

    let train_batcher = SentimentBatcher::<TrainBackend>::new(device);
    let train_loader = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(42)
        .num_workers(1)
        .build(train_dataset);

    let val_batcher = SentimentBatcher::<EvalBackend>::new(Default::default());
    let val_loader = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    let mut epochs_run = 0usize;

    for epoch in 1..=cfg.epochs {
        epochs_run = epoch;

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches = 0usize;

        for batch in train_loader.iter().take(cfg.steps) {
            let (loss, _) = model.forward_loss(batch.input_ids, batch.labels);
            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();

            if !loss_val.is_finite() {
                controller.fail();
                return Err(PipelineError::NonFiniteLoss { epoch }.into());
            }
            train_loss_sum += loss_val;
            train_batches += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(controller.lr(), model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else {
            f64::NAN
        };

        // ── Validation phase ──────────────────────────────────────────────────
        let model_valid = model.valid();
        let (val_loss, val_acc) = eval_pass(&model_valid, &val_loader);

        tracing::info!(
            "Epoch {:>2}/{} | train_loss={:.4} | val_loss={:.4} | val_acc={:.4} | lr={:.2e}",
            epoch,
            cfg.epochs,
            avg_train_loss,
            val_loss,
            val_acc,
            controller.lr(),
        );
        metrics.log(&EpochMetrics::new(
            epoch,
            avg_train_loss,
            val_loss,
            val_acc,
            controller.lr(),
        ))?;

        // ── Epoch-boundary control ────────────────────────────────────────────
        let decision = controller.on_epoch_end(val_loss, val_acc);
        if decision.stop {
            tracing::info!("Stopping after epoch {} of {}", epoch, cfg.epochs);
            break;
        }
    }

    controller.finish();
    Ok((
        model,
        TrainReport {
            state: controller.state(),
            epochs_run,
        },
    ))
}

/// One full pass over the held-out eval set, at `batch_size`.
/// Used for the final evaluation after training completes.
pub fn evaluate(
    model: &SentimentModel<EvalBackend>,
    dataset: SentimentDataset,
    batch_size: usize,
) -> (f64, f64) {
    let batcher = SentimentBatcher::<EvalBackend>::new(Default::default());
    let loader = DataLoaderBuilder::new(batcher)
        .batch_size(batch_size)
        .num_workers(1)
        .build(dataset);
    eval_pass(model, &loader)
}

/// Average loss and accuracy of `model` over every batch of `loader`.
fn eval_pass(
    model: &SentimentModel<EvalBackend>,
    loader: &Arc<dyn DataLoader<SentimentBatch<EvalBackend>>>,
) -> (f64, f64) {
    let mut loss_sum = 0.0f64;
    let mut batches = 0usize;
    let mut correct = 0usize;
    let mut total = 0usize;

    for batch in loader.iter() {
        let labels = batch.labels.clone();
        let (loss, probs) = model.forward_loss(batch.input_ids, batch.labels);

        loss_sum += loss.into_scalar().elem::<f64>();
        batches += 1;

        // Accuracy at the 0.5 decision threshold
        let preds = probs.greater_equal_elem(0.5).int();
        total += labels.dims()[0];
        let hits: i64 = preds.equal(labels).int().sum().into_scalar().elem::<i64>();
        correct += hits as usize;
    }

    let avg_loss = if batches > 0 {
        loss_sum / batches as f64
    } else {
        f64::NAN
    };
    let accuracy = if total > 0 {
        correct as f64 / total as f64
    } else {
        0.0
    };
    (avg_loss, accuracy)
}
