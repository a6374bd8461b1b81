// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records one CSV row per epoch so training runs leave a
// plottable record next to the artifacts.
//
// Output file: <model_dir>/metrics.csv
//   epoch,train_loss,val_loss,val_acc,lr

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One row of metrics for a single training epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,

    /// Average BCE loss over the epoch's training batches
    pub train_loss: f64,

    /// Average BCE loss on the validation split
    pub val_loss: f64,

    /// Validation accuracy at the 0.5 threshold
    pub val_acc: f64,

    /// Learning rate the epoch trained with
    pub lr: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, val_loss: f64, val_acc: f64, lr: f64) -> Self {
        Self {
            epoch,
            train_loss,
            val_loss,
            val_acc,
            lr,
        }
    }
}

/// Appends epoch metrics to a CSV file in the model directory.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the logger and write the header. The model directory is
    /// fresh for every run, so the file always starts empty.
    pub fn new(model_dir: impl AsRef<Path>) -> Result<Self> {
        let csv_path = model_dir.as_ref().join("metrics.csv");
        let mut f = fs::File::create(&csv_path)?;
        writeln!(f, "epoch,train_loss,val_loss,val_acc,lr")?;
        Ok(Self { csv_path })
    }

    /// Append one epoch's row.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;
        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6e}",
            m.epoch, m.train_loss, m.val_loss, m.val_acc, m.lr,
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
