// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// One subcommand: `train`. Flags carry the run configuration;
// everything else keeps its default from TrainConfig.

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the sentiment classifier on the corpus under a work dir
    Train(TrainArgs),
}

/// All arguments for the `train` command.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory for staging and working files. Corpus partitions are
    /// expected under data/transformed_data/{train,eval}/part-*
    #[arg(long)]
    pub work_dir: String,

    /// Batch size for training and evaluation
    #[arg(long, default_value_t = 1024)]
    pub batch_size: usize,

    /// Number of epochs to train the model
    #[arg(long, default_value_t = 8)]
    pub epochs: usize,

    /// Number of steps per epoch to train the model
    #[arg(long, default_value_t = 1000)]
    pub steps: usize,

    /// Initial learning rate for the Adam optimizer
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,
}

/// Convert CLI args into the application-layer TrainConfig —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            batch_size: a.batch_size,
            epochs: a.epochs,
            steps: a.steps,
            lr: a.lr,
            ..TrainConfig::new(a.work_dir)
        }
    }
}
