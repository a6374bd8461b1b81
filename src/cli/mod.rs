// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction; parses arguments with
// clap and delegates to the application layer. This layer only
// routes, it never computes.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::Commands;

#[derive(Parser, Debug)]
#[command(
    name = "sentiment-trainer",
    version,
    about = "Train an embedding-initialised LSTM sentiment classifier from partitioned text corpora."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => {
                use crate::application::train_use_case::TrainUseCase;

                tracing::info!("Starting training run in: {}", args.work_dir);
                let use_case = TrainUseCase::new(args.into());
                let summary = use_case.execute()?;

                println!(
                    "Training complete after {} epoch(s): vocab={}, accuracy={:.4}, loss={:.4}",
                    summary.epochs_run,
                    summary.vocab_size,
                    summary.eval_accuracy,
                    summary.eval_loss,
                );
                Ok(())
            }
        }
    }
}
