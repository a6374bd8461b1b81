// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load corpus partitions        (Layer 4 - data)
//   Step 2: Drop NEUTRAL rows             (Layer 2, policy below)
//   Step 3: Train word2vec embeddings     (Layer 5 - ml)
//   Step 4: Fit tokenizer, encode text    (Layer 4 - data)
//   Step 5: Fit label encoder, check it   (Layer 4 - data)
//   Step 6: Build the embedding matrix    (Layer 5 - ml)
//   Step 7: Claim the output directory    (Layer 6 - infra)
//   Step 8: Split 90/10, build datasets   (Layer 4 - data)
//   Step 9: Run the training loop         (Layer 5 - ml)
//   Step 10: Final eval + persist         (Layer 5/6)
//
// NEUTRAL policy: the classifier is binary, so NEUTRAL rows are
// excluded from the corpus before any fitting happens. The count
// is logged. NEUTRAL re-enters only at inference time, as a
// threshold band over the model's scalar output.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use rand::seq::SliceRandom;

use crate::data::{
    dataset::{SentimentDataset, SentimentSample},
    labels::LabelEncoder,
    loader::PartitionedCsvLoader,
    tokenizer::SequenceTokenizer,
};
use crate::domain::{
    error::PipelineError,
    sentiment::{CorpusRow, NEUTRAL, SEQUENCE_LENGTH},
    traits::CorpusSource,
};
use crate::infra::{artifact_store::ArtifactStore, metrics::MetricsLogger};
use crate::ml::{
    controller::RunState,
    embedding::build_embedding_matrix,
    model::SentimentModelConfig,
    trainer::{self, run_training},
    word2vec::{self, Word2VecConfig},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// Every hyperparameter of a run, as one immutable serialisable
// record. Saved to disk next to the artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub work_dir: String,
    pub batch_size: usize,
    pub epochs: usize,
    pub steps: usize,
    pub lr: f64,
    pub seq_len: usize,
    pub hidden_size: usize,
    pub embedding: Word2VecConfig,
}

impl TrainConfig {
    /// Default run parameters for everything except the work dir.
    pub fn new(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            batch_size: 1024,
            epochs: 8,
            steps: 1000,
            lr: 1e-3,
            seq_len: SEQUENCE_LENGTH,
            hidden_size: 100,
            embedding: Word2VecConfig::default(),
        }
    }
}

/// What a finished run reports: the numbers the logs promise.
#[derive(Debug)]
pub struct TrainSummary {
    pub state: RunState,
    pub epochs_run: usize,
    pub vocab_size: usize,
    pub eval_loss: f64,
    pub eval_accuracy: f64,
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end.
    pub fn execute(&self) -> Result<TrainSummary> {
        let cfg = &self.config;

        // ── Step 1: Load corpus partitions ────────────────────────────────────
        tracing::info!("Loading train partitions from '{}'", cfg.work_dir);
        let train_rows = PartitionedCsvLoader::new(&cfg.work_dir, "train").load_all()?;
        tracing::info!("Loading eval partitions from '{}'", cfg.work_dir);
        let eval_rows = PartitionedCsvLoader::new(&cfg.work_dir, "eval").load_all()?;

        // ── Step 2: Binary filter ─────────────────────────────────────────────
        let train_rows = drop_neutral(train_rows, "train");
        let eval_rows = drop_neutral(eval_rows, "eval");

        let train_texts: Vec<&str> = train_rows.iter().map(|r| r.text.as_str()).collect();
        let train_labels: Vec<&str> =
            train_rows.iter().map(|r| r.sentiment.as_str()).collect();

        // ── Step 3: Train the embedding space ─────────────────────────────────
        // Unsupervised, and the only parallel stage of the run.
        tracing::info!("---- Generating word2vec embedding space ----");
        let documents: Vec<Vec<String>> = train_rows
            .iter()
            .map(|r| r.text.split_whitespace().map(str::to_string).collect())
            .collect();
        let vectors = word2vec::train(&documents, &cfg.embedding)?;

        // ── Step 4: Fit tokenizer, encode both splits ─────────────────────────
        tracing::info!("---- Generating tokenizer ----");
        let tokenizer = SequenceTokenizer::fit(&train_texts, cfg.seq_len);
        tracing::info!("Total words: {}", tokenizer.vocab_size());

        tracing::info!("---- Tokenizing train data ----");
        let x_train: Vec<Vec<u32>> =
            train_texts.iter().map(|t| tokenizer.encode(t)).collect();
        tracing::info!("---- Tokenizing eval data ----");
        let x_eval: Vec<Vec<u32>> = eval_rows
            .iter()
            .map(|r| tokenizer.encode(&r.text))
            .collect();

        // ── Step 5: Encode labels, enforce binary cardinality ─────────────────
        tracing::info!("---- Generating label encoder ----");
        let encoder = LabelEncoder::fit(&train_labels);
        if encoder.num_classes() != 2 {
            return Err(PipelineError::LabelCardinality(encoder.num_classes()).into());
        }
        let y_train = encoder.transform(&train_labels)?;
        let eval_labels: Vec<&str> =
            eval_rows.iter().map(|r| r.sentiment.as_str()).collect();
        let y_eval = encoder.transform(&eval_labels)?;

        // ── Step 6: Reconcile the two vocabularies ────────────────────────────
        tracing::info!("---- Generating embedding matrix ----");
        let embedding_matrix = build_embedding_matrix(&vectors, &tokenizer);

        // ── Step 7: Claim the output directory ────────────────────────────────
        // Fresh per run; owned exclusively until the artifacts land.
        let store = ArtifactStore::reset(&cfg.work_dir)?;
        let metrics = MetricsLogger::new(store.dir())
            .context("cannot create the metrics log")?;
        store.save_config(cfg)?;

        // ── Step 8: Split and build datasets ──────────────────────────────────
        // Shuffle, then hold back 10% of the encoded training rows as
        // the validation split that drives learning-rate reduction and
        // early stopping. The eval partitions on disk play no part
        // here — they are touched exactly once, by the final pass.
        let mut samples: Vec<SentimentSample> = x_train
            .into_iter()
            .zip(y_train)
            .map(|(ids, label)| SentimentSample::new(ids, label))
            .collect();
        samples.shuffle(&mut rand::thread_rng());
        let val_samples = samples.split_off(samples.len() - samples.len() / 10);
        tracing::info!(
            "Split: {} train, {} validation",
            samples.len(),
            val_samples.len(),
        );
        let train_dataset = SentimentDataset::new(samples);
        let val_dataset = SentimentDataset::new(val_samples);

        // ── Step 9: Train ─────────────────────────────────────────────────────
        tracing::info!("---- Training model ----");
        let model_cfg = SentimentModelConfig::new(
            tokenizer.vocab_size(),
            cfg.embedding.vector_size,
        )
        .with_hidden_size(cfg.hidden_size);

        let (model, report) = run_training(
            cfg,
            &model_cfg,
            &embedding_matrix,
            train_dataset,
            val_dataset,
            &metrics,
        )?;

        // ── Step 10: Final evaluation + persistence ───────────────────────────
        tracing::info!("---- Evaluating model ----");
        use burn::module::AutodiffModule;
        let eval_dataset = SentimentDataset::from_encoded(x_eval, y_eval);
        let (eval_loss, eval_accuracy) =
            trainer::evaluate(&model.valid(), eval_dataset, cfg.batch_size);
        tracing::info!("ACCURACY: {eval_accuracy:.4}");
        tracing::info!("LOSS: {eval_loss:.4}");

        tracing::info!("---- Saving artifacts ----");
        store.save_tokenizer(&tokenizer)?;
        store.save_model(&model)?;

        Ok(TrainSummary {
            state: report.state,
            epochs_run: report.epochs_run,
            vocab_size: tokenizer.vocab_size(),
            eval_loss,
            eval_accuracy,
        })
    }
}

/// Drop NEUTRAL rows from a split, keeping the count visible.
fn drop_neutral(rows: Vec<CorpusRow>, split: &str) -> Vec<CorpusRow> {
    let before = rows.len();
    let rows: Vec<CorpusRow> = rows
        .into_iter()
        .filter(|r| r.sentiment != NEUTRAL)
        .collect();
    if before > rows.len() {
        tracing::info!(
            "Dropped {} NEUTRAL row(s) from the {split} split (binary task)",
            before - rows.len(),
        );
    }
    rows
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sentiment::{NEGATIVE, POSITIVE};
    use crate::infra::artifact_store::{MODEL_DIR, TOKENIZER_FILE};
    use std::fs;
    use std::path::Path;

    /// Tiny hyperparameters so the whole pipeline runs in a test.
    fn tiny_config(work_dir: &Path) -> TrainConfig {
        TrainConfig {
            batch_size: 4,
            epochs: 2,
            steps: 4,
            seq_len: 12,
            hidden_size: 8,
            embedding: Word2VecConfig {
                vector_size: 8,
                window: 2,
                min_count: 2,
                epochs: 1,
                negative: 2,
                workers: 1,
                ..Word2VecConfig::default()
            },
            ..TrainConfig::new(work_dir.to_str().unwrap())
        }
    }

    fn write_corpus(work_dir: &Path) {
        for (split, reps) in [("train", 12), ("eval", 4)] {
            let dir = work_dir.join("data/transformed_data").join(split);
            fs::create_dir_all(&dir).unwrap();
            let mut rows = String::new();
            for _ in 0..reps {
                rows.push_str("good movie,POSITIVE\n");
                rows.push_str("bad movie,NEGATIVE\n");
                rows.push_str("ok movie,NEUTRAL\n");
            }
            fs::write(dir.join("part-00000"), rows).unwrap();
        }
    }

    #[test]
    fn test_end_to_end_training_run() {
        let tmp = tempfile::tempdir().unwrap();
        write_corpus(tmp.path());

        let summary = TrainUseCase::new(tiny_config(tmp.path()))
            .execute()
            .unwrap();

        // padding + good/bad/movie at minimum (NEUTRAL rows are gone
        // before the tokenizer fits, so "ok" never gets an index)
        assert!(summary.vocab_size >= 4);
        assert_eq!(summary.state, RunState::Done);
        assert!(summary.epochs_run >= 1 && summary.epochs_run <= 2);
        assert!((0.0..=1.0).contains(&summary.eval_accuracy));
        assert!(summary.eval_loss.is_finite());

        let model_dir = tmp.path().join(MODEL_DIR);
        assert!(model_dir.join(TOKENIZER_FILE).exists());
        assert!(model_dir.join("model.mpk.gz").exists());
        assert!(model_dir.join("train_config.json").exists());
        assert!(model_dir.join("metrics.csv").exists());
    }

    #[test]
    fn test_second_run_leaves_exactly_one_artifact_set() {
        let tmp = tempfile::tempdir().unwrap();
        write_corpus(tmp.path());
        let cfg = tiny_config(tmp.path());

        TrainUseCase::new(cfg.clone()).execute().unwrap();

        // Plant a stale file to prove the directory is recreated fresh
        let model_dir = tmp.path().join(MODEL_DIR);
        fs::write(model_dir.join("stale.bin"), b"left over").unwrap();

        TrainUseCase::new(cfg).execute().unwrap();

        assert!(!model_dir.join("stale.bin").exists());
        let tokenizers = fs::read_dir(&model_dir)
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .starts_with("tokenizer")
            })
            .count();
        let models = fs::read_dir(&model_dir)
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .starts_with("model")
            })
            .count();
        assert_eq!(tokenizers, 1);
        assert_eq!(models, 1);
    }

    #[test]
    fn test_single_class_corpus_is_a_configuration_fault() {
        let tmp = tempfile::tempdir().unwrap();
        for split in ["train", "eval"] {
            let dir = tmp.path().join("data/transformed_data").join(split);
            fs::create_dir_all(&dir).unwrap();
            let rows = "good movie,POSITIVE\n".repeat(10);
            fs::write(dir.join("part-00000"), rows).unwrap();
        }

        let err = TrainUseCase::new(tiny_config(tmp.path()))
            .execute()
            .unwrap_err();
        let err = err.downcast::<PipelineError>().unwrap();
        assert!(matches!(err, PipelineError::LabelCardinality(1)));
    }

    #[test]
    fn test_forward_pass_on_fresh_components_is_a_probability() {
        // The "good movie"/"bad movie" scenario wired by hand:
        // tokenizer + embeddings + matrix + model, one forward pass.
        let texts: Vec<String> = (0..12)
            .flat_map(|_| {
                ["good movie".to_string(), "bad movie".to_string()]
            })
            .collect();
        let documents: Vec<Vec<String>> = texts
            .iter()
            .map(|t| t.split_whitespace().map(str::to_string).collect())
            .collect();

        let w2v_cfg = Word2VecConfig {
            vector_size: 8,
            window: 2,
            min_count: 2,
            epochs: 1,
            negative: 2,
            workers: 1,
            ..Word2VecConfig::default()
        };
        let vectors = word2vec::train(&documents, &w2v_cfg).unwrap();
        let tokenizer = SequenceTokenizer::fit(&texts, 12);
        assert!(tokenizer.vocab_size() >= 4);

        let matrix = build_embedding_matrix(&vectors, &tokenizer);
        let model_cfg =
            SentimentModelConfig::new(tokenizer.vocab_size(), 8).with_hidden_size(8);
        let model = model_cfg.init::<crate::ml::trainer::EvalBackend>(
            &matrix,
            &Default::default(),
        );

        use burn::prelude::*;
        let ids: Vec<i32> = tokenizer
            .encode("good movie")
            .into_iter()
            .map(|i| i as i32)
            .collect();
        let input = Tensor::<crate::ml::trainer::EvalBackend, 1, Int>::from_ints(
            ids.as_slice(),
            &Default::default(),
        )
        .reshape([1, 12]);

        let prob: f32 = model.forward(input).into_scalar().elem();
        assert!((0.0..=1.0).contains(&prob));
    }

    #[test]
    fn test_neutral_rows_are_dropped_before_fitting() {
        let rows = vec![
            CorpusRow::new("good", POSITIVE),
            CorpusRow::new("meh", NEUTRAL),
            CorpusRow::new("bad", NEGATIVE),
        ];
        let kept = drop_neutral(rows, "train");
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|r| r.sentiment != NEUTRAL));
    }
}
