// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Owns the model output directory for the duration of one run.
//
// Layout under <work_dir>/data/model:
//   tokenizer.json      ← fitted vocabulary + metadata
//   model.mpk.gz        ← classifier weights (CompactRecorder)
//   train_config.json   ← the run's hyperparameters
//   metrics.csv         ← per-epoch metrics (MetricsLogger)
//
// The directory is cleared and recreated at the START of a run, so
// no run can append to stale artifacts from a previous attempt.
// Every write either succeeds or fails the run with ArtifactWrite —
// a partially written directory is never reported as success.

use std::path::{Path, PathBuf};

use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::data::tokenizer::SequenceTokenizer;
use crate::domain::error::PipelineError;
use crate::ml::model::SentimentModel;

/// Sub-path of the work dir that receives the artifacts.
pub const MODEL_DIR: &str = "data/model";
/// Tokenizer artifact file name.
pub const TOKENIZER_FILE: &str = "tokenizer.json";
/// Model artifact base name; the recorder appends `.mpk.gz`.
pub const MODEL_FILE: &str = "model";
/// Run configuration file name.
pub const CONFIG_FILE: &str = "train_config.json";

// ─── ArtifactStore ────────────────────────────────────────────────────────────
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Claim `<work_dir>/data/model` for this run: remove whatever a
    /// previous attempt left there and recreate the directory fresh.
    pub fn reset(work_dir: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let dir = work_dir.as_ref().join(MODEL_DIR);

        if dir.exists() {
            std::fs::remove_dir_all(&dir).map_err(|e| write_error(&dir, e))?;
        }
        std::fs::create_dir_all(&dir).map_err(|e| write_error(&dir, e))?;

        tracing::info!("Model directory ready: '{}'", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Serialise the fitted tokenizer as JSON.
    pub fn save_tokenizer(&self, tokenizer: &SequenceTokenizer) -> Result<(), PipelineError> {
        let path = self.dir.join(TOKENIZER_FILE);
        let json = serde_json::to_string(tokenizer).map_err(|e| PipelineError::ArtifactWrite {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        std::fs::write(&path, json).map_err(|e| write_error(&path, e))?;
        tracing::info!("Tokenizer artifact written: '{}'", path.display());
        Ok(())
    }

    /// Serialise the trained classifier with Burn's CompactRecorder.
    pub fn save_model<B: Backend>(
        &self,
        model: &SentimentModel<B>,
    ) -> Result<(), PipelineError> {
        let path = self.dir.join(MODEL_FILE);
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .map_err(|e| PipelineError::ArtifactWrite {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        tracing::info!("Model artifact written: '{}.mpk.gz'", path.display());
        Ok(())
    }

    /// Persist the run configuration next to the artifacts.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<(), PipelineError> {
        let path = self.dir.join(CONFIG_FILE);
        let json =
            serde_json::to_string_pretty(cfg).map_err(|e| PipelineError::ArtifactWrite {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        std::fs::write(&path, json).map_err(|e| write_error(&path, e))?;
        Ok(())
    }
}

fn write_error(path: &Path, e: std::io::Error) -> PipelineError {
    PipelineError::ArtifactWrite {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_reset_creates_a_fresh_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::reset(tmp.path()).unwrap();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_reset_clears_stale_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::reset(tmp.path()).unwrap();
        let stale = store.dir().join("leftover.bin");
        fs::write(&stale, b"old run").unwrap();

        let store = ArtifactStore::reset(tmp.path()).unwrap();
        assert!(!stale.exists());
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_tokenizer_round_trips_through_the_store() {
        let tmp = tempfile::tempdir().unwrap();
        let store = ArtifactStore::reset(tmp.path()).unwrap();

        let texts = ["good movie", "bad movie"];
        let tokenizer = SequenceTokenizer::fit(&texts, 300);
        store.save_tokenizer(&tokenizer).unwrap();

        let json = fs::read_to_string(store.dir().join(TOKENIZER_FILE)).unwrap();
        let back: SequenceTokenizer = serde_json::from_str(&json).unwrap();
        assert_eq!(back.vocab_size(), tokenizer.vocab_size());
    }
}
