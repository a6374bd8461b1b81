// ============================================================
// Layer 4 — Partitioned Corpus Loader
// ============================================================
// Loads a corpus from partitioned CSV shards on disk.
//
// The upstream preprocessing job writes each split as a set of
// headerless two-column files under a fixed sub-path convention:
//
//   <work_dir>/data/transformed_data/train/part-00000
//   <work_dir>/data/transformed_data/train/part-00001
//   <work_dir>/data/transformed_data/eval/part-00000
//   ...
//
// Every row is (text, sentiment) as two string fields. Rows with a
// missing or empty field are dropped here, before anything else
// sees them — the vocabulary and label mappings downstream depend
// on a uniformly valid corpus.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::ReaderBuilder;

use crate::domain::sentiment::CorpusRow;
use crate::domain::traits::CorpusSource;

/// Sub-path of the work dir holding the transformed corpus splits.
pub const TRANSFORMED_DATA_DIR: &str = "data/transformed_data";

// ─── PartitionedCsvLoader ─────────────────────────────────────────────────────
/// Reads all `part-*` shards of one split (train or eval).
pub struct PartitionedCsvLoader {
    split_dir: PathBuf,
}

impl PartitionedCsvLoader {
    /// Loader for `<work_dir>/data/transformed_data/<split>`.
    pub fn new(work_dir: impl AsRef<Path>, split: &str) -> Self {
        Self {
            split_dir: work_dir.as_ref().join(TRANSFORMED_DATA_DIR).join(split),
        }
    }
}

impl CorpusSource for PartitionedCsvLoader {
    fn load_all(&self) -> Result<Vec<CorpusRow>> {
        let mut shards: Vec<PathBuf> = std::fs::read_dir(&self.split_dir)
            .with_context(|| {
                format!("cannot read corpus directory '{}'", self.split_dir.display())
            })?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("part-"))
            })
            .collect();

        // Shard order must not depend on directory iteration order
        shards.sort();

        let mut rows = Vec::new();
        let mut dropped = 0usize;

        for shard in &shards {
            let (shard_rows, shard_dropped) = load_shard(shard)?;
            rows.extend(shard_rows);
            dropped += shard_dropped;
        }

        tracing::info!(
            "Loaded {} rows from {} shard(s) in '{}' ({} dropped as incomplete)",
            rows.len(),
            shards.len(),
            self.split_dir.display(),
            dropped,
        );
        Ok(rows)
    }
}

/// Read one shard, returning (valid rows, dropped-row count).
fn load_shard(path: &Path) -> Result<(Vec<CorpusRow>, usize)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("cannot open corpus shard '{}'", path.display()))?;

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let record =
            record.with_context(|| format!("malformed CSV in '{}'", path.display()))?;

        // Exactly two non-empty fields, or the row is excluded
        match (record.get(0), record.get(1)) {
            (Some(text), Some(sentiment))
                if !text.trim().is_empty() && !sentiment.trim().is_empty() =>
            {
                rows.push(CorpusRow::new(text, sentiment.trim()));
            }
            _ => dropped += 1,
        }
    }

    Ok((rows, dropped))
}
