// ============================================================
// Layer 5 — Word2Vec Embedding Trainer
// ============================================================
// Learns dense word vectors from the raw corpus, unsupervised —
// no sentiment labels are involved at this stage.
//
// Algorithm: skip-gram with negative sampling (Mikolov et al. 2013).
// For every token position, the center word predicts each word in
// its window; each positive pair is contrasted against `negative`
// draws from the unigram distribution raised to 3/4. Updates are
// plain SGD on two matrices: the input (word) vectors that become
// the embedding space, and the output (context) vectors that are
// discarded after training.
//
// Parallelism: this is the only component of the pipeline allowed
// to parallelize. Each epoch shards the documents across a rayon
// pool; shards train on their own copy of the matrices and the
// results are averaged at the epoch barrier. Update order therefore
// varies run to run, the vocabulary and all shapes do not.
//
// Reference: Mikolov et al. (2013), Distributed Representations
//            of Words and Phrases and their Compositionality

use std::collections::HashMap;

use ndarray::{Array1, Array2, ArrayView1};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;

// ─── Word2VecConfig ───────────────────────────────────────────────────────────
/// Immutable hyperparameter record for one embedding-training run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word2VecConfig {
    /// Dimensionality of the learned vectors
    pub vector_size: usize,

    /// Context window radius on each side of the center token
    pub window: usize,

    /// Tokens rarer than this are excluded from the embedding space
    pub min_count: usize,

    /// Number of passes over the corpus
    pub epochs: usize,

    /// Negative samples drawn per positive pair
    pub negative: usize,

    /// SGD step size at the start of training; decays linearly per epoch
    pub initial_lr: f32,

    /// Degree of parallelism, bounded by available compute units
    pub workers: usize,
}

impl Default for Word2VecConfig {
    fn default() -> Self {
        Self {
            vector_size: 300,
            window: 7,
            min_count: 10,
            epochs: 5,
            negative: 5,
            initial_lr: 0.025,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

// ─── WordVectors ──────────────────────────────────────────────────────────────
/// The learned embedding space: token → row of a dense matrix.
/// Holds only tokens that passed the minimum-frequency filter; its
/// indices are private to this space and unrelated to the tokenizer's.
pub struct WordVectors {
    vocab: HashMap<String, usize>,
    vectors: Array2<f32>,
}

impl WordVectors {
    /// Number of tokens in the embedding space.
    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }

    /// Vector dimensionality.
    pub fn dim(&self) -> usize {
        self.vectors.ncols()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.vocab.contains_key(token)
    }

    /// The learned vector for a token, if it survived the frequency filter.
    pub fn get(&self, token: &str) -> Option<ArrayView1<'_, f32>> {
        self.vocab.get(token).map(|&i| self.vectors.row(i))
    }
}

// ─── Training ─────────────────────────────────────────────────────────────────

/// Train an embedding space over whitespace-tokenized documents.
///
/// Fails with `EmptyVocabulary` when no token clears `min_count` —
/// callers must not proceed to embedding-matrix construction then.
pub fn train(
    documents: &[Vec<String>],
    cfg: &Word2VecConfig,
) -> Result<WordVectors, PipelineError> {
    let (vocab, counts) = build_vocab(documents, cfg.min_count)?;
    tracing::info!(
        "Embedding vocabulary: {} tokens (min_count={})",
        vocab.len(),
        cfg.min_count,
    );

    // Re-encode documents against the filtered vocabulary once;
    // tokens below min_count simply vanish from the token stream.
    let encoded: Vec<Vec<usize>> = documents
        .iter()
        .map(|doc| {
            doc.iter()
                .filter_map(|token| vocab.get(token.as_str()).copied())
                .collect()
        })
        .collect();

    let dim = cfg.vector_size;
    let vocab_len = vocab.len();

    // Input vectors start small and random, output vectors at zero —
    // the standard word2vec initialisation.
    let mut rng = rand::thread_rng();
    let span = 0.5 / dim as f32;
    let mut input = Array2::from_shape_fn((vocab_len, dim), |_| {
        rng.gen_range(-span..span)
    });
    let mut output = Array2::<f32>::zeros((vocab_len, dim));

    // Negative draws follow the unigram distribution^(3/4)
    let noise_weights: Vec<f64> = counts.iter().map(|&c| (c as f64).powf(0.75)).collect();

    let workers = cfg.workers.max(1);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .expect("rayon pool construction cannot fail with a positive thread count");

    for epoch in 0..cfg.epochs {
        // Linear decay, floored so late epochs still move
        let lr = (cfg.initial_lr * (1.0 - epoch as f32 / cfg.epochs as f32))
            .max(cfg.initial_lr * 1e-2);

        let chunk = encoded.len().div_ceil(workers).max(1);
        let shards: Vec<(Array2<f32>, Array2<f32>)> = pool.install(|| {
            encoded
                .par_chunks(chunk)
                .map(|docs| {
                    let mut shard_in = input.clone();
                    let mut shard_out = output.clone();
                    train_shard(
                        docs,
                        &mut shard_in,
                        &mut shard_out,
                        &noise_weights,
                        cfg,
                        lr,
                    );
                    (shard_in, shard_out)
                })
                .collect()
        });

        // Epoch barrier: average the shard results back into one state
        let n = shards.len() as f32;
        input.fill(0.0);
        output.fill(0.0);
        for (shard_in, shard_out) in shards {
            input += &shard_in;
            output += &shard_out;
        }
        input /= n;
        output /= n;

        tracing::debug!("Embedding epoch {}/{} done (lr={:.5})", epoch + 1, cfg.epochs, lr);
    }

    Ok(WordVectors {
        vocab,
        vectors: input,
    })
}

/// Count tokens and keep those at or above `min_count`, indexed in
/// (count desc, token asc) order so the space is reproducible.
fn build_vocab(
    documents: &[Vec<String>],
    min_count: usize,
) -> Result<(HashMap<String, usize>, Vec<usize>), PipelineError> {
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for doc in documents {
        for token in doc {
            *freq.entry(token.as_str()).or_insert(0) += 1;
        }
    }

    let mut survivors: Vec<(&str, usize)> = freq
        .into_iter()
        .filter(|&(_, count)| count >= min_count)
        .collect();
    survivors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    if survivors.is_empty() {
        return Err(PipelineError::EmptyVocabulary { min_count });
    }

    let counts: Vec<usize> = survivors.iter().map(|&(_, c)| c).collect();
    let vocab: HashMap<String, usize> = survivors
        .into_iter()
        .enumerate()
        .map(|(i, (token, _))| (token.to_string(), i))
        .collect();

    Ok((vocab, counts))
}

/// One SGD pass over a shard of documents.
fn train_shard(
    docs: &[Vec<usize>],
    input: &mut Array2<f32>,
    output: &mut Array2<f32>,
    noise_weights: &[f64],
    cfg: &Word2VecConfig,
    lr: f32,
) {
    let mut rng = rand::thread_rng();
    let noise = WeightedIndex::new(noise_weights)
        .expect("noise weights are positive for every surviving token");
    let dim = input.ncols();

    for doc in docs {
        for (pos, &center) in doc.iter().enumerate() {
            let lo = pos.saturating_sub(cfg.window);
            let hi = (pos + cfg.window + 1).min(doc.len());

            for ctx_pos in lo..hi {
                if ctx_pos == pos {
                    continue;
                }
                let context = doc[ctx_pos];
                let mut err = Array1::<f32>::zeros(dim);
                let center_vec = input.row(center).to_owned();

                for k in 0..=cfg.negative {
                    let (target, label) = if k == 0 {
                        (context, 1.0f32)
                    } else {
                        let sample = noise.sample(&mut rng);
                        if sample == context {
                            continue;
                        }
                        (sample, 0.0f32)
                    };

                    let score = center_vec.dot(&output.row(target));
                    let g = (label - sigmoid(score)) * lr;
                    err.scaled_add(g, &output.row(target).to_owned());
                    output.row_mut(target).scaled_add(g, &center_vec);
                }

                input.row_mut(center).scaled_add(1.0, &err);
            }
        }
    }
}

/// Logistic function with the argument clamped to word2vec's table range.
fn sigmoid(x: f32) -> f32 {
    let x = x.clamp(-6.0, 6.0);
    1.0 / (1.0 + (-x).exp())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_config() -> Word2VecConfig {
        Word2VecConfig {
            vector_size: 8,
            window: 2,
            min_count: 2,
            epochs: 2,
            negative: 3,
            workers: 2,
            ..Word2VecConfig::default()
        }
    }

    fn doc(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_defaults_match_run_parameters() {
        let cfg = Word2VecConfig::default();
        assert_eq!(cfg.vector_size, 300);
        assert_eq!(cfg.window, 7);
        assert_eq!(cfg.min_count, 10);
        assert_eq!(cfg.epochs, 5);
    }

    #[test]
    fn test_empty_corpus_fails_with_empty_vocabulary() {
        let err = train(&[], &tiny_config()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyVocabulary { .. }));
    }

    #[test]
    fn test_all_rare_tokens_fail_with_empty_vocabulary() {
        let docs = vec![doc("each word appears only once")];
        let err = train(&docs, &tiny_config()).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::EmptyVocabulary { min_count: 2 }
        ));
    }

    #[test]
    fn test_min_count_filters_the_space() {
        let mut docs: Vec<Vec<String>> =
            (0..5).map(|_| doc("good movie plot")).collect();
        docs.push(doc("singleton"));

        let vectors = train(&docs, &tiny_config()).unwrap();
        assert!(vectors.contains("good"));
        assert!(vectors.contains("movie"));
        assert!(!vectors.contains("singleton"));
        assert_eq!(vectors.dim(), 8);
    }

    #[test]
    fn test_vectors_are_finite() {
        let docs: Vec<Vec<String>> = (0..20)
            .map(|i| {
                if i % 2 == 0 {
                    doc("good movie great plot")
                } else {
                    doc("bad movie awful plot")
                }
            })
            .collect();

        let vectors = train(&docs, &tiny_config()).unwrap();
        for token in ["good", "bad", "movie", "plot"] {
            let v = vectors.get(token).unwrap();
            assert_eq!(v.len(), 8);
            assert!(v.iter().all(|x| x.is_finite()));
        }
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let docs: Vec<Vec<String>> = (0..5).map(|_| doc("good movie")).collect();
        let vectors = train(&docs, &tiny_config()).unwrap();
        assert!(vectors.get("unseen").is_none());
    }
}
