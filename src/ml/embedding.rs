// ============================================================
// Layer 5 — Embedding Matrix Builder
// ============================================================
// Reconciles the two vocabularies of the pipeline:
//
//   - the tokenizer's: every distinct corpus token, index 0 reserved
//   - the embedding space's: only tokens at or above min_count
//
// The result is a [vocab_size, dim] matrix indexed by TOKENIZER
// indices, holding the learned vector where both sides know the
// token and zeros everywhere else. Row 0 (padding/unknown) is
// always zero. Built once per run and never retrained — it becomes
// the frozen weights of the classifier's first layer.

use ndarray::Array2;

use crate::data::tokenizer::SequenceTokenizer;
use crate::ml::word2vec::WordVectors;

/// Join the embedding space against the tokenizer's index.
/// Out-of-space tokens zero-fill rather than error.
pub fn build_embedding_matrix(
    vectors: &WordVectors,
    tokenizer: &SequenceTokenizer,
) -> Array2<f32> {
    let mut matrix = Array2::<f32>::zeros((tokenizer.vocab_size(), vectors.dim()));

    let mut hits = 0usize;
    for (token, index) in tokenizer.word_index() {
        if let Some(vector) = vectors.get(token) {
            matrix.row_mut(index as usize).assign(&vector);
            hits += 1;
        }
    }

    tracing::info!(
        "Embedding matrix: {}x{} ({} of {} tokens carry learned vectors)",
        matrix.nrows(),
        matrix.ncols(),
        hits,
        tokenizer.vocab_size() - 1,
    );

    matrix
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::word2vec::{self, Word2VecConfig};

    fn corpus() -> Vec<Vec<String>> {
        (0..10)
            .map(|_| {
                "good movie plot"
                    .split_whitespace()
                    .map(str::to_string)
                    .collect()
            })
            .collect()
    }

    fn texts() -> Vec<String> {
        let mut t: Vec<String> = (0..10).map(|_| "good movie plot".to_string()).collect();
        // "stray" is in the tokenizer but below the embedding min_count
        t.push("stray movie".to_string());
        t
    }

    fn cfg() -> Word2VecConfig {
        Word2VecConfig {
            vector_size: 8,
            window: 2,
            min_count: 5,
            epochs: 1,
            negative: 2,
            workers: 1,
            ..Word2VecConfig::default()
        }
    }

    #[test]
    fn test_shape_and_reserved_row() {
        let vectors = word2vec::train(&corpus(), &cfg()).unwrap();
        let tokenizer = SequenceTokenizer::fit(&texts(), 20);

        let matrix = build_embedding_matrix(&vectors, &tokenizer);
        assert_eq!(matrix.nrows(), tokenizer.vocab_size());
        assert_eq!(matrix.ncols(), 8);
        // Row 0 is the padding/unknown slot — always zero
        assert!(matrix.row(0).iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_known_tokens_carry_their_learned_vector() {
        let vectors = word2vec::train(&corpus(), &cfg()).unwrap();
        let tokenizer = SequenceTokenizer::fit(&texts(), 20);

        let matrix = build_embedding_matrix(&vectors, &tokenizer);
        for token in ["good", "movie", "plot"] {
            let row = tokenizer.index_of(token).unwrap() as usize;
            let learned = vectors.get(token).unwrap();
            assert_eq!(matrix.row(row), learned);
        }
    }

    #[test]
    fn test_filtered_tokens_zero_fill() {
        let vectors = word2vec::train(&corpus(), &cfg()).unwrap();
        let tokenizer = SequenceTokenizer::fit(&texts(), 20);

        // "stray" occurs once — excluded from the embedding space,
        // present in the tokenizer, so its row must be all zeros.
        assert!(!vectors.contains("stray"));
        let row = tokenizer.index_of("stray").unwrap() as usize;
        let matrix = build_embedding_matrix(&vectors, &tokenizer);
        assert!(matrix.row(row).iter().all(|&x| x == 0.0));
    }
}
