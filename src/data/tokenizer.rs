// ============================================================
// Layer 4 — Vocabulary / Sequence Tokenizer
// ============================================================
// Builds a deterministic word→index mapping from the training
// corpus and converts text into fixed-length integer sequences.
//
// Index 0 is reserved: it is both the padding value and the
// fallback for tokens never seen during fit. Real tokens get
// indices 1..=N ordered by corpus frequency (descending), ties
// broken alphabetically so refitting on the same corpus always
// yields the same mapping.
//
// Unlike the embedding trainer's vocabulary, NO minimum-frequency
// filter is applied here: every distinct token gets an index. The
// embedding matrix builder reconciles the two vocabularies.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ─── SequenceTokenizer ────────────────────────────────────────────────────────
/// Word-level tokenizer with a fixed output length.
/// Serialisable so the fitted state can be written as an artifact
/// and reloaded for inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceTokenizer {
    /// token → index, indices dense in 1..=word_index.len()
    word_index: HashMap<String, u32>,

    /// Fixed length of every encoded sequence
    seq_len: usize,

    /// Number of documents seen during fit (fitting metadata)
    document_count: usize,
}

impl SequenceTokenizer {
    /// Scan the corpus and assign every distinct token an index.
    ///
    /// Ordering is (frequency desc, token asc) — fully determined by
    /// the corpus content, independent of hash-map iteration order.
    pub fn fit<S: AsRef<str>>(texts: &[S], seq_len: usize) -> Self {
        let mut freq: HashMap<&str, usize> = HashMap::new();
        for text in texts {
            for token in text.as_ref().split_whitespace() {
                *freq.entry(token).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        // Index 0 stays reserved for padding/unknown
        let word_index = ranked
            .into_iter()
            .enumerate()
            .map(|(rank, (token, _))| (token.to_string(), rank as u32 + 1))
            .collect();

        Self {
            word_index,
            seq_len,
            document_count: texts.len(),
        }
    }

    /// Distinct-token count + 1 (the reserved index 0).
    pub fn vocab_size(&self) -> usize {
        self.word_index.len() + 1
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    pub fn document_count(&self) -> usize {
        self.document_count
    }

    /// Iterate the fitted (token, index) pairs. Order is unspecified;
    /// callers index by the u32, not by iteration position.
    pub fn word_index(&self) -> impl Iterator<Item = (&str, u32)> {
        self.word_index.iter().map(|(w, &i)| (w.as_str(), i))
    }

    pub fn index_of(&self, token: &str) -> Option<u32> {
        self.word_index.get(token).copied()
    }

    /// Convert text into exactly `seq_len` indices.
    /// Unknown tokens map to 0; the fixed-length policy is applied
    /// by `pad_truncate`.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        let ids: Vec<u32> = text
            .split_whitespace()
            .map(|token| self.word_index.get(token).copied().unwrap_or(0))
            .collect();
        pad_truncate(ids, self.seq_len)
    }
}

/// Fixed-length policy: sequences longer than `seq_len` keep their
/// LAST `seq_len` ids, shorter ones are left-padded with 0.
/// Idempotent on sequences already at `seq_len`.
pub fn pad_truncate(ids: Vec<u32>, seq_len: usize) -> Vec<u32> {
    let n = ids.len();
    if n == seq_len {
        return ids;
    }
    if n > seq_len {
        return ids[n - seq_len..].to_vec();
    }
    let mut out = vec![0u32; seq_len - n];
    out.extend(ids);
    out
}
