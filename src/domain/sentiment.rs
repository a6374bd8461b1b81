// ============================================================
// Layer 3 — Sentiment Domain Types
// ============================================================
// The external-facing sentiment taxonomy and the raw corpus row.
//
// Training itself is binary: the classifier emits one probability
// of the positive class. The three-way POSITIVE / NEUTRAL / NEGATIVE
// reading is a post-hoc interpretation of that scalar through two
// fixed thresholds and never feeds back into training.

use serde::{Deserialize, Serialize};

/// Label string for the positive class as it appears in the corpus.
pub const POSITIVE: &str = "POSITIVE";
/// Label string for the negative class as it appears in the corpus.
pub const NEGATIVE: &str = "NEGATIVE";
/// Label string for neutral rows. Never trained on — see TrainUseCase.
pub const NEUTRAL: &str = "NEUTRAL";

/// Probabilities at or below the first threshold decode as NEGATIVE,
/// at or above the second as POSITIVE, anything between as NEUTRAL.
pub const SENTIMENT_THRESHOLDS: (f32, f32) = (0.4, 0.7);

/// Fixed length of every encoded input sequence.
pub const SEQUENCE_LENGTH: usize = 300;

// ─── Sentiment ────────────────────────────────────────────────────────────────
/// Three-way sentiment reading of a classifier score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// Decode a positive-class probability into the three-way taxonomy.
    pub fn from_score(score: f32) -> Self {
        let (low, high) = SENTIMENT_THRESHOLDS;
        if score <= low {
            Sentiment::Negative
        } else if score >= high {
            Sentiment::Positive
        } else {
            Sentiment::Neutral
        }
    }

    /// The corpus label string for this class.
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Negative => NEGATIVE,
            Sentiment::Neutral => NEUTRAL,
            Sentiment::Positive => POSITIVE,
        }
    }
}

// ─── CorpusRow ────────────────────────────────────────────────────────────────
/// One normalized corpus row: raw text plus its sentiment label string.
/// Rows reaching the pipeline are guaranteed non-empty in both fields;
/// the loader drops anything else before it gets here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusRow {
    pub text: String,
    pub sentiment: String,
}

impl CorpusRow {
    pub fn new(text: impl Into<String>, sentiment: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sentiment: sentiment.into(),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_scores_decode_negative() {
        assert_eq!(Sentiment::from_score(0.0), Sentiment::Negative);
        assert_eq!(Sentiment::from_score(0.4), Sentiment::Negative);
    }

    #[test]
    fn test_high_scores_decode_positive() {
        assert_eq!(Sentiment::from_score(0.7), Sentiment::Positive);
        assert_eq!(Sentiment::from_score(1.0), Sentiment::Positive);
    }

    #[test]
    fn test_middle_scores_decode_neutral() {
        assert_eq!(Sentiment::from_score(0.41), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(0.5), Sentiment::Neutral);
        assert_eq!(Sentiment::from_score(0.69), Sentiment::Neutral);
    }

    #[test]
    fn test_labels_round_trip_to_constants() {
        assert_eq!(Sentiment::Positive.label(), POSITIVE);
        assert_eq!(Sentiment::Negative.label(), NEGATIVE);
        assert_eq!(Sentiment::Neutral.label(), NEUTRAL);
    }
}
