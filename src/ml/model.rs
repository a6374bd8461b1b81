// ============================================================
// Layer 5 — Sequence Classifier
// ============================================================
// The recurrent sentiment model. Architecture is fixed:
//
//   frozen Embedding (from the reconciled embedding matrix)
//     → Dropout 0.5
//     → Dropout 0.2 on the LSTM input
//     → Lstm (100 units), summarised by the last hidden state
//     → Linear(hidden, 1) → sigmoid
//
// Output is one probability of the positive class per sequence.
// The embedding weights are constructed with require_grad off and
// stay exactly as the matrix builder produced them; only the LSTM
// and the output head learn.

use burn::{
    module::Param,
    nn::{
        loss::BinaryCrossEntropyLossConfig,
        Dropout, DropoutConfig, Embedding, Linear, LinearConfig, Lstm, LstmConfig,
    },
    prelude::*,
    tensor::activation,
};
use ndarray::Array2;

// ─── SentimentModelConfig ─────────────────────────────────────────────────────
#[derive(Config, Debug)]
pub struct SentimentModelConfig {
    pub vocab_size: usize,
    pub embedding_dim: usize,

    #[config(default = 100)]
    pub hidden_size: usize,

    #[config(default = 0.5)]
    pub embed_dropout: f64,

    #[config(default = 0.2)]
    pub lstm_dropout: f64,
}

impl SentimentModelConfig {
    /// Build the model with its first layer frozen to `embedding_matrix`.
    /// The matrix shape must match (vocab_size, embedding_dim).
    pub fn init<B: Backend>(
        &self,
        embedding_matrix: &Array2<f32>,
        device: &B::Device,
    ) -> SentimentModel<B> {
        assert_eq!(
            embedding_matrix.dim(),
            (self.vocab_size, self.embedding_dim),
            "embedding matrix shape must match the tokenizer vocabulary",
        );

        // Row-major flatten, then reshape back on the device. The
        // weights never receive gradients: frozen, not fine-tuned.
        let flat: Vec<f32> = embedding_matrix.iter().copied().collect();
        let weight = Tensor::<B, 1>::from_floats(flat.as_slice(), device)
            .reshape([self.vocab_size, self.embedding_dim])
            .set_require_grad(false);
        let embedding = Embedding {
            weight: Param::from_tensor(weight),
        };

        SentimentModel {
            embedding,
            embed_dropout: DropoutConfig::new(self.embed_dropout).init(),
            lstm_dropout: DropoutConfig::new(self.lstm_dropout).init(),
            lstm: LstmConfig::new(self.embedding_dim, self.hidden_size, true).init(device),
            output: LinearConfig::new(self.hidden_size, 1).init(device),
        }
    }
}

// ─── SentimentModel ───────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct SentimentModel<B: Backend> {
    pub embedding: Embedding<B>,
    pub embed_dropout: Dropout,
    pub lstm_dropout: Dropout,
    pub lstm: Lstm<B>,
    pub output: Linear<B>,
}

impl<B: Backend> SentimentModel<B> {
    /// input_ids: [batch, seq_len] → probabilities: [batch], each in [0, 1]
    pub fn forward(&self, input_ids: Tensor<B, 2, Int>) -> Tensor<B, 1> {
        let [batch_size, _seq_len] = input_ids.dims();

        let x = self.embedding.forward(input_ids); // [batch, seq, dim]
        let x = self.embed_dropout.forward(x);
        let x = self.lstm_dropout.forward(x);

        // The final LSTM state summarises the whole (left-padded)
        // sequence; its hidden tensor is already [batch, hidden].
        let (_, final_state) = self.lstm.forward(x, None);
        let last = final_state.hidden;

        let logits = self.output.forward(last); // [batch, 1]
        activation::sigmoid(logits).reshape([batch_size])
    }

    /// Binary cross-entropy between predicted probabilities and 0/1 codes.
    pub fn forward_loss(
        &self,
        input_ids: Tensor<B, 2, Int>,
        labels: Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 1>) {
        let probs = self.forward(input_ids);
        let loss = BinaryCrossEntropyLossConfig::new()
            .init(&probs.device())
            .forward(probs.clone(), labels);
        (loss, probs)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type B = burn::backend::NdArray;

    fn tiny_model() -> SentimentModel<B> {
        let mut matrix = Array2::<f32>::zeros((6, 4));
        for i in 1..6 {
            for j in 0..4 {
                matrix[[i, j]] = (i * 10 + j) as f32 / 100.0;
            }
        }
        SentimentModelConfig::new(6, 4)
            .with_hidden_size(5)
            .init(&matrix, &Default::default())
    }

    #[test]
    fn test_forward_emits_one_probability_per_row() {
        let model = tiny_model();
        let input = Tensor::<B, 1, Int>::from_ints(
            [0, 0, 1, 2, 0, 3, 4, 5].as_slice(),
            &Default::default(),
        )
        .reshape([2, 4]);

        let probs = model.forward(input);
        assert_eq!(probs.dims(), [2]);
        let values: Vec<f32> = probs.into_data().convert::<f32>().to_vec().unwrap();
        assert!(values.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_loss_is_finite_scalar() {
        let model = tiny_model();
        let input = Tensor::<B, 1, Int>::from_ints(
            [0, 1, 2, 3, 3, 2, 1, 0].as_slice(),
            &Default::default(),
        )
        .reshape([2, 4]);
        let labels = Tensor::<B, 1, Int>::from_ints([1, 0].as_slice(), &Default::default());

        let (loss, probs) = model.forward_loss(input, labels);
        assert_eq!(probs.dims(), [2]);
        let loss: f32 = loss.into_scalar().elem();
        assert!(loss.is_finite());
        assert!(loss >= 0.0);
    }

    #[test]
    fn test_embedding_rows_match_the_matrix() {
        let model = tiny_model();
        let weight: Vec<f32> = model
            .embedding
            .weight
            .val()
            .into_data()
            .convert::<f32>()
            .to_vec()
            .unwrap();

        // Row 0 (padding) is all zeros, row 3 is the seeded pattern
        assert!(weight[..4].iter().all(|&x| x == 0.0));
        assert_eq!(&weight[12..16], &[0.30, 0.31, 0.32, 0.33]);
    }
}
