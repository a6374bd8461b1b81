// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// Everything that learns lives here: the unsupervised embedding
// trainer, the matrix join that feeds it into the classifier,
// the classifier itself, and the training loop with its
// epoch-boundary controller. No other layer imports burn types
// except the data layer's batcher.

// Unsupervised word2vec embedding trainer
pub mod word2vec;

// Embedding space × tokenizer vocabulary → frozen weight matrix
pub mod embedding;

// The LSTM classifier
pub mod model;

// Learning-rate-on-plateau + early-stopping state machine
pub mod controller;

// The epoch loop and evaluation passes
pub mod trainer;
