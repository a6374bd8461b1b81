// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to run one full training job.
// Holds no ML or I/O logic of its own — it sequences the stages
// and owns the run configuration.

pub mod train_use_case;
