// ============================================================
// Layer 5 — Training Controller
// ============================================================
// The adaptive-control state machine evaluated once per epoch
// boundary. It owns plain counters instead of callback objects:
//
//   - ReduceLrOnPlateau: validation loss stalls for `patience`
//     epochs → multiply the learning rate by `factor`. Cooldown 0
//     means the very next stalled epoch counts toward the next
//     reduction again.
//   - EarlyStopping: validation accuracy fails to improve by at
//     least `min_delta` for `patience` epochs → stop the run.
//
// A run is RUNNING until the epoch budget is spent or early
// stopping fires (→ DONE), or a fatal error occurs (→ FAILED).

// ─── RunState ─────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Done,
    Failed,
}

// ─── ReduceLrOnPlateau ────────────────────────────────────────────────────────
#[derive(Debug)]
pub struct ReduceLrOnPlateau {
    factor: f64,
    patience: usize,
    min_delta: f64,
    cooldown: usize,
    min_lr: f64,
    best: f64,
    wait: usize,
    cooldown_left: usize,
}

impl ReduceLrOnPlateau {
    /// Monitor validation loss with patience 5, factor 0.1, cooldown 0.
    pub fn new() -> Self {
        Self {
            factor: 0.1,
            patience: 5,
            min_delta: 1e-4,
            cooldown: 0,
            min_lr: 0.0,
            best: f64::INFINITY,
            wait: 0,
            cooldown_left: 0,
        }
    }

    /// Feed one epoch's validation loss; returns the learning rate to
    /// use next (reduced on the `patience`-th consecutive stall).
    pub fn observe(&mut self, val_loss: f64, current_lr: f64) -> f64 {
        if val_loss < self.best - self.min_delta {
            self.best = val_loss;
            self.wait = 0;
            return current_lr;
        }

        if self.cooldown_left > 0 {
            self.cooldown_left -= 1;
            self.wait = 0;
            return current_lr;
        }

        self.wait += 1;
        if self.wait >= self.patience {
            self.wait = 0;
            self.cooldown_left = self.cooldown;
            return (current_lr * self.factor).max(self.min_lr);
        }
        current_lr
    }
}

impl Default for ReduceLrOnPlateau {
    fn default() -> Self {
        Self::new()
    }
}

// ─── EarlyStopping ────────────────────────────────────────────────────────────
#[derive(Debug)]
pub struct EarlyStopping {
    patience: usize,
    min_delta: f64,
    best: f64,
    wait: usize,
}

impl EarlyStopping {
    /// Monitor validation accuracy with patience 5, min_delta 1e-4.
    pub fn new() -> Self {
        Self {
            patience: 5,
            min_delta: 1e-4,
            best: f64::NEG_INFINITY,
            wait: 0,
        }
    }

    /// Feed one epoch's validation accuracy; true means stop now.
    pub fn observe(&mut self, val_acc: f64) -> bool {
        if val_acc > self.best + self.min_delta {
            self.best = val_acc;
            self.wait = 0;
            return false;
        }
        self.wait += 1;
        self.wait >= self.patience
    }
}

impl Default for EarlyStopping {
    fn default() -> Self {
        Self::new()
    }
}

// ─── TrainingController ───────────────────────────────────────────────────────
/// What the trainer should do after an epoch's evaluation.
#[derive(Debug, Clone, Copy)]
pub struct EpochDecision {
    /// Learning rate for the next epoch (possibly reduced)
    pub lr: f64,
    /// True when early stopping fired and the run is DONE
    pub stop: bool,
}

/// Bundles both controllers plus the run state.
#[derive(Debug)]
pub struct TrainingController {
    lr: f64,
    scheduler: ReduceLrOnPlateau,
    stopper: EarlyStopping,
    state: RunState,
}

impl TrainingController {
    pub fn new(initial_lr: f64) -> Self {
        Self {
            lr: initial_lr,
            scheduler: ReduceLrOnPlateau::new(),
            stopper: EarlyStopping::new(),
            state: RunState::Running,
        }
    }

    /// Learning rate to apply to the next optimizer step.
    pub fn lr(&self) -> f64 {
        self.lr
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Evaluate both controllers at an epoch boundary.
    pub fn on_epoch_end(&mut self, val_loss: f64, val_acc: f64) -> EpochDecision {
        let next_lr = self.scheduler.observe(val_loss, self.lr);
        if next_lr < self.lr {
            tracing::info!(
                "Validation loss plateaued — reducing learning rate {:.2e} → {:.2e}",
                self.lr,
                next_lr,
            );
        }
        self.lr = next_lr;

        let stop = self.stopper.observe(val_acc);
        if stop {
            self.state = RunState::Done;
            tracing::info!("Validation accuracy stalled — early stopping");
        }
        EpochDecision { lr: self.lr, stop }
    }

    /// All configured epochs ran to completion.
    pub fn finish(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Done;
        }
    }

    /// A fatal error ended the run.
    pub fn fail(&mut self) {
        self.state = RunState::Failed;
    }
}
