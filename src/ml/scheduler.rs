// ============================================================
// Layer 5 — Reduce-LR-on-Plateau
// ============================================================
// Validation loss drives the learning rate: every epoch the
// controller is shown the new value, and once the loss has gone
// `patience` consecutive epochs without improving on the best it
// has ever seen, the rate is multiplied by `factor` and the
// stale count resets.
//
// Its patience is set strictly below the early-stopping patience
// by the caller, so a plateau always gets at least one reduced-
// rate epoch to recover before training is abandoned.

/// Multiplicative learning-rate controller keyed on a plateauing
/// validation loss.
pub struct ReduceLrOnPlateau {
    lr:           f64,
    factor:       f64,
    patience:     usize,
    best_loss:    f64,
    stale_epochs: usize,
}

impl ReduceLrOnPlateau {
    pub fn new(initial_lr: f64, factor: f64, patience: usize) -> Self {
        Self {
            lr: initial_lr,
            factor,
            patience,
            best_loss: f64::INFINITY,
            stale_epochs: 0,
        }
    }

    /// The rate to train with right now.
    pub fn lr(&self) -> f64 {
        self.lr
    }

    /// Feed one epoch's validation loss; returns the rate for the
    /// next epoch.
    pub fn observe(&mut self, val_loss: f64) -> f64 {
        if val_loss < self.best_loss {
            self.best_loss = val_loss;
            self.stale_epochs = 0;
        } else {
            self.stale_epochs += 1;
            if self.stale_epochs > self.patience {
                self.lr *= self.factor;
                self.stale_epochs = 0;
                tracing::info!("Validation loss plateaued; learning rate reduced to {:e}", self.lr);
            }
        }
        self.lr
    }
}
