// ============================================================
// Layer 5 — Early Stopping
// ============================================================
// Tracks the best validation loss seen so far and how many
// consecutive epochs have failed to beat it. The training loop
// snapshots the model on every `Improved` and hands the snapshot
// back when `Stop` fires, so the weights that ship are the best
// observed, not the last computed.

/// What the training loop should do after one validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopDecision {
    /// New best validation loss: snapshot the model.
    Improved,
    /// No improvement, but patience remains.
    Continue,
    /// Patience exhausted: restore the snapshot and stop.
    Stop,
}

pub struct EarlyStopper {
    patience:     usize,
    best_loss:    f64,
    stale_epochs: usize,
}

impl EarlyStopper {
    pub fn new(patience: usize) -> Self {
        Self {
            patience: patience.max(1),
            best_loss: f64::INFINITY,
            stale_epochs: 0,
        }
    }

    pub fn observe(&mut self, val_loss: f64) -> StopDecision {
        if val_loss < self.best_loss {
            self.best_loss = val_loss;
            self.stale_epochs = 0;
            return StopDecision::Improved;
        }
        self.stale_epochs += 1;
        if self.stale_epochs >= self.patience {
            StopDecision::Stop
        } else {
            StopDecision::Continue
        }
    }

    pub fn best_loss(&self) -> f64 {
        self.best_loss
    }
}
