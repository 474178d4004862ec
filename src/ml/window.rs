// ============================================================
// Layer 5 — Rolling Window
// ============================================================
// Per-epoch training statistics are reported over the most
// recent batches rather than the whole epoch, so the numbers
// track the model as it is now, not as it was when the epoch
// started.

use std::collections::VecDeque;

/// Fixed-capacity window over the latest observations. Pushing
/// beyond capacity evicts the oldest value.
pub struct RollingWindow {
    values:   VecDeque<f64>,
    capacity: usize,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Mean of the window contents; NaN while empty.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return f64::NAN;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
