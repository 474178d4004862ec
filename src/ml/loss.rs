// ============================================================
// Layer 5 — Loss and Accuracy
// ============================================================
// The classifiers already emit log probabilities, so the loss is
// the negative log-likelihood: gather the log probability of the
// true class per row, average, negate.

use burn::prelude::*;

/// Mean negative log-likelihood of the true classes.
///
/// * `log_probs` — shape: [batch_size, num_classes]
/// * `targets` — shape: [batch_size]
pub fn nll_loss<B: Backend>(log_probs: Tensor<B, 2>, targets: Tensor<B, 1, Int>) -> Tensor<B, 1> {
    let [batch_size, _] = log_probs.dims();
    let picked = log_probs.gather(1, targets.reshape([batch_size, 1]));
    picked.mean().neg()
}

/// Number of rows whose most probable class matches the target.
pub fn correct_predictions<B: Backend>(
    log_probs: Tensor<B, 2>,
    targets: Tensor<B, 1, Int>,
) -> usize {
    let predicted = log_probs.argmax(1).flatten::<1>(0, 1);
    predicted
        .equal(targets)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>() as usize
}
