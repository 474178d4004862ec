// ============================================================
// Layer 5 — Attention Encoder
// ============================================================
// The shared building block of both classifiers. Given a batch
// of embedded sequences it:
//
//   1. runs a forward GRU and a backward GRU (the input flipped
//      along time, the output flipped back) and concatenates the
//      two hidden sequences into per-step annotations,
//   2. scores each annotation against a learned context vector
//      through a tanh projection,
//   3. softmax-normalises the scores into attention weights, and
//   4. returns the weight-averaged annotation plus the weights
//      themselves for inspection.
//
// Recurrent state always starts at zero: every forward pass is
// handed `None` as the initial state, so nothing leaks between
// batches and sequences within a batch stay independent.
//
// PAD positions are deliberately not masked out of the softmax.
// The attention is free to learn that PAD annotations carry no
// signal; masking them would change the published architecture.

use burn::{
    module::Param,
    nn::{
        gru::{Gru, GruConfig},
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::{activation::tanh, Distribution},
};

/// Hyperparameters of one [`AttentionEncoder`].
#[derive(Config, Debug)]
pub struct AttentionEncoderConfig {
    /// Width of the incoming embedded steps.
    pub d_input: usize,
    /// Hidden size of each GRU direction; annotations and the
    /// encoder output are twice this wide.
    pub d_hidden: usize,
}

impl AttentionEncoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> AttentionEncoder<B> {
        let d_annotation = 2 * self.d_hidden;
        AttentionEncoder {
            forward_rnn: GruConfig::new(self.d_input, self.d_hidden, true).init(device),
            backward_rnn: GruConfig::new(self.d_input, self.d_hidden, true).init(device),
            attention: LinearConfig::new(d_annotation, d_annotation).init(device),
            context: Param::from_tensor(Tensor::random(
                [d_annotation],
                Distribution::Uniform(-0.1, 0.1),
                device,
            )),
            d_hidden: self.d_hidden,
        }
    }
}

/// Bi-directional GRU with context-vector attention pooling.
#[derive(Module, Debug)]
pub struct AttentionEncoder<B: Backend> {
    forward_rnn:  Gru<B>,
    backward_rnn: Gru<B>,
    attention:    Linear<B>,
    context:      Param<Tensor<B, 1>>,
    d_hidden:     usize,
}

impl<B: Backend> AttentionEncoder<B> {
    /// Encode a batch of sequences into one vector each.
    ///
    /// * `sequence` — shape: [batch_size, seq_len, d_input]
    ///
    /// Returns `(output, weights)`:
    /// * `output` — shape: [batch_size, 2 * d_hidden]
    /// * `weights` — shape: [batch_size, seq_len], rows sum to 1
    pub fn forward(&self, sequence: Tensor<B, 3>) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let [batch_size, seq_len, _] = sequence.dims();
        let d_annotation = 2 * self.d_hidden;

        // fresh zero state on every call
        let ahead = self.forward_rnn.forward(sequence.clone(), None);
        let behind = self.backward_rnn.forward(sequence.flip([1]), None).flip([1]);
        let annotations = Tensor::cat(vec![ahead, behind], 2);

        let projected = tanh(self.attention.forward(annotations.clone()));
        let scores = (projected * self.context.val().reshape([1, 1, d_annotation]))
            .sum_dim(2)
            .reshape([batch_size, seq_len]);
        let weights = stable_softmax(scores);

        let pooled = (annotations * weights.clone().reshape([batch_size, seq_len, 1]))
            .sum_dim(1)
            .reshape([batch_size, d_annotation]);
        (pooled, weights)
    }
}

/// Row-wise softmax with the per-row maximum subtracted first,
/// so large scores cannot overflow the exponential.
fn stable_softmax<B: Backend>(scores: Tensor<B, 2>) -> Tensor<B, 2> {
    let shifted = scores.clone() - scores.max_dim(1);
    let exp = shifted.exp();
    exp.clone() / exp.sum_dim(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::InnerBackend;

    type B = InnerBackend;

    fn encoder() -> AttentionEncoder<B> {
        AttentionEncoderConfig::new(4, 3).init(&Default::default())
    }

    fn embedded(batch: usize, len: usize) -> Tensor<B, 3> {
        Tensor::random([batch, len, 4], Distribution::Uniform(-1.0, 1.0), &Default::default())
    }

    #[test]
    fn test_output_and_weight_shapes() {
        let (output, weights) = encoder().forward(embedded(2, 5));
        assert_eq!(output.dims(), [2, 6]);
        assert_eq!(weights.dims(), [2, 5]);
    }

    #[test]
    fn test_attention_weights_are_a_distribution() {
        let (_, weights) = encoder().forward(embedded(3, 7));
        let values = weights.clone().into_data().value;
        assert!(values.iter().all(|&w| w >= 0.0));
        let row_sums = weights.sum_dim(1).into_data().value;
        for sum in row_sums {
            assert!((sum - 1.0).abs() < 1e-5, "row sum {sum}");
        }
    }

    #[test]
    fn test_forward_is_deterministic() {
        let enc = encoder();
        let input = embedded(2, 4);
        let (a, _) = enc.forward(input.clone());
        let (b, _) = enc.forward(input);
        assert_eq!(a.into_data().value, b.into_data().value);
    }

    #[test]
    fn test_stable_softmax_handles_large_scores() {
        let scores = Tensor::<B, 2>::from_floats([[1000.0, 999.0, 998.0]], &Default::default());
        let weights = stable_softmax(scores).into_data().value;
        assert!(weights.iter().all(|w| w.is_finite()));
        let sum: f32 = weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }
}
