// ============================================================
// Layer 5 — Document Classifiers
// ============================================================
// Two classifiers over the same attention encoder:
//
//   FAN — flattened attention network. One word-level encoder
//         reads the whole document as a single word sequence.
//
//   HAN — hierarchical attention network. A word-level encoder
//         turns each sentence into a vector, a sentence-level
//         encoder turns the sentence vectors into the document
//         vector.
//
// Both embed word indices through a table initialised from the
// pretrained vectors (and fine-tuned with the rest of the
// parameters), and both end in a linear head over log-softmax,
// so the loss is a plain negative log-likelihood.

use burn::{
    module::Param,
    nn::{Embedding, EmbeddingConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::log_softmax,
};

use crate::data::batcher::{FlatBatch, HierBatch, LabeledBatch};
use crate::data::vocab::Vocabulary;
use crate::ml::encoder::{AttentionEncoder, AttentionEncoderConfig};

/// What the training loop needs from a classifier: a batch type
/// carrying labels and a forward pass to per-class log
/// probabilities of shape [batch_size, num_classes].
pub trait DocumentModel<B: Backend>: Module<B> {
    type Batch: LabeledBatch<B> + Clone + Send + 'static;

    fn forward(&self, batch: &Self::Batch) -> Tensor<B, 2>;
}

/// Embedding table seeded with the pretrained vectors, one row
/// per vocabulary entry. The PAD row starts at zero but is NOT
/// frozen; like every other row it trains freely.
fn pretrained_embedding<B: Backend>(vocab: &Vocabulary, device: &B::Device) -> Embedding<B> {
    let weight = Tensor::<B, 1>::from_floats(vocab.embedding_rows(), device)
        .reshape([vocab.len(), vocab.dim()]);
    let mut embedding = EmbeddingConfig::new(vocab.len(), vocab.dim()).init(device);
    embedding.weight = Param::from_tensor(weight);
    embedding
}

// ─── FAN ─────────────────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct FanConfig {
    pub word_hidden_size: usize,
    pub num_classes:      usize,
}

impl FanConfig {
    pub fn init<B: Backend>(&self, vocab: &Vocabulary, device: &B::Device) -> Fan<B> {
        Fan {
            embedding: pretrained_embedding(vocab, device),
            word_encoder: AttentionEncoderConfig::new(vocab.dim(), self.word_hidden_size)
                .init(device),
            classifier: LinearConfig::new(2 * self.word_hidden_size, self.num_classes)
                .init(device),
        }
    }
}

/// Flattened attention network.
#[derive(Module, Debug)]
pub struct Fan<B: Backend> {
    embedding:    Embedding<B>,
    word_encoder: AttentionEncoder<B>,
    classifier:   Linear<B>,
}

impl<B: Backend> DocumentModel<B> for Fan<B> {
    type Batch = FlatBatch<B>;

    /// [batch_size, words_per_doc] indices → [batch_size, num_classes]
    /// log probabilities.
    fn forward(&self, batch: &FlatBatch<B>) -> Tensor<B, 2> {
        let embedded = self.embedding.forward(batch.documents.clone());
        let (document, _word_weights) = self.word_encoder.forward(embedded);
        log_softmax(self.classifier.forward(document), 1)
    }
}

// ─── HAN ─────────────────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct HanConfig {
    pub word_hidden_size: usize,
    pub sent_hidden_size: usize,
    pub num_classes:      usize,
}

impl HanConfig {
    pub fn init<B: Backend>(&self, vocab: &Vocabulary, device: &B::Device) -> Han<B> {
        Han {
            embedding: pretrained_embedding(vocab, device),
            word_encoder: AttentionEncoderConfig::new(vocab.dim(), self.word_hidden_size)
                .init(device),
            sent_encoder: AttentionEncoderConfig::new(
                2 * self.word_hidden_size,
                self.sent_hidden_size,
            )
            .init(device),
            classifier: LinearConfig::new(2 * self.sent_hidden_size, self.num_classes)
                .init(device),
        }
    }
}

/// Hierarchical attention network.
#[derive(Module, Debug)]
pub struct Han<B: Backend> {
    embedding:    Embedding<B>,
    word_encoder: AttentionEncoder<B>,
    sent_encoder: AttentionEncoder<B>,
    classifier:   Linear<B>,
}

impl<B: Backend> DocumentModel<B> for Han<B> {
    type Batch = HierBatch<B>;

    /// [batch_size, sent_per_doc, words_per_sent] indices →
    /// [batch_size, num_classes] log probabilities.
    ///
    /// The word level treats every sentence of every document as
    /// an independent sequence by folding the sentence dimension
    /// into the batch dimension, then unfolds for the sentence
    /// level.
    fn forward(&self, batch: &HierBatch<B>) -> Tensor<B, 2> {
        let [batch_size, sent_per_doc, words_per_sent] = batch.documents.dims();

        let words = batch
            .documents
            .clone()
            .reshape([batch_size * sent_per_doc, words_per_sent]);
        let embedded = self.embedding.forward(words);
        let (sentences, _word_weights) = self.word_encoder.forward(embedded);

        let d_sentence = sentences.dims()[1];
        let sentence_seq = sentences.reshape([batch_size, sent_per_doc, d_sentence]);
        let (document, _sent_weights) = self.sent_encoder.forward(sentence_seq);

        log_softmax(self.classifier.forward(document), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::vocab::tiny_vocab;
    use crate::ml::InnerBackend;

    type B = InnerBackend;

    fn flat_batch(rows: Vec<Vec<i64>>, labels: Vec<i64>) -> FlatBatch<B> {
        use crate::data::batcher::FlatBatcher;
        use crate::data::dataset::FlatSample;
        use burn::data::dataloader::batcher::Batcher;

        let items = rows
            .into_iter()
            .zip(labels)
            .map(|(words, label)| FlatSample { label, words })
            .collect();
        FlatBatcher::new(Default::default()).batch(items)
    }

    fn hier_batch(grids: Vec<Vec<Vec<i64>>>, labels: Vec<i64>) -> HierBatch<B> {
        use crate::data::batcher::HierBatcher;
        use crate::data::dataset::HierSample;
        use burn::data::dataloader::batcher::Batcher;

        let items = grids
            .into_iter()
            .zip(labels)
            .map(|(sentences, label)| HierSample { label, sentences })
            .collect();
        HierBatcher::new(Default::default()).batch(items)
    }

    #[test]
    fn test_fan_output_is_log_probabilities() {
        let vocab = tiny_vocab(&["good", "bad"]);
        let model: Fan<B> = FanConfig::new(3, 4).init(&vocab, &Default::default());
        let batch = flat_batch(vec![vec![2, 3, 0], vec![3, 0, 0]], vec![0, 1]);

        let out = model.forward(&batch);
        assert_eq!(out.dims(), [2, 4]);
        // log probabilities: each row's exponentials sum to 1
        let row_sums = out.exp().sum_dim(1).into_data().value;
        for sum in row_sums {
            assert!((sum - 1.0).abs() < 1e-4, "row sum {sum}");
        }
    }

    #[test]
    fn test_han_output_is_log_probabilities() {
        let vocab = tiny_vocab(&["good", "bad"]);
        let model: Han<B> = HanConfig::new(3, 2, 5).init(&vocab, &Default::default());
        let batch = hier_batch(
            vec![
                vec![vec![2, 3], vec![0, 0]],
                vec![vec![3, 2], vec![2, 0]],
            ],
            vec![0, 1],
        );

        let out = model.forward(&batch);
        assert_eq!(out.dims(), [2, 5]);
        let row_sums = out.exp().sum_dim(1).into_data().value;
        for sum in row_sums {
            assert!((sum - 1.0).abs() < 1e-4, "row sum {sum}");
        }
    }

    #[test]
    fn test_forward_is_deterministic_for_fixed_parameters() {
        let vocab = tiny_vocab(&["good"]);
        let model: Fan<B> = FanConfig::new(2, 2).init(&vocab, &Default::default());
        let batch = flat_batch(vec![vec![2, 0]], vec![0]);

        let a = model.forward(&batch).into_data().value;
        let b = model.forward(&batch).into_data().value;
        assert_eq!(a, b);
    }

    #[test]
    fn test_embedding_rows_come_from_the_vocabulary() {
        let vocab = tiny_vocab(&["good"]);
        let embedding: Embedding<B> = pretrained_embedding(&vocab, &Default::default());
        let weight = embedding.weight.val().into_data().value;
        // PAD row is all zero by construction of the vocabulary
        assert_eq!(&weight[..vocab.dim()], &vec![0.0; vocab.dim()][..]);
        assert_eq!(weight.len(), vocab.len() * vocab.dim());
    }
}
