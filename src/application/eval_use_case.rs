// ============================================================
// Layer 2 — Evaluate Use Case
// ============================================================
// Scores a previously trained checkpoint on the held-out test
// split. The run record saved at training time is authoritative
// for everything architectural (hidden sizes, padding bounds,
// class count); the CLI only says which run to load and where
// the data lives now.

use anyhow::{ensure, Result};
use burn::data::dataloader::DataLoaderBuilder;

use crate::data::batcher::{FlatBatcher, HierBatcher};
use crate::data::corpus::{self, CsvCorpus};
use crate::data::dataset::{FlatDataset, HierarchicalDataset};
use crate::data::vocab::Vocabulary;
use crate::domain::selectors::{DatasetSelector, DeviceSelector, ModelKind, PaddingSpec};
use crate::domain::traits::{CorpusSource, Split};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{Fan, FanConfig, Han, HanConfig};
use crate::ml::trainer::evaluate;
use crate::ml::{resolve_device, InnerBackend};

/// Which run to evaluate and where its inputs live.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub dataset:        DatasetSelector,
    pub model:          ModelKind,
    pub data_dir:       String,
    pub checkpoint_dir: String,
    pub batch_size:     usize,
    pub words_per_doc:  usize,
    pub sent_per_doc:   usize,
    pub words_per_sent: usize,
    pub device:         DeviceSelector,
}

impl EvalConfig {
    // must match the key the training run was saved under
    fn checkpoint_key(&self) -> String {
        let padding = match self.model {
            ModelKind::Fan => PaddingSpec::Flat { words_per_doc: self.words_per_doc },
            ModelKind::Han => PaddingSpec::Hierarchical {
                sent_per_doc: self.sent_per_doc,
                words_per_sent: self.words_per_sent,
            },
        };
        format!("{}-{}-{}", self.dataset.as_str(), self.model.as_str(), padding.key())
    }
}

pub struct EvalUseCase {
    config: EvalConfig,
}

impl EvalUseCase {
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;
        let key = cfg.checkpoint_key();
        tracing::info!("Evaluating run {key}");

        let checkpoints = CheckpointManager::new(&cfg.checkpoint_dir);
        let run = checkpoints.load_run(&key)?;

        let paths = cfg.dataset.paths(&cfg.data_dir);
        let vocab = Vocabulary::from_word2vec_file(&paths.embedding_file)?;
        ensure!(
            vocab.dim() == run.embedding_dim,
            "embedding file is {}-dimensional but the checkpoint was trained with {} dimensions",
            vocab.dim(),
            run.embedding_dim
        );

        let source = CsvCorpus::new(paths);
        let test_docs = source.load_split(Split::Test)?;
        ensure!(!test_docs.is_empty(), "test split is empty");
        corpus::ensure_labels_within(&test_docs, run.num_classes, "test")?;
        tracing::info!("Test split: {} documents", test_docs.len());

        let device = resolve_device(cfg.device);
        let trained = &run.config;

        let (loss, acc) = match trained.model {
            ModelKind::Fan => {
                let loader = DataLoaderBuilder::new(FlatBatcher::<InnerBackend>::new(device.clone()))
                    .batch_size(cfg.batch_size)
                    .num_workers(1)
                    .build(FlatDataset::new(&test_docs, &vocab, trained.words_per_doc));
                let model: Fan<InnerBackend> =
                    FanConfig::new(trained.word_hidden_size, run.num_classes)
                        .init(&vocab, &device);
                let model = checkpoints.load_model(model, &key, &device)?;
                evaluate(&model, loader.as_ref())
            }
            ModelKind::Han => {
                let loader = DataLoaderBuilder::new(HierBatcher::<InnerBackend>::new(device.clone()))
                    .batch_size(cfg.batch_size)
                    .num_workers(1)
                    .build(HierarchicalDataset::new(
                        &test_docs,
                        &vocab,
                        trained.sent_per_doc,
                        trained.words_per_sent,
                    ));
                let model: Han<InnerBackend> = HanConfig::new(
                    trained.word_hidden_size,
                    trained.sent_hidden_size,
                    run.num_classes,
                )
                .init(&vocab, &device);
                let model = checkpoints.load_model(model, &key, &device)?;
                evaluate(&model, loader.as_ref())
            }
        };

        tracing::info!("Test loss {loss:.4}, accuracy {:.2}%", 100.0 * acc);
        println!("{key}: test loss {loss:.4}, accuracy {:.2}%", 100.0 * acc);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_key_matches_the_training_key_convention() {
        let cfg = EvalConfig {
            dataset: DatasetSelector::Amazon,
            model: ModelKind::Han,
            data_dir: "data".into(),
            checkpoint_dir: "checkpoints".into(),
            batch_size: 64,
            words_per_doc: 100,
            sent_per_doc: 15,
            words_per_sent: 25,
            device: DeviceSelector::Cpu,
        };
        assert_eq!(cfg.checkpoint_key(), "amazon-han-15s25w");
    }
}
