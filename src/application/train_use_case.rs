// ============================================================
// Layer 2 — Train Use Case
// ============================================================
// End-to-end training pipeline:
//
//   vocabulary → corpus splits → datasets/loaders → model
//   → training loop → checkpoint + run record + summary
//
// All knobs arrive resolved in an immutable TrainConfig; nothing
// below this layer re-reads CLI state or mutates configuration.

use anyhow::{ensure, Result};
use burn::data::dataloader::DataLoaderBuilder;
use burn::prelude::Backend;
use serde::{Deserialize, Serialize};

use crate::data::batcher::{FlatBatcher, HierBatcher};
use crate::data::corpus::{self, CsvCorpus};
use crate::data::dataset::{FlatDataset, HierarchicalDataset};
use crate::data::vocab::Vocabulary;
use crate::domain::selectors::{DatasetSelector, DeviceSelector, ModelKind, PaddingSpec};
use crate::domain::traits::{CorpusSource, Split};
use crate::infra::checkpoint::{CheckpointManager, RunRecord};
use crate::infra::metrics::MetricsLogger;
use crate::ml::model::{Fan, FanConfig, Han, HanConfig};
use crate::ml::trainer::train_loop;
use crate::ml::{resolve_device, InnerBackend, TrainBackend};

/// Every knob of one training run. Built once from the CLI and
/// never modified afterwards; the run record persists it as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset:          DatasetSelector,
    pub model:            ModelKind,
    pub data_dir:         String,
    pub checkpoint_dir:   String,
    pub batch_size:       usize,
    pub epochs:           usize,
    pub lr:               f64,
    pub momentum:         f64,
    pub patience:         usize,
    pub words_per_doc:    usize,
    pub sent_per_doc:     usize,
    pub words_per_sent:   usize,
    pub word_hidden_size: usize,
    pub sent_hidden_size: usize,
    pub device:           DeviceSelector,
    pub window:           usize,
    pub progress:         bool,
    pub seed:             u64,
}

impl TrainConfig {
    /// The padding bounds the chosen model shape actually uses.
    pub fn padding(&self) -> PaddingSpec {
        match self.model {
            ModelKind::Fan => PaddingSpec::Flat { words_per_doc: self.words_per_doc },
            ModelKind::Han => PaddingSpec::Hierarchical {
                sent_per_doc: self.sent_per_doc,
                words_per_sent: self.words_per_sent,
            },
        }
    }

    /// Checkpoint artifacts are keyed `{dataset}-{model}-{padding}`,
    /// so runs that differ in any of the three never collide.
    pub fn checkpoint_key(&self) -> String {
        format!("{}-{}-{}", self.dataset.as_str(), self.model.as_str(), self.padding().key())
    }

    /// The LR scheduler runs out of patience strictly before early
    /// stopping does, so a plateau gets at least one reduced-rate
    /// epoch before the run is abandoned.
    pub fn scheduler_patience(&self) -> usize {
        self.patience.saturating_sub(2)
    }

    /// Free-text summary persisted next to the checkpoint.
    pub fn summary(&self) -> String {
        format!(
            "run key:          {}\n\
             dataset:          {}\n\
             model:            {}\n\
             padding:          {}\n\
             batch size:       {}\n\
             epoch cap:        {}\n\
             learning rate:    {}\n\
             momentum:         {}\n\
             patience:         {}\n\
             word hidden size: {}\n\
             sent hidden size: {}\n\
             rolling window:   {}\n\
             seed:             {}\n",
            self.checkpoint_key(),
            self.dataset.as_str(),
            self.model.as_str(),
            self.padding().key(),
            self.batch_size,
            self.epochs,
            self.lr,
            self.momentum,
            self.patience,
            self.word_hidden_size,
            self.sent_hidden_size,
            self.window,
            self.seed,
        )
    }
}

/// Runs one training job from config to checkpoint.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;
        let key = cfg.checkpoint_key();
        tracing::info!("Training {} on {} (run key {key})", cfg.model.as_str(), cfg.dataset.as_str());

        let paths = cfg.dataset.paths(&cfg.data_dir);
        let vocab = Vocabulary::from_word2vec_file(&paths.embedding_file)?;
        tracing::info!("Vocabulary: {} words, {}-dimensional vectors", vocab.len(), vocab.dim());

        let source = CsvCorpus::new(paths);
        let train_docs = source.load_split(Split::Train)?;
        let val_docs = source.load_split(Split::Validation)?;
        ensure!(!train_docs.is_empty(), "training split is empty");
        ensure!(!val_docs.is_empty(), "validation split is empty");

        let num_classes = corpus::num_classes(&train_docs)?;
        corpus::ensure_labels_within(&val_docs, num_classes, "validation")?;
        tracing::info!(
            "Corpus: {} train / {} validation documents, {} classes",
            train_docs.len(),
            val_docs.len(),
            num_classes
        );

        TrainBackend::seed(cfg.seed);
        let device = resolve_device(cfg.device);

        let checkpoints = CheckpointManager::new(&cfg.checkpoint_dir);
        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;
        checkpoints.save_run(
            &RunRecord { config: cfg.clone(), num_classes, embedding_dim: vocab.dim() },
            &key,
        )?;

        match cfg.model {
            ModelKind::Fan => {
                let train_loader =
                    DataLoaderBuilder::new(FlatBatcher::<TrainBackend>::new(device.clone()))
                        .batch_size(cfg.batch_size)
                        .shuffle(cfg.seed)
                        .num_workers(1)
                        .build(FlatDataset::new(&train_docs, &vocab, cfg.words_per_doc));
                let val_loader =
                    DataLoaderBuilder::new(FlatBatcher::<InnerBackend>::new(device.clone()))
                        .batch_size(cfg.batch_size)
                        .num_workers(1)
                        .build(FlatDataset::new(&val_docs, &vocab, cfg.words_per_doc));

                let model: Fan<TrainBackend> =
                    FanConfig::new(cfg.word_hidden_size, num_classes).init(&vocab, &device);
                let trained = train_loop(cfg, model, train_loader, val_loader, &metrics)?;
                checkpoints.save_model(trained, &key)?;
            }
            ModelKind::Han => {
                let train_loader =
                    DataLoaderBuilder::new(HierBatcher::<TrainBackend>::new(device.clone()))
                        .batch_size(cfg.batch_size)
                        .shuffle(cfg.seed)
                        .num_workers(1)
                        .build(HierarchicalDataset::new(
                            &train_docs,
                            &vocab,
                            cfg.sent_per_doc,
                            cfg.words_per_sent,
                        ));
                let val_loader =
                    DataLoaderBuilder::new(HierBatcher::<InnerBackend>::new(device.clone()))
                        .batch_size(cfg.batch_size)
                        .num_workers(1)
                        .build(HierarchicalDataset::new(
                            &val_docs,
                            &vocab,
                            cfg.sent_per_doc,
                            cfg.words_per_sent,
                        ));

                let model: Han<TrainBackend> =
                    HanConfig::new(cfg.word_hidden_size, cfg.sent_hidden_size, num_classes)
                        .init(&vocab, &device);
                let trained = train_loop(cfg, model, train_loader, val_loader, &metrics)?;
                checkpoints.save_model(trained, &key)?;
            }
        }

        metrics.log_hyperparameters(&cfg.summary())?;
        tracing::info!("Training complete; artifacts under '{}'", cfg.checkpoint_dir);
        Ok(())
    }
}
