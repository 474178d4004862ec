// ============================================================
// Layer 6 — Checkpoints
// ============================================================
// A run is persisted as two files under the checkpoint
// directory, both named by the run key
// `{dataset}-{model}-{padding}` (e.g. `yelp-han-15s25w`):
//
//   {key}.mpk.gz — the model weights, written by burn's
//                  CompactRecorder
//   {key}.json   — the run record: the full training config plus
//                  the class count and embedding width, enough
//                  to rebuild an identical model and load the
//                  weights into it
//
// Retraining with the same key overwrites both files.

use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{CompactRecorder, Recorder},
    tensor::backend::Backend,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::application::train_use_case::TrainConfig;

/// Everything evaluation needs to rebuild the trained model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub config:        TrainConfig,
    pub num_classes:   usize,
    pub embedding_dim: usize,
}

/// Saves and restores runs under one checkpoint directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    // the recorder appends its own .mpk.gz extension
    fn model_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    fn run_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn save_model<B: Backend, M: Module<B>>(&self, model: M, key: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("cannot create checkpoint directory '{}'", self.dir.display()))?;
        let path = self.model_path(key);
        CompactRecorder::new()
            .record(model.into_record(), path.clone())
            .with_context(|| format!("cannot write checkpoint '{}'", path.display()))?;
        tracing::info!("Checkpoint saved: {}", path.display());
        Ok(())
    }

    /// Load saved weights into a freshly built model of the same
    /// architecture.
    pub fn load_model<B: Backend, M: Module<B>>(
        &self,
        model: M,
        key: &str,
        device: &B::Device,
    ) -> Result<M> {
        let path = self.model_path(key);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("cannot read checkpoint '{}'", path.display()))?;
        Ok(model.load_record(record))
    }

    pub fn save_run(&self, run: &RunRecord, key: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("cannot create checkpoint directory '{}'", self.dir.display()))?;
        let path = self.run_path(key);
        let json = serde_json::to_string_pretty(run)?;
        fs::write(&path, json)
            .with_context(|| format!("cannot write run record '{}'", path.display()))?;
        Ok(())
    }

    pub fn load_run(&self, key: &str) -> Result<RunRecord> {
        let path = self.run_path(key);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("cannot read run record '{}' (was this run trained?)", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("run record '{}' is not valid JSON", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::selectors::{DatasetSelector, DeviceSelector, ModelKind};

    fn temp_manager(name: &str) -> (CheckpointManager, PathBuf) {
        let dir = std::env::temp_dir()
            .join(format!("doc-attn-ckpt-{name}-{}", std::process::id()));
        (CheckpointManager::new(&dir), dir)
    }

    fn sample_run() -> RunRecord {
        RunRecord {
            config: TrainConfig {
                dataset: DatasetSelector::Synthetic,
                model: ModelKind::Fan,
                data_dir: "data".into(),
                checkpoint_dir: "checkpoints".into(),
                batch_size: 64,
                epochs: 100,
                lr: 0.01,
                momentum: 0.9,
                patience: 5,
                words_per_doc: 100,
                sent_per_doc: 15,
                words_per_sent: 25,
                word_hidden_size: 50,
                sent_hidden_size: 50,
                device: DeviceSelector::Cpu,
                window: 50,
                progress: false,
                seed: 42,
            },
            num_classes: 5,
            embedding_dim: 100,
        }
    }

    #[test]
    fn test_run_record_round_trips_through_json() {
        let (manager, dir) = temp_manager("run-record");
        let run = sample_run();
        let key = run.config.checkpoint_key();

        manager.save_run(&run, &key).unwrap();
        let loaded = manager.load_run(&key).unwrap();

        assert_eq!(loaded.num_classes, 5);
        assert_eq!(loaded.embedding_dim, 100);
        assert_eq!(loaded.config.checkpoint_key(), key);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_loading_a_missing_run_is_a_clear_error() {
        let (manager, dir) = temp_manager("missing");
        let err = manager.load_run("yelp-fan-100w").unwrap_err();
        assert!(err.to_string().contains("yelp-fan-100w"));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_model_weights_round_trip() {
        use crate::data::vocab::tiny_vocab;
        use crate::ml::model::{Fan, FanConfig};
        use crate::ml::InnerBackend;

        let (manager, dir) = temp_manager("weights");
        let vocab = tiny_vocab(&["good", "bad"]);
        let device = Default::default();
        let model: Fan<InnerBackend> = FanConfig::new(3, 2).init(&vocab, &device);

        manager.save_model(model.clone(), "synthetic-fan-3w").unwrap();
        let rebuilt: Fan<InnerBackend> = FanConfig::new(3, 2).init(&vocab, &device);
        let restored = manager
            .load_model(rebuilt, "synthetic-fan-3w", &device)
            .unwrap();

        // restored parameters equal the saved ones
        use crate::data::batcher::{FlatBatcher, LabeledBatch};
        use crate::data::dataset::FlatSample;
        use crate::ml::model::DocumentModel;
        use burn::data::dataloader::batcher::Batcher;
        let batch = FlatBatcher::new(device).batch(vec![FlatSample { label: 0, words: vec![2, 3, 0] }]);
        assert_eq!(batch.size(), 1);
        let a = model.forward(&batch).into_data().value;
        let b = restored.forward(&batch).into_data().value;
        assert_eq!(a, b);
        std::fs::remove_dir_all(dir).ok();
    }
}
