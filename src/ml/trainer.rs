// ============================================================
// Layer 5 — Training Loop
// ============================================================
// One generic loop serves FAN and HAN: everything model-specific
// sits behind the DocumentModel trait, and burn's optimizer API
// is functional (step consumes the model and returns the next
// one), so `model.clone()` at an improvement point is a real
// snapshot that later steps can never mutate.
//
// Per epoch:
//   TRAINING    forward → NLL loss → backward → SGD+momentum
//               step, with loss/accuracy tracked over a rolling
//               window of recent batches
//   VALIDATING  the autodiff-free copy of the model scores the
//               validation loader
//   DECIDING    reduce-LR-on-plateau sees the validation loss,
//               then early stopping: snapshot on improvement,
//               keep going while patience lasts, otherwise
//               restore the snapshot and stop
//
// A non-finite training loss aborts the run immediately; there
// is nothing worth saving once NaN has entered the parameters.

use anyhow::{ensure, Result};
use std::io::Write as _;
use std::sync::Arc;

use burn::{
    data::dataloader::DataLoader,
    module::AutodiffModule,
    optim::{momentum::MomentumConfig, GradientsParams, Optimizer, SgdConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::batcher::LabeledBatch;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::loss::{correct_predictions, nll_loss};
use crate::ml::model::DocumentModel;
use crate::ml::scheduler::ReduceLrOnPlateau;
use crate::ml::stopping::{EarlyStopper, StopDecision};
use crate::ml::window::RollingWindow;

/// Factor applied to the learning rate on a plateau.
const LR_FACTOR: f64 = 0.1;

/// Train `model` until early stopping or the epoch cap, whichever
/// comes first, and return the best-validation-loss snapshot.
pub fn train_loop<B, M>(
    cfg: &TrainConfig,
    mut model: M,
    train_loader: Arc<dyn DataLoader<M::Batch>>,
    val_loader: Arc<dyn DataLoader<<M::InnerModule as DocumentModel<B::InnerBackend>>::Batch>>,
    metrics: &MetricsLogger,
) -> Result<M>
where
    B: AutodiffBackend,
    M: DocumentModel<B> + AutodiffModule<B>,
    M::InnerModule: DocumentModel<B::InnerBackend>,
{
    // classical momentum, no dampening
    let momentum = MomentumConfig::new()
        .with_momentum(cfg.momentum)
        .with_dampening(0.0);
    let mut optim = SgdConfig::new().with_momentum(Some(momentum)).init();
    let mut lr_controller = ReduceLrOnPlateau::new(cfg.lr, LR_FACTOR, cfg.scheduler_patience());
    let mut stopper = EarlyStopper::new(cfg.patience);
    let mut best_model = model.clone();

    for epoch in 1..=cfg.epochs {
        // ─── TRAINING ───
        let lr = lr_controller.lr();
        let mut window_loss = RollingWindow::new(cfg.window);
        let mut window_acc = RollingWindow::new(cfg.window);
        let mut seen = 0usize;

        for batch in train_loader.iter() {
            let log_probs = model.forward(&batch);
            let loss = nll_loss(log_probs.clone(), batch.labels());
            let loss_value = loss.clone().into_scalar().elem::<f64>();
            ensure!(
                loss_value.is_finite(),
                "training loss became non-finite ({loss_value}) in epoch {epoch}"
            );

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(lr, model, grads);

            let batch_size = batch.size();
            window_loss.push(loss_value);
            window_acc.push(correct_predictions(log_probs, batch.labels()) as f64 / batch_size as f64);
            seen += batch_size;

            if cfg.progress {
                print!("\r  epoch {epoch}: {seen} documents, loss {:.4}", window_loss.mean());
                let _ = std::io::stdout().flush();
            }
        }
        if cfg.progress {
            println!();
        }
        let train_loss = window_loss.mean();
        let train_acc = window_acc.mean();

        // ─── VALIDATING ───
        let (val_loss, val_acc) = evaluate(&model.valid(), val_loader.as_ref());

        tracing::info!(
            "Epoch {epoch}: train loss {train_loss:.4} acc {:.1}% | val loss {val_loss:.4} acc {:.1}% | lr {lr:e}",
            100.0 * train_acc,
            100.0 * val_acc,
        );
        metrics.log(&EpochMetrics { epoch, train_loss, train_acc, val_loss, val_acc, lr })?;

        // ─── DECIDING ───
        lr_controller.observe(val_loss);
        match stopper.observe(val_loss) {
            StopDecision::Improved => best_model = model.clone(),
            StopDecision::Continue => {}
            StopDecision::Stop => {
                tracing::info!(
                    "No validation improvement for {} epochs; stopping at epoch {epoch} and \
                     restoring the best snapshot (val loss {:.4})",
                    cfg.patience,
                    stopper.best_loss(),
                );
                return Ok(best_model);
            }
        }
    }

    tracing::info!(
        "Epoch cap reached; returning the best snapshot (val loss {:.4})",
        stopper.best_loss()
    );
    Ok(best_model)
}

/// Score a model over a loader without touching gradients.
/// Returns (mean batch loss, overall accuracy).
pub fn evaluate<B, M>(model: &M, loader: &dyn DataLoader<M::Batch>) -> (f64, f64)
where
    B: Backend,
    M: DocumentModel<B>,
{
    let mut loss_sum = 0.0;
    let mut batches = 0usize;
    let mut correct = 0usize;
    let mut total = 0usize;

    for batch in loader.iter() {
        let log_probs = model.forward(&batch);
        loss_sum += nll_loss(log_probs.clone(), batch.labels())
            .into_scalar()
            .elem::<f64>();
        batches += 1;
        correct += correct_predictions(log_probs, batch.labels());
        total += batch.size();
    }

    let loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };
    let acc = if total > 0 { correct as f64 / total as f64 } else { 0.0 };
    (loss, acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::batcher::{FlatBatch, FlatBatcher};
    use crate::data::dataset::{FlatDataset, FlatSample};
    use crate::data::vocab::tiny_vocab;
    use crate::domain::document::LabeledDocument;
    use crate::domain::selectors::{DatasetSelector, DeviceSelector, ModelKind};
    use crate::ml::model::{Fan, FanConfig};
    use crate::ml::{InnerBackend, TrainBackend};
    use burn::data::dataloader::batcher::Batcher;
    use burn::data::dataloader::DataLoaderBuilder;
    use burn::data::dataset::Dataset;

    fn toy_docs() -> Vec<LabeledDocument> {
        vec![
            LabeledDocument::new(0, "good fine good"),
            LabeledDocument::new(0, "fine good fine"),
            LabeledDocument::new(1, "bad awful bad"),
            LabeledDocument::new(1, "awful bad awful"),
        ]
    }

    fn toy_config(dir: &str) -> TrainConfig {
        TrainConfig {
            dataset: DatasetSelector::Synthetic,
            model: ModelKind::Fan,
            data_dir: dir.to_string(),
            checkpoint_dir: dir.to_string(),
            batch_size: 4,
            epochs: 5,
            lr: 0.5,
            momentum: 0.9,
            patience: 5,
            words_per_doc: 3,
            sent_per_doc: 2,
            words_per_sent: 3,
            word_hidden_size: 4,
            sent_hidden_size: 4,
            device: DeviceSelector::Cpu,
            window: 50,
            progress: false,
            seed: 3,
        }
    }

    fn temp_dir(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!("doc-attn-trainer-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.to_string_lossy().into_owned()
    }

    #[test]
    fn test_training_reduces_loss_on_a_separable_toy_corpus() {
        let dir = temp_dir("separable");
        let cfg = toy_config(&dir);
        let vocab = tiny_vocab(&["good", "bad", "fine", "awful"]);
        let docs = toy_docs();
        let device = Default::default();

        TrainBackend::seed(cfg.seed);
        let model: Fan<TrainBackend> =
            FanConfig::new(cfg.word_hidden_size, 2).init(&vocab, &device);

        let train_loader = DataLoaderBuilder::new(FlatBatcher::<TrainBackend>::new(device))
            .batch_size(cfg.batch_size)
            .num_workers(1)
            .build(FlatDataset::new(&docs, &vocab, cfg.words_per_doc));
        let val_loader = DataLoaderBuilder::new(FlatBatcher::<InnerBackend>::new(Default::default()))
            .batch_size(cfg.batch_size)
            .num_workers(1)
            .build(FlatDataset::new(&docs, &vocab, cfg.words_per_doc));

        let (before_loss, _) = evaluate(&model.valid(), val_loader.as_ref());
        let metrics = MetricsLogger::new(&dir).unwrap();
        let trained = train_loop(&cfg, model, train_loader, val_loader.clone(), &metrics).unwrap();
        let (after_loss, _) = evaluate(&trained.valid(), val_loader.as_ref());

        assert!(
            after_loss < before_loss,
            "loss did not improve: {before_loss} -> {after_loss}"
        );
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_early_stop_restores_the_best_epoch_snapshot() {
        let dir = temp_dir("rollback");
        let mut cfg = toy_config(&dir);
        cfg.patience = 1;
        cfg.epochs = 8;
        cfg.lr = 0.5;

        let vocab = tiny_vocab(&["good", "bad", "fine", "awful"]);
        let train_docs = toy_docs();
        // validation labels are inverted relative to training, so
        // the validation loss worsens as soon as training makes
        // real progress and early stopping fires shortly after
        // the first snapshot
        let val_docs: Vec<LabeledDocument> = train_docs
            .iter()
            .map(|d| LabeledDocument::new(1 - d.label, d.text.clone()))
            .collect();
        let device = burn::backend::ndarray::NdArrayDevice::default();

        let dataset = FlatDataset::new(&train_docs, &vocab, cfg.words_per_doc);
        let samples: Vec<FlatSample> =
            (0..dataset.len()).filter_map(|i| dataset.get(i)).collect();
        let probe: FlatBatch<InnerBackend> =
            FlatBatcher::new(Default::default()).batch(samples.clone());

        let train_loader =
            DataLoaderBuilder::new(FlatBatcher::<TrainBackend>::new(device.clone()))
                .batch_size(cfg.batch_size)
                .num_workers(1)
                .build(FlatDataset::new(&train_docs, &vocab, cfg.words_per_doc));
        let val_loader =
            DataLoaderBuilder::new(FlatBatcher::<InnerBackend>::new(Default::default()))
                .batch_size(cfg.batch_size)
                .num_workers(1)
                .build(FlatDataset::new(&val_docs, &vocab, cfg.words_per_doc));

        TrainBackend::seed(cfg.seed);
        let model: Fan<TrainBackend> =
            FanConfig::new(cfg.word_hidden_size, 2).init(&vocab, &device);
        let metrics = MetricsLogger::new(&dir).unwrap();
        let trained =
            train_loop(&cfg, model, train_loader, val_loader.clone(), &metrics).unwrap();
        let returned = trained.valid().forward(&probe).into_data().value;

        // replay the identical run by hand (same seed, same data
        // order, same update rule; with patience 1 the learning
        // rate never changes before the run stops) and record the
        // probe output after every epoch
        TrainBackend::seed(cfg.seed);
        let mut replica: Fan<TrainBackend> =
            FanConfig::new(cfg.word_hidden_size, 2).init(&vocab, &device);
        let momentum = MomentumConfig::new()
            .with_momentum(cfg.momentum)
            .with_dampening(0.0);
        let mut optim = SgdConfig::new().with_momentum(Some(momentum)).init();
        let train_batch: FlatBatch<TrainBackend> =
            FlatBatcher::new(device).batch(samples);

        let mut best_loss = f64::INFINITY;
        let mut best_output = Vec::new();
        let mut last_output = Vec::new();
        let mut stopped = false;
        for _epoch in 1..=cfg.epochs {
            let log_probs = replica.forward(&train_batch);
            let loss = nll_loss(log_probs, train_batch.labels());
            let grads = GradientsParams::from_grads(loss.backward(), &replica);
            replica = optim.step(cfg.lr, replica, grads);

            let (val_loss, _) = evaluate(&replica.valid(), val_loader.as_ref());
            last_output = replica.valid().forward(&probe).into_data().value;
            if val_loss < best_loss {
                best_loss = val_loss;
                best_output = last_output.clone();
            } else {
                stopped = true;
                break;
            }
        }

        assert!(stopped, "the run never hit a non-improving epoch");
        assert_eq!(returned, best_output, "returned model is not the best snapshot");
        assert_ne!(returned, last_output, "returned model equals the post-stop model");
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_evaluate_reports_perfect_accuracy_for_a_constant_mapping() {
        // single-class corpus: any trained-enough model aside, a
        // freshly initialised model still yields a finite loss
        // and an accuracy within [0, 1]
        let vocab = tiny_vocab(&["good"]);
        let docs = vec![
            LabeledDocument::new(0, "good good"),
            LabeledDocument::new(0, "good"),
        ];
        let model: Fan<InnerBackend> = FanConfig::new(2, 2).init(&vocab, &Default::default());
        let loader = DataLoaderBuilder::new(FlatBatcher::<InnerBackend>::new(Default::default()))
            .batch_size(2)
            .num_workers(1)
            .build(FlatDataset::new(&docs, &vocab, 2));

        let (loss, acc) = evaluate(&model, loader.as_ref());
        assert!(loss.is_finite());
        assert!((0.0..=1.0).contains(&acc));
    }
}
