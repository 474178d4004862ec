// ============================================================
// Layer 6 — Metrics Persistence
// ============================================================
// Two artifacts per run, both under the checkpoint directory:
//
//   metrics.csv         — one row per epoch, written as the run
//                         progresses so a crashed run still
//                         leaves its history behind
//   hyperparameters.txt — free-text summary of the run's
//                         configuration, written once at the end

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// One epoch's worth of training history.
#[derive(Debug, Clone, Serialize)]
pub struct EpochMetrics {
    pub epoch:      usize,
    pub train_loss: f64,
    pub train_acc:  f64,
    pub val_loss:   f64,
    pub val_acc:    f64,
    pub lr:         f64,
}

/// Appends epoch rows to `metrics.csv`; a new logger truncates
/// any previous run's history.
pub struct MetricsLogger {
    csv_path:     PathBuf,
    summary_path: PathBuf,
}

impl MetricsLogger {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("cannot create metrics directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        let mut writer = csv::Writer::from_path(&csv_path)
            .with_context(|| format!("cannot create '{}'", csv_path.display()))?;
        writer.write_record(["epoch", "train_loss", "train_acc", "val_loss", "val_acc", "lr"])?;
        writer.flush()?;

        Ok(Self { csv_path, summary_path: dir.join("hyperparameters.txt") })
    }

    pub fn log(&self, metrics: &EpochMetrics) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("cannot append to '{}'", self.csv_path.display()))?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(metrics)?;
        writer.flush()?;
        Ok(())
    }

    pub fn log_hyperparameters(&self, summary: &str) -> Result<()> {
        fs::write(&self.summary_path, summary)
            .with_context(|| format!("cannot write '{}'", self.summary_path.display()))?;
        Ok(())
    }
}
