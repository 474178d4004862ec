// ============================================================
// Layer 1 — CLI Commands
// ============================================================
// clap derive surface. The argument enums mirror the domain
// selectors one-to-one so that an unknown dataset or model name
// fails at parse time with clap's own error message, before any
// file is touched. `From` impls convert parsed arguments into
// the immutable application configs.

use clap::{Args, Subcommand, ValueEnum};

use crate::application::eval_use_case::EvalConfig;
use crate::application::train_use_case::TrainConfig;
use crate::domain::selectors::{DatasetSelector, DeviceSelector, ModelKind};
use crate::domain::traits::Split;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a document classifier and save its checkpoint
    Train(TrainArgs),
    /// Score a trained checkpoint on the held-out test split
    Evaluate(EvalArgs),
    /// Generate the synthetic keyword corpus and its embeddings
    Synth(SynthArgs),
    /// Report corpus length percentiles for picking padding bounds
    Stats(StatsArgs),
}

// ─── Argument enums ──────────────────────────────────────────────────────────

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DatasetArg {
    Yelp,
    Yahoo,
    Amazon,
    Synthetic,
}

impl From<DatasetArg> for DatasetSelector {
    fn from(arg: DatasetArg) -> Self {
        match arg {
            DatasetArg::Yelp => DatasetSelector::Yelp,
            DatasetArg::Yahoo => DatasetSelector::Yahoo,
            DatasetArg::Amazon => DatasetSelector::Amazon,
            DatasetArg::Synthetic => DatasetSelector::Synthetic,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ModelArg {
    /// Flattened attention network: one word-level encoder
    Fan,
    /// Hierarchical attention network: word + sentence encoders
    Han,
}

impl From<ModelArg> for ModelKind {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Fan => ModelKind::Fan,
            ModelArg::Han => ModelKind::Han,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DeviceArg {
    Cpu,
}

impl From<DeviceArg> for DeviceSelector {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Cpu => DeviceSelector::Cpu,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SplitArg {
    Train,
    Val,
    Test,
}

impl SplitArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitArg::Train => "train",
            SplitArg::Val => "val",
            SplitArg::Test => "test",
        }
    }
}

impl From<SplitArg> for Split {
    fn from(arg: SplitArg) -> Self {
        match arg {
            SplitArg::Train => Split::Train,
            SplitArg::Val => Split::Validation,
            SplitArg::Test => Split::Test,
        }
    }
}

// ─── Train ───────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Corpus to train on
    #[arg(value_enum)]
    pub dataset: DatasetArg,

    /// Model architecture
    #[arg(value_enum)]
    pub model: ModelArg,

    /// Directory holding the split CSVs and the embedding file
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Directory for checkpoints, run records, and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Upper bound on epochs; early stopping usually ends sooner
    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    /// Initial SGD learning rate
    #[arg(long, default_value_t = 0.01)]
    pub lr: f64,

    #[arg(long, default_value_t = 0.9)]
    pub momentum: f64,

    /// Consecutive non-improving epochs before early stopping
    #[arg(long, default_value_t = 5)]
    pub patience: usize,

    /// Flat padding bound (fan only)
    #[arg(long, default_value_t = 100)]
    pub words_per_doc: usize,

    /// Hierarchical padding bounds (han only)
    #[arg(long, default_value_t = 15)]
    pub sent_per_doc: usize,

    #[arg(long, default_value_t = 25)]
    pub words_per_sent: usize,

    /// GRU hidden size per direction, word level
    #[arg(long, default_value_t = 50)]
    pub word_hidden_size: usize,

    /// GRU hidden size per direction, sentence level (han only)
    #[arg(long, default_value_t = 50)]
    pub sent_hidden_size: usize,

    #[arg(long, value_enum, default_value = "cpu")]
    pub device: DeviceArg,

    /// Rolling window length for the reported training statistics
    #[arg(long, default_value_t = 50)]
    pub window: usize,

    /// Print per-batch progress on one updating line
    #[arg(long)]
    pub progress: bool,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl From<TrainArgs> for TrainConfig {
    fn from(args: TrainArgs) -> Self {
        TrainConfig {
            dataset: args.dataset.into(),
            model: args.model.into(),
            data_dir: args.data_dir,
            checkpoint_dir: args.checkpoint_dir,
            batch_size: args.batch_size,
            epochs: args.epochs,
            lr: args.lr,
            momentum: args.momentum,
            patience: args.patience,
            words_per_doc: args.words_per_doc,
            sent_per_doc: args.sent_per_doc,
            words_per_sent: args.words_per_sent,
            word_hidden_size: args.word_hidden_size,
            sent_hidden_size: args.sent_hidden_size,
            device: args.device.into(),
            window: args.window,
            progress: args.progress,
            seed: args.seed,
        }
    }
}

// ─── Evaluate ────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Corpus the checkpoint was trained on
    #[arg(value_enum)]
    pub dataset: DatasetArg,

    /// Architecture the checkpoint was trained with
    #[arg(value_enum)]
    pub model: ModelArg,

    #[arg(long, default_value = "data")]
    pub data_dir: String,

    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Padding bounds: must match the training run so the
    /// checkpoint key resolves
    #[arg(long, default_value_t = 100)]
    pub words_per_doc: usize,

    #[arg(long, default_value_t = 15)]
    pub sent_per_doc: usize,

    #[arg(long, default_value_t = 25)]
    pub words_per_sent: usize,

    #[arg(long, value_enum, default_value = "cpu")]
    pub device: DeviceArg,
}

impl From<EvalArgs> for EvalConfig {
    fn from(args: EvalArgs) -> Self {
        EvalConfig {
            dataset: args.dataset.into(),
            model: args.model.into(),
            data_dir: args.data_dir,
            checkpoint_dir: args.checkpoint_dir,
            batch_size: args.batch_size,
            words_per_doc: args.words_per_doc,
            sent_per_doc: args.sent_per_doc,
            words_per_sent: args.words_per_sent,
            device: args.device.into(),
        }
    }
}

// ─── Synth ───────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct SynthArgs {
    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Total documents across all classes and splits
    #[arg(long, default_value_t = 10000)]
    pub num_samples: usize,

    /// Dimensionality of the generated stand-in embeddings
    #[arg(long, default_value_t = 100)]
    pub embedding_dim: usize,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

// ─── Stats ───────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Corpus to measure
    #[arg(value_enum)]
    pub dataset: DatasetArg,

    #[arg(long, default_value = "data")]
    pub data_dir: String,

    /// Which split to measure
    #[arg(long, value_enum, default_value = "train")]
    pub split: SplitArg,
}
