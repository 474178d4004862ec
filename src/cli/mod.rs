// ============================================================
// Layer 1 — CLI Entry
// ============================================================
// Parses arguments and dispatches to the use cases. The two
// small read-only commands (synth, stats) have no use-case
// object of their own; they are wired directly here.

use anyhow::Result;
use clap::Parser;

use crate::application::eval_use_case::EvalUseCase;
use crate::application::train_use_case::TrainUseCase;
use crate::data::corpus::CsvCorpus;
use crate::data::{stats, synthetic};
use crate::domain::selectors::DatasetSelector;
use crate::domain::traits::CorpusSource;

pub mod commands;

use commands::{Commands, StatsArgs};

/// Attention-based document classification: train and evaluate
/// flat (FAN) and hierarchical (HAN) attention networks.
#[derive(Parser)]
#[command(name = "doc-attn", version, about)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => TrainUseCase::new(args.into()).execute(),
            Commands::Evaluate(args) => EvalUseCase::new(args.into()).execute(),
            Commands::Synth(args) => {
                synthetic::generate(&args.data_dir, args.num_samples, args.embedding_dim, args.seed)
            }
            Commands::Stats(args) => run_stats(args),
        }
    }
}

fn run_stats(args: StatsArgs) -> Result<()> {
    let dataset: DatasetSelector = args.dataset.into();
    let source = CsvCorpus::new(dataset.paths(&args.data_dir));
    let docs = source.load_split(args.split.into())?;

    println!(
        "{} {} split: {} documents",
        dataset.as_str(),
        args.split.as_str(),
        docs.len()
    );
    print!("{}", stats::corpus_stats(&docs).report());
    Ok(())
}
