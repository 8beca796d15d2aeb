// src/cli/mod.rs — CLI definition (clap derive)

pub mod evolve;
pub mod progress;
pub mod validate;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "evoforest",
    about = "Evolve seed instruction prompts into a larger, pruned dataset",
    version
)]
pub struct Cli {
    /// CSV of seed rows: Refusal, System, User, Assistant (by position)
    pub input: PathBuf,

    /// Where to write the evolved dataset after every epoch
    #[arg(default_value = "output.csv")]
    pub output: PathBuf,

    /// Check the input CSV format and exit without evolving
    #[arg(long)]
    pub validate: bool,

    /// Number of epochs to evolve the leaf nodes [default: 4]
    #[arg(short, long)]
    pub epochs: Option<u32>,

    /// Model identifier forwarded to the completion service [default: gpt-3.5-turbo]
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature [default: 0.8]
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Memoize completions so re-runs replay identical requests
    #[arg(long, visible_alias = "use-redis")]
    pub use_cache: bool,

    /// Response cache file (implies --use-cache)
    #[arg(long)]
    pub cache_file: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print every tree after the run
    #[arg(long)]
    pub show_trees: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose logging (same as RUST_LOG=debug)
    #[arg(short, long)]
    pub verbose: bool,
}
