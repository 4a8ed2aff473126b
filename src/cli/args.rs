//! Command line argument parsing for the Intently CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Intently - train and talk to an intent-classification chatbot
#[derive(Parser, Debug, Clone)]
#[command(name = "intently")]
#[command(about = "Train and run a bag-of-words intent classification chatbot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct IntentlyArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl IntentlyArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n + 1,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model from an intents file
    Train(TrainArgs),

    /// Classify a single message
    Predict(PredictArgs),

    /// Interactive chat on standard input
    Chat(ChatArgs),

    /// Show what a trained model contains
    Inspect(InspectArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Intents file (JSON)
    #[arg(short, long, value_name = "INTENTS_FILE")]
    pub intents: PathBuf,

    /// Directory receiving the model artifact and training report
    #[arg(short, long, value_name = "OUTPUT_DIR")]
    pub output: PathBuf,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Random seed (overrides the config file)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of epochs (overrides the config file)
    #[arg(long)]
    pub epochs: Option<usize>,
}

/// Arguments for one-shot prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Model artifact directory
    #[arg(short, long, value_name = "MODEL_DIR")]
    pub model: PathBuf,

    /// Intents file (JSON)
    #[arg(short, long, value_name = "INTENTS_FILE")]
    pub intents: PathBuf,

    /// Minimum probability (exclusive)
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Show the full distribution instead of the thresholded ranking
    #[arg(long)]
    pub all: bool,

    /// Message to classify
    #[arg(value_name = "TEXT")]
    pub text: String,
}

/// Arguments for the interactive chat
#[derive(Parser, Debug, Clone)]
pub struct ChatArgs {
    /// Model artifact directory
    #[arg(short, long, value_name = "MODEL_DIR")]
    pub model: PathBuf,

    /// Intents file (JSON)
    #[arg(short, long, value_name = "INTENTS_FILE")]
    pub intents: PathBuf,

    /// Minimum probability (exclusive)
    #[arg(short, long)]
    pub threshold: Option<f32>,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Random seed for response selection
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for model inspection
#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    /// Model artifact directory
    #[arg(short, long, value_name = "MODEL_DIR")]
    pub model: PathBuf,

    /// List every vocabulary token
    #[arg(long)]
    pub vocabulary: bool,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
