//! CLI argument parsing and validation
//!
//! # Usage
//!
//! ```bash
//! detect-trainer train model_trainer.yaml
//! detect-trainer train model_trainer.yaml --epochs 50 --batch-size 8
//! detect-trainer train model_trainer.yaml --dry-run
//! detect-trainer validate model_trainer.yaml --detailed
//! detect-trainer info model_trainer.yaml --format json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Model trainer stage of the object-detection pipeline
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "detect-trainer")]
#[command(version)]
#[command(
    about = "Unpack a dataset, patch the architecture config and run the external detector training"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Run the model trainer stage
    Train(TrainArgs),

    /// Validate a configuration file without training
    Validate(ValidateArgs),

    /// Display the resolved configuration
    Info(InfoArgs),
}

/// Arguments for the train command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct TrainArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Override the weights output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Override number of epochs
    #[arg(short, long)]
    pub epochs: Option<usize>,

    /// Override batch size
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Override base weights (e.g. yolov5m.pt)
    #[arg(short, long)]
    pub weights: Option<String>,

    /// Print the training command without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Output format for the resulting artifact (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show detailed validation report
    #[arg(short, long)]
    pub detailed: bool,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for info and train commands
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Unknown output format: {}. Valid formats: text, json, yaml",
                s
            )),
        }
    }
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a ModelTrainerConfig
pub fn apply_overrides(config: &mut super::ModelTrainerConfig, args: &TrainArgs) {
    if let Some(output_dir) = &args.output_dir {
        config.model_trainer_dir = output_dir.clone();
    }
    if let Some(epochs) = args.epochs {
        config.no_epochs = epochs;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(weights) = &args.weights {
        config.weight_name = weights.clone();
    }
}
