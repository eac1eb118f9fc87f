//! detect-trainer CLI
//!
//! Runs the model trainer stage of the detection pipeline.
//!
//! # Usage
//!
//! ```bash
//! # Run the stage
//! detect-trainer train model_trainer.yaml
//!
//! # Run with overrides
//! detect-trainer train model_trainer.yaml --epochs 100 --weights yolov5m.pt
//!
//! # Show the training command only
//! detect-trainer train model_trainer.yaml --dry-run
//!
//! # Validate config
//! detect-trainer validate model_trainer.yaml --detailed
//!
//! # Show config info
//! detect-trainer info model_trainer.yaml --format yaml
//! ```

use clap::Parser;
use detect_trainer::config::{
    apply_overrides, load_config, validate_config, Cli, Command, InfoArgs, OutputFormat,
    TrainArgs, ValidateArgs,
};
use detect_trainer::{ModelTrainer, ModelTrainerArtifact};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Configure output based on verbose/quiet flags
    let log_level = if cli.quiet {
        LogLevel::Quiet
    } else if cli.verbose {
        LogLevel::Verbose
    } else {
        LogLevel::Normal
    };
    init_tracing(log_level);

    let result = match cli.command {
        Command::Train(args) => run_train(args, log_level),
        Command::Validate(args) => run_validate(args, log_level),
        Command::Info(args) => run_info(args, log_level),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum LogLevel {
    Quiet,
    Normal,
    Verbose,
}

fn init_tracing(level: LogLevel) {
    let default_directive = match level {
        LogLevel::Quiet => "error",
        LogLevel::Normal => "info",
        LogLevel::Verbose => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn log(level: LogLevel, required: LogLevel, msg: &str) {
    if level != LogLevel::Quiet && (level == required || required == LogLevel::Normal) {
        println!("{msg}");
    }
}

fn run_train(args: TrainArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("detect-trainer: training from {}", args.config.display()),
    );

    let mut config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    // Apply command-line overrides, then re-check the merged values
    apply_overrides(&mut config, &args);
    validate_config(&config).map_err(|e| format!("Invalid override: {e}"))?;

    let trainer = ModelTrainer::new(config);

    if args.dry_run {
        let command = trainer
            .plan()
            .map_err(|e| format!("Cannot build training command: {e}"))?;
        log(level, LogLevel::Normal, "Dry run - config validated successfully");
        log(
            level,
            LogLevel::Verbose,
            &format!("  Archive: {}", trainer.config().archive_path.display()),
        );
        log(
            level,
            LogLevel::Verbose,
            &format!(
                "  Custom config: {}",
                trainer.config().custom_config_path().display()
            ),
        );
        println!("{command}");
        return Ok(());
    }

    let artifact = trainer
        .initiate_model_trainer()
        .map_err(|e| format!("Training error: {e}"))?;

    log(level, LogLevel::Normal, "Training complete!");
    print_artifact(&artifact, args.format)
}

fn print_artifact(artifact: &ModelTrainerArtifact, format: OutputFormat) -> Result<(), String> {
    match format {
        OutputFormat::Text => println!("{}", artifact.trained_model_file_path.display()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(artifact)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(artifact)
                .map_err(|e| format!("YAML serialization error: {e}"))?;
            print!("{yaml}");
        }
    }
    Ok(())
}

fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.config.display()),
    );

    let config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed {
        println!();
        println!("Configuration Summary:");
        println!("  Base weights: {}", config.weight_name);
        println!("  Batch size: {}", config.batch_size);
        println!("  Epochs: {}", config.no_epochs);
        println!("  Image size: {}", config.img_size);
        println!();
        println!("  Dataset archive: {}", config.archive_path.display());
        println!("  Extraction dir: {}", config.extraction_dir.display());
        println!("  Metadata: {}", config.data_yaml_path().display());
        println!();
        println!("  Program dir: {}", config.program_dir.display());
        println!("  Template: {}", config.template_config_path().display());
        println!("  Custom config: {}", config.custom_config_path().display());
        println!("  Run name: {}", config.run_name);
        println!();
        println!("  Output dir: {}", config.model_trainer_dir.display());
        println!("  Artifact: {}", config.program_weights_path().display());
    }

    Ok(())
}

fn run_info(args: InfoArgs, level: LogLevel) -> Result<(), String> {
    let config = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    match args.format {
        OutputFormat::Text => {
            log(level, LogLevel::Normal, "Configuration Info:");
            println!();
            println!("Weights: {} (config {})", config.weight_name, config.model_stem());
            println!("Epochs: {}", config.no_epochs);
            println!("Batch size: {}", config.batch_size);
            println!("Image size: {}", config.img_size);
            println!("Program: {}", config.program_dir.display());
            if config.cache {
                println!("Image cache: enabled");
            }
            let command = ModelTrainer::new(config)
                .plan()
                .map_err(|e| format!("Cannot build training command: {e}"))?;
            println!("Command: {command}");
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&config)
                .map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| format!("YAML serialization error: {e}"))?;
            println!("{yaml}");
        }
    }

    Ok(())
}
