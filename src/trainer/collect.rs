//! Weights collection and run cleanup

use crate::config::ModelTrainerConfig;
use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

/// Copy the run's best weights into the output directory and the training
/// program's root. Fails if the run produced no weights.
pub fn collect_weights(config: &ModelTrainerConfig) -> Result<()> {
    let source = config.best_weights_source();
    if !source.is_file() {
        return Err(Error::FileNotFound(source));
    }

    fs::create_dir_all(&config.model_trainer_dir)?;

    for dest in [config.output_weights_path(), config.program_weights_path()] {
        let bytes = fs::copy(&source, &dest)?;
        info!(from = %source.display(), to = %dest.display(), bytes, "Copied best weights");
    }
    Ok(())
}

/// Remove the run-output tree and the consumed dataset metadata.
///
/// The run tree is removed best-effort: failures are logged and swallowed.
/// Failing to remove `data.yaml` is an error.
pub fn cleanup(config: &ModelTrainerConfig) -> Result<()> {
    let runs = config.runs_dir();
    match fs::remove_dir_all(&runs) {
        Ok(()) => info!(path = %runs.display(), "Removed training run outputs"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %runs.display(), error = %e, "Could not remove training run outputs"),
    }

    remove_if_exists(&config.data_yaml_path())?;
    Ok(())
}

fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
