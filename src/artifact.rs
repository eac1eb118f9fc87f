//! Artifact handed to the next pipeline stage

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Result of a successful model trainer run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTrainerArtifact {
    /// Trained weights file
    pub trained_model_file_path: PathBuf,
}

impl ModelTrainerArtifact {
    pub fn new(trained_model_file_path: impl Into<PathBuf>) -> Self {
        Self {
            trained_model_file_path: trained_model_file_path.into(),
        }
    }
}

impl fmt::Display for ModelTrainerArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ModelTrainerArtifact(trained_model_file_path={})",
            self.trained_model_file_path.display()
        )
    }
}
