//! YAML schema for the model trainer stage configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Model trainer stage configuration
///
/// Every field has a default, so an empty document is a valid configuration
/// that trains `yolov5s.pt` for one epoch from `./yolov5`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelTrainerConfig {
    /// Base weights identifier (e.g. `yolov5s.pt`)
    pub weight_name: String,

    /// Batch size passed to the training program
    pub batch_size: usize,

    /// Number of training epochs
    pub no_epochs: usize,

    /// Output directory receiving a copy of the best weights
    pub model_trainer_dir: PathBuf,

    /// Dataset archive produced by ingestion
    pub archive_path: PathBuf,

    /// Directory the archive is extracted into; holds `data.yaml` afterwards
    pub extraction_dir: PathBuf,

    /// Working directory of the external training program
    pub program_dir: PathBuf,

    /// Interpreter used to launch the training script
    pub interpreter: String,

    /// Training script, relative to `program_dir`
    pub train_script: String,

    /// Architecture template directory, relative to `program_dir`
    pub models_subdir: PathBuf,

    /// Training image size
    pub img_size: u32,

    /// Run name; outputs land in `runs/train/<run_name>`
    pub run_name: String,

    /// Cache images during training
    pub cache: bool,
}

impl Default for ModelTrainerConfig {
    fn default() -> Self {
        Self {
            weight_name: "yolov5s.pt".to_string(),
            batch_size: 16,
            no_epochs: 1,
            model_trainer_dir: PathBuf::from("artifacts/model_trainer"),
            archive_path: PathBuf::from("artifacts/data_ingestion/data.zip"),
            extraction_dir: PathBuf::from("."),
            program_dir: PathBuf::from("yolov5"),
            interpreter: "python".to_string(),
            train_script: "train.py".to_string(),
            models_subdir: PathBuf::from("models"),
            img_size: 640,
            run_name: "yolov5s_results".to_string(),
            cache: true,
        }
    }
}

impl ModelTrainerConfig {
    /// Architecture name derived from the weights identifier: the text
    /// before the first `.` (`yolov5s.pt` -> `yolov5s`).
    pub fn model_stem(&self) -> &str {
        self.weight_name
            .split('.')
            .next()
            .unwrap_or(self.weight_name.as_str())
    }

    /// Dataset metadata file inside the extraction root
    pub fn data_yaml_path(&self) -> PathBuf {
        self.extraction_dir.join("data.yaml")
    }

    /// Architecture template directory
    pub fn models_dir(&self) -> PathBuf {
        self.program_dir.join(&self.models_subdir)
    }

    /// Base architecture template, `<stem>.yaml`
    pub fn template_config_path(&self) -> PathBuf {
        self.models_dir().join(format!("{}.yaml", self.model_stem()))
    }

    /// Patched architecture file name, `custom_<stem>.yaml`
    pub fn custom_config_name(&self) -> String {
        format!("custom_{}.yaml", self.model_stem())
    }

    /// Patched architecture file, written beside the template
    pub fn custom_config_path(&self) -> PathBuf {
        self.models_dir().join(self.custom_config_name())
    }

    /// Run-output tree of the training program
    pub fn runs_dir(&self) -> PathBuf {
        self.program_dir.join("runs")
    }

    /// Best weights produced by the training run
    pub fn best_weights_source(&self) -> PathBuf {
        self.runs_dir()
            .join("train")
            .join(&self.run_name)
            .join("weights")
            .join(BEST_WEIGHTS)
    }

    /// Copy of the best weights in the configured output directory
    pub fn output_weights_path(&self) -> PathBuf {
        self.model_trainer_dir.join(BEST_WEIGHTS)
    }

    /// Copy of the best weights at the training program's root
    pub fn program_weights_path(&self) -> PathBuf {
        self.program_dir.join(BEST_WEIGHTS)
    }
}

/// File name of the best checkpoint written by the training program
pub const BEST_WEIGHTS: &str = "best.pt";
