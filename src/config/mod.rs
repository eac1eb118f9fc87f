//! Declarative YAML configuration
//!
//! The model trainer stage is driven by a single YAML document. Every key is
//! optional; omitted keys fall back to the YOLOv5 layout.
//!
//! # Example
//!
//! ```yaml
//! weight_name: yolov5s.pt
//! batch_size: 16
//! no_epochs: 100
//! model_trainer_dir: artifacts/model_trainer
//! archive_path: artifacts/data_ingestion/data.zip
//! extraction_dir: .
//! program_dir: yolov5
//! ```

mod cli;
mod schema;
mod train;
mod validate;



pub use cli::{
    apply_overrides, parse_args, Cli, Command, InfoArgs, OutputFormat, TrainArgs, ValidateArgs,
};
pub use schema::{ModelTrainerConfig, BEST_WEIGHTS};
pub use train::{load_config, parse_config, train_from_yaml};
pub use validate::{validate_config, ValidationError};
