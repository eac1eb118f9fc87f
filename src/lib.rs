//! # detect-trainer: Model trainer stage for object detection
//!
//! Stages a dataset archive, patches the architecture config with the
//! dataset's class count, runs an external detector training program and
//! collects the best weights.
//!
//! ## Architecture
//!
//! - **config**: Declarative YAML configuration and CLI
//! - **trainer**: The stage itself ([`ModelTrainer`])
//! - **artifact**: Output handed to the next pipeline stage
//! - **error**: Error types and stage context
//!
//! ## Example
//!
//! ```no_run
//! use detect_trainer::{ModelTrainer, ModelTrainerConfig};
//!
//! let config = ModelTrainerConfig {
//!     no_epochs: 50,
//!     ..ModelTrainerConfig::default()
//! };
//! let artifact = ModelTrainer::new(config).initiate_model_trainer()?;
//! println!("{artifact}");
//! # Ok::<(), detect_trainer::Error>(())
//! ```

pub mod artifact;
pub mod config;
pub mod trainer;

pub mod error;

// Re-export commonly used types
pub use artifact::ModelTrainerArtifact;
pub use config::ModelTrainerConfig;
pub use error::{Error, Result, Stage};
pub use trainer::{ModelTrainer, TrainCommand};
