//! Model trainer stage
//!
//! Runs one training pass of the detection pipeline:
//!
//! 1. unpack the ingested dataset archive
//! 2. check `data.yaml` is present
//! 3. read the class count from it
//! 4. write `custom_<stem>.yaml` with the patched class count
//! 5. run the external training program
//! 6. copy `best.pt` to the output directory and the program root
//! 7. remove the run tree and `data.yaml`
//!
//! Every failure is returned as [`Error::Stage`] naming the step it came from.

mod architecture;
mod archive;
mod collect;
mod command;

pub use architecture::{read_class_count, write_custom_config, CLASS_COUNT_KEY};
pub use archive::unpack_archive;
pub use collect::{cleanup, collect_weights};
pub use command::{TrainCommand, STDERR_TAIL_LINES};

use crate::artifact::ModelTrainerArtifact;
use crate::config::ModelTrainerConfig;
use crate::error::{Error, Result, Stage, StageContext};
use tracing::info;

/// Orchestrates dataset staging, config patching, training and collection
#[derive(Debug, Clone)]
pub struct ModelTrainer {
    config: ModelTrainerConfig,
}

impl ModelTrainer {
    pub fn new(config: ModelTrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ModelTrainerConfig {
        &self.config
    }

    /// Command the train step would run, without touching the filesystem.
    pub fn plan(&self) -> Result<TrainCommand> {
        TrainCommand::from_config(&self.config, &self.config.data_yaml_path())
    }

    /// Run every step in order and return the trained weights artifact.
    pub fn initiate_model_trainer(&self) -> Result<ModelTrainerArtifact> {
        info!("Entered initiate_model_trainer method of ModelTrainer");
        let config = &self.config;
        let data_yaml = config.data_yaml_path();

        enter(Stage::Unpack);
        let files = unpack_archive(&config.archive_path, &config.extraction_dir)
            .in_stage(Stage::Unpack)?;
        info!(files, "Dataset unpacked");

        enter(Stage::Validate);
        if !data_yaml.is_file() {
            return Err(Error::Stage {
                stage: Stage::Validate,
                source: Box::new(Error::FileNotFound(data_yaml)),
            });
        }

        enter(Stage::ReadMetadata);
        let class_count = read_class_count(&data_yaml).in_stage(Stage::ReadMetadata)?;

        enter(Stage::PatchConfig);
        info!(stem = config.model_stem(), "Model config file name");
        write_custom_config(
            &config.template_config_path(),
            &config.custom_config_path(),
            class_count,
        )
        .in_stage(Stage::PatchConfig)?;

        enter(Stage::Train);
        TrainCommand::from_config(config, &data_yaml)
            .and_then(|command| command.run())
            .in_stage(Stage::Train)?;

        enter(Stage::Collect);
        collect_weights(config).in_stage(Stage::Collect)?;

        enter(Stage::Cleanup);
        cleanup(config).in_stage(Stage::Cleanup)?;

        let artifact = ModelTrainerArtifact::new(config.program_weights_path());
        info!("Exited initiate_model_trainer method of ModelTrainer");
        info!(%artifact, "Model trainer artifact");
        Ok(artifact)
    }
}

fn enter(stage: Stage) {
    info!(%stage, "Model trainer stage");
}
