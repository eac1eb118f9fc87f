//! Configuration validation

use super::schema::ModelTrainerConfig;

/// Validation error type
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid batch size: {0} (must be > 0)")]
    InvalidBatchSize(usize),

    #[error("Invalid epochs: {0} (must be > 0)")]
    InvalidEpochs(usize),

    #[error("Invalid image size: {0} (must be > 0)")]
    InvalidImageSize(u32),

    #[error("Invalid weight name: {0:?} (needs a non-empty name before the first '.')")]
    InvalidWeightName(String),

    #[error("Run name must not be empty")]
    EmptyRunName,

    #[error("Invalid run name: {0:?} (must be a single path component)")]
    InvalidRunName(String),

    #[error("Training interpreter must not be empty")]
    EmptyInterpreter,

    #[error("Training script must not be empty")]
    EmptyTrainScript,
}

/// Validate a model trainer configuration
///
/// Only checks values; paths are checked by the stage itself, in order, so
/// that a missing archive or template is reported by the step that needs it.
pub fn validate_config(config: &ModelTrainerConfig) -> Result<(), ValidationError> {
    if config.batch_size == 0 {
        return Err(ValidationError::InvalidBatchSize(config.batch_size));
    }

    if config.no_epochs == 0 {
        return Err(ValidationError::InvalidEpochs(config.no_epochs));
    }

    if config.img_size == 0 {
        return Err(ValidationError::InvalidImageSize(config.img_size));
    }

    let stem = config.model_stem();
    if stem.is_empty() || stem.contains(['/', '\\']) {
        return Err(ValidationError::InvalidWeightName(
            config.weight_name.clone(),
        ));
    }

    if config.run_name.is_empty() {
        return Err(ValidationError::EmptyRunName);
    }
    // The run tree is removed after collection, so the name must stay inside it.
    if config.run_name.contains(['/', '\\']) || config.run_name == ".." {
        return Err(ValidationError::InvalidRunName(config.run_name.clone()));
    }

    if config.interpreter.trim().is_empty() {
        return Err(ValidationError::EmptyInterpreter);
    }

    if config.train_script.trim().is_empty() {
        return Err(ValidationError::EmptyTrainScript);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = ModelTrainerConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_batch_size() {
        let mut config = ModelTrainerConfig::default();
        config.batch_size = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidBatchSize(0)));
    }

    #[test]
    fn test_invalid_epochs() {
        let mut config = ModelTrainerConfig::default();
        config.no_epochs = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEpochs(0)));
    }

    #[test]
    fn test_invalid_image_size() {
        let mut config = ModelTrainerConfig::default();
        config.img_size = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidImageSize(0)));
    }

    #[test]
    fn test_invalid_weight_name() {
        let mut config = ModelTrainerConfig::default();

        config.weight_name = String::new();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidWeightName(_)));

        config.weight_name = ".pt".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidWeightName(_)));

        config.weight_name = "../yolov5s.pt".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidWeightName(_)));
    }

    #[test]
    fn test_invalid_run_name() {
        let mut config = ModelTrainerConfig::default();

        config.run_name = String::new();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyRunName));

        config.run_name = "../outside".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRunName(_)));
    }

    #[test]
    fn test_empty_command_parts() {
        let mut config = ModelTrainerConfig::default();
        config.interpreter = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyInterpreter));

        let mut config = ModelTrainerConfig::default();
        config.train_script = String::new();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyTrainScript));
    }
}
