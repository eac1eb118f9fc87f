//! Single-command training from YAML configuration

use super::schema::ModelTrainerConfig;
use super::validate::validate_config;
use crate::artifact::ModelTrainerArtifact;
use crate::error::{Error, Result};
use crate::trainer::ModelTrainer;
use std::fs;
use std::path::Path;

/// Run the model trainer stage from a YAML configuration file
///
/// Loads and validates the config, then runs every step of
/// [`ModelTrainer::initiate_model_trainer`].
///
/// # Example
///
/// ```no_run
/// use detect_trainer::config::train_from_yaml;
///
/// let artifact = train_from_yaml("model_trainer.yaml")?;
/// println!("{}", artifact.trained_model_file_path.display());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn train_from_yaml<P: AsRef<Path>>(config_path: P) -> Result<ModelTrainerArtifact> {
    let config = load_config(config_path)?;
    ModelTrainer::new(config).initiate_model_trainer()
}

/// Load model trainer configuration from a YAML file (without training)
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<ModelTrainerConfig> {
    let yaml_content = fs::read_to_string(config_path.as_ref()).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {}",
            config_path.as_ref().display(),
            e
        ))
    })?;

    parse_config(&yaml_content)
}

/// Parse and validate configuration from YAML text
pub fn parse_config(yaml_content: &str) -> Result<ModelTrainerConfig> {
    // An empty file is an all-defaults configuration.
    let config: ModelTrainerConfig = if yaml_content.trim().is_empty() {
        ModelTrainerConfig::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {}", e)))?
    };

    validate_config(&config).map_err(|e| Error::ConfigError(format!("Invalid config: {}", e)))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_config() {
        let yaml = r#"
weight_name: yolov5s.pt
batch_size: 8
no_epochs: 5
model_trainer_dir: artifacts/model_trainer
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.no_epochs, 5);
        assert_eq!(config.run_name, "yolov5s_results");
    }

    #[test]
    fn test_load_invalid_config() {
        let yaml = "batch_size: 0\n";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigError(ref msg) if msg.contains("batch size")));
    }

    #[test]
    fn test_load_malformed_yaml() {
        let yaml = "this is not valid yaml: [}";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config("/nonexistent/model_trainer.yaml").unwrap_err();
        assert!(matches!(err, Error::ConfigError(ref msg) if msg.contains("Failed to read")));
    }

    #[test]
    fn test_empty_file_is_default() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config, ModelTrainerConfig::default());
    }
}
