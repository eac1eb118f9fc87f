//! Error types for the model trainer stage

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Steps of a model trainer run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unpack,
    Validate,
    ReadMetadata,
    PatchConfig,
    Train,
    Collect,
    Cleanup,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Unpack => "unpack",
            Stage::Validate => "validate",
            Stage::ReadMetadata => "read-metadata",
            Stage::PatchConfig => "patch-config",
            Stage::Train => "train",
            Stage::Collect => "collect",
            Stage::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Archive entry {0:?} escapes the extraction directory")]
    UnsafeEntry(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{} is not a YAML mapping", .0.display())]
    NotAMapping(PathBuf),

    #[error("Invalid dataset metadata: {0}")]
    Metadata(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Training command exited with {}: {stderr}", exit_label(.code))]
    TrainingFailed { code: Option<i32>, stderr: String },

    #[error("Model trainer failed during {stage}: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl Error {
    /// Stage the error was raised in, if it has been wrapped.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Innermost error beneath any stage wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Stage { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attach the running stage to a failure.
pub trait StageContext<T> {
    fn in_stage(self, stage: Stage) -> Result<T>;
}

impl<T, E: Into<Error>> StageContext<T> for std::result::Result<T, E> {
    fn in_stage(self, stage: Stage) -> Result<T> {
        self.map_err(|e| match e.into() {
            // Keep the first stage that claimed the error.
            wrapped @ Error::Stage { .. } => wrapped,
            inner => Error::Stage {
                stage,
                source: Box::new(inner),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_stage_wraps_and_exposes_root() {
        let res: Result<()> = Err(Error::FileNotFound(PathBuf::from("data.yaml")));
        let err = res.in_stage(Stage::Validate).unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Validate));
        assert!(matches!(err.root(), Error::FileNotFound(_)));
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "Model trainer failed during validate: File not found: data.yaml"
        );
    }

    #[test]
    fn test_stage_is_not_rewrapped() {
        let res: Result<()> = Err(Error::Metadata("nc".into()));
        let err = res
            .in_stage(Stage::ReadMetadata)
            .in_stage(Stage::PatchConfig)
            .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::ReadMetadata));
    }

    #[test]
    fn test_io_converts_through_stage() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = res.in_stage(Stage::Collect).unwrap_err();
        assert!(matches!(err.root(), Error::Io(_)));
    }

    #[test]
    fn test_yaml_cause_survives_stage_wrapper() {
        let parse: std::result::Result<serde_yaml::Value, _> = serde_yaml::from_str("a: [}");
        let err = parse.in_stage(Stage::ReadMetadata).unwrap_err();

        let root = err.root();
        assert!(matches!(root, Error::Yaml(_)));
        let cause = root.source().expect("serde_yaml error kept as source");
        assert!(cause.downcast_ref::<serde_yaml::Error>().is_some());
    }

    #[test]
    fn test_zip_cause_survives_stage_wrapper() {
        let open = zip::ZipArchive::new(std::io::Cursor::new(b"not a zip".to_vec())).map(|_| ());
        let err = open.in_stage(Stage::Unpack).unwrap_err();

        let root = err.root();
        assert!(matches!(root, Error::Archive(_)));
        let cause = root.source().expect("zip error kept as source");
        assert!(cause.downcast_ref::<zip::result::ZipError>().is_some());
    }

    #[test]
    fn test_training_failed_message() {
        let err = Error::TrainingFailed {
            code: Some(2),
            stderr: "CUDA out of memory".into(),
        };
        assert_eq!(
            err.to_string(),
            "Training command exited with status 2: CUDA out of memory"
        );

        let err = Error::TrainingFailed {
            code: None,
            stderr: String::new(),
        };
        assert!(err.to_string().contains("terminated by signal"));
    }
}
