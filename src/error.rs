use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for the merge pipeline
pub type Result<T> = std::result::Result<T, MergeError>;

/// Which kind of entry two input files both declared
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    #[error("path")]
    Path,
    #[error("security scheme")]
    SecurityScheme,
}

/// Error types for the merge pipeline.
///
/// Only `Parse` is recovered locally (the offending file is skipped); every other
/// variant aborts the run.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("spec directory {} doesn't contain any specification", .root.display())]
    NoSpecifications { root: PathBuf },

    #[error("failed to list files in spec root directory {}: {source}", .root.display())]
    Discovery {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read spec {}: {message}", .file.display())]
    Parse { file: PathBuf, message: String },

    #[error("{kind} `{key}` is declared by both {previous} and {current}")]
    Collision {
        kind: CollisionKind,
        key: String,
        previous: String,
        current: String,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("failed to write merged spec to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MergeError {
    pub(crate) fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        MergeError::Parse {
            file: file.into(),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for MergeError {
    fn from(err: serde_json::Error) -> Self {
        MergeError::Serialization(format!("JSON serialization error: {}", err))
    }
}

impl From<serde_yaml::Error> for MergeError {
    fn from(err: serde_yaml::Error) -> Self {
        MergeError::Serialization(format!("YAML serialization error: {}", err))
    }
}
