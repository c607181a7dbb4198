use crate::workflow::error::ParseError;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort assembly of the whole batch
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("workflow directory does not exist [{}]; cd to the repository root or set workflows_dir", .0.display())]
    WorkflowsDirNotFound(PathBuf),

    #[error("failed to find workflow [{0}]")]
    NoMatchingWorkflow(String),

    #[error("failed to read workflow directory {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Failure to load a single workflow source. Never fatal for the batch.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings file {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type AssemblyResult<T> = Result<T, AssemblyError>;
