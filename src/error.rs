// ABOUTME: Application-wide error types for webroll.
// ABOUTME: Uses thiserror; stage-specific errors live next to their stages.

use std::path::PathBuf;
use thiserror::Error;

use crate::links::LinkError;
use crate::rollout::RolloutError;
use crate::snapshot::SnapshotError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("pre-flight check failed: {0}")]
    Preflight(String),

    #[error(transparent)]
    Rollout(#[from] RolloutError),

    #[error("deployment rolled back: {0}")]
    RolledBack(#[source] RolloutError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Links(#[from] LinkError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
