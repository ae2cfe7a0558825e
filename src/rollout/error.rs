// ABOUTME: Error types for rollout stages.
// ABOUTME: Backup and restore failures are fatal; the rest trigger a rollback.

use crate::publish::PublishError;
use crate::server::BindError;
use crate::snapshot::SnapshotError;

/// Errors that can occur during rollout state transitions.
#[derive(Debug, thiserror::Error)]
pub enum RolloutError {
    /// Capturing the current content failed. Nothing to roll back to.
    #[error("backup failed: {0}")]
    BackupFailed(#[source] SnapshotError),

    /// Copying new content failed part-way.
    #[error("deployment failed: {0}")]
    PublishFailed(#[from] PublishError),

    /// The server could not start.
    #[error("server failed to start: {0}")]
    Bind(#[from] BindError),

    /// The health check exhausted its attempts.
    #[error("health check failed after {attempts} attempt(s) against {url}")]
    VerificationFailed { url: String, attempts: u32 },

    /// Restoring the snapshot failed; the content root may be incomplete.
    #[error("rollback failed: {0}")]
    RestoreFailed(#[source] SnapshotError),

    /// No snapshot exists to restore from.
    #[error("no snapshot available to roll back to")]
    NoSnapshot,

    /// The requested snapshot does not exist.
    #[error("snapshot not found: {0}")]
    SnapshotNotFound(String),

    /// The backups directory could not be read.
    #[error("failed to read snapshots: {0}")]
    SnapshotList(#[source] SnapshotError),
}

impl RolloutError {
    /// Errors after which automated recovery cannot be trusted.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RolloutError::BackupFailed(_) | RolloutError::RestoreFailed(_)
        )
    }
}
