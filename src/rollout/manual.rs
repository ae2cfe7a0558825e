// ABOUTME: Manual rollback: put a stored snapshot back into the content root.
// ABOUTME: Does not start a server or touch the source tree.

use crate::snapshot::{Snapshot, SnapshotError};

use super::context::RolloutContext;
use super::error::RolloutError;

/// Restore the snapshot named `name`, or the newest one when `name` is `None`.
///
/// # Errors
///
/// Returns error if:
/// - The backups directory cannot be read
/// - No snapshot exists, or none matches `name`
/// - The restore itself fails
pub fn manual_rollback(
    ctx: &RolloutContext,
    name: Option<&str>,
) -> Result<Snapshot, RolloutError> {
    let store = ctx.store();

    let snapshot = match name {
        Some(name) => store.find(name).map_err(|e| match e {
            SnapshotError::NotFound(name) => RolloutError::SnapshotNotFound(name),
            other => RolloutError::SnapshotList(other),
        })?,
        None => store
            .latest()
            .map_err(RolloutError::SnapshotList)?
            .ok_or(RolloutError::NoSnapshot)?,
    };

    tracing::info!(
        snapshot = %snapshot.name(),
        root = %ctx.content_root().display(),
        "restoring snapshot"
    );
    store
        .restore(&snapshot, ctx.content_root())
        .map_err(RolloutError::RestoreFailed)?;

    Ok(snapshot)
}
