// ABOUTME: Drives a rollout from backup to commit, rolling back on any stage failure.
// ABOUTME: Only backup and restore failures escape as errors.

use crate::server::ServerHandle;

use super::context::RolloutContext;
use super::error::RolloutError;
use super::transitions::Restoration;
use super::Rollout;

/// How a rollout ended when no fatal error occurred.
#[derive(Debug)]
pub enum RolloutResult {
    /// New content is live and verified.
    Committed(ServerHandle),
    /// A stage failed and the previous content was put back.
    RolledBack(RolloutError),
}

impl RolloutResult {
    pub fn is_committed(&self) -> bool {
        matches!(self, RolloutResult::Committed(_))
    }
}

/// Run Backup, Publish, Serve and Verify in order.
///
/// # Errors
///
/// Returns `RolloutError::BackupFailed` when the initial capture fails and
/// `RolloutError::RestoreFailed` when a rollback cannot restore the snapshot.
/// Every other failure is reported as [`RolloutResult::RolledBack`].
pub async fn run_rollout(ctx: &RolloutContext) -> Result<RolloutResult, RolloutError> {
    tracing::info!("starting deployment");

    let backed_up = Rollout::new(ctx).backup().inspect_err(|e| {
        tracing::error!(error = %e, "backup failed, aborting deployment");
    })?;

    let published = match backed_up.publish() {
        Ok(published) => published,
        Err((rollout, e)) => {
            stage_failed("publish", &e);
            rolled_back(rollout.rollback())?;
            return Ok(RolloutResult::RolledBack(e));
        }
    };
    tracing::info!(count = published.published(), "content published");

    let serving = match published.serve().await {
        Ok(serving) => serving,
        Err((rollout, e)) => {
            stage_failed("serve", &e);
            rolled_back(rollout.rollback())?;
            return Ok(RolloutResult::RolledBack(e));
        }
    };

    let verified = match serving.verify().await {
        Ok(verified) => verified,
        Err((rollout, e)) => {
            stage_failed("verify", &e);
            rolled_back(rollout.rollback().await)?;
            return Ok(RolloutResult::RolledBack(e));
        }
    };

    Ok(RolloutResult::Committed(verified.commit()))
}

fn stage_failed(stage: &str, error: &RolloutError) {
    tracing::error!(stage, error = %error, "deployment stage failed, rolling back");
}

fn rolled_back(outcome: Result<Restoration, RolloutError>) -> Result<(), RolloutError> {
    match outcome {
        Ok(Restoration::Restored(snapshot)) => {
            tracing::info!(snapshot = %snapshot.name(), "rollback complete");
            Ok(())
        }
        Ok(Restoration::NothingToRestore) => Ok(()),
        Err(e) => {
            tracing::error!(error = %e, "CRITICAL: rollback failed, content root may be incomplete");
            Err(e)
        }
    }
}
