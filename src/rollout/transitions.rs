// ABOUTME: State transition methods for the rollout state machine.
// ABOUTME: Each method consumes self; failures hand the previous state back for rollback.

use crate::publish;
use crate::server::{self, ServerHandle};
use crate::snapshot::Snapshot;

use super::Rollout;
use super::error::RolloutError;
use super::state::{BackedUp, Init, Published, Serving, Verified};

/// Result type for transitions that may need rollback on failure.
pub type TransitionResult<'a, T, S> = Result<Rollout<'a, T>, (Rollout<'a, S>, RolloutError)>;

/// Outcome of a successful rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restoration {
    /// The content root now matches this snapshot.
    Restored(Snapshot),
    /// There was no snapshot; the content root was left as it is.
    NothingToRestore,
}

// =============================================================================
// Internal Helpers
// =============================================================================

impl<'a, S> Rollout<'a, S> {
    fn transition<T>(self, state: T) -> Rollout<'a, T> {
        Rollout {
            ctx: self.ctx,
            snapshot: self.snapshot,
            state,
        }
    }

    /// Restore the snapshot taken at backup time, if any.
    fn restore_snapshot(self) -> Result<Restoration, RolloutError> {
        let root = self.ctx.content_root();
        match self.snapshot {
            Some(snapshot) => {
                tracing::info!(snapshot = %snapshot.name(), "rolling back");
                self.ctx
                    .store()
                    .restore(&snapshot, root)
                    .map_err(RolloutError::RestoreFailed)?;
                Ok(Restoration::Restored(snapshot))
            }
            None => {
                tracing::warn!(
                    root = %root.display(),
                    "no snapshot to roll back to, leaving content root unchanged"
                );
                Ok(Restoration::NothingToRestore)
            }
        }
    }
}

// =============================================================================
// Init -> BackedUp
// =============================================================================

impl<'a> Rollout<'a, Init> {
    /// Capture the current content root.
    ///
    /// # Errors
    ///
    /// Returns `RolloutError::BackupFailed` when the capture fails. This is
    /// fatal: nothing has been modified yet and there is nothing to restore.
    #[must_use = "rollout state must be used"]
    pub fn backup(self) -> Result<Rollout<'a, BackedUp>, RolloutError> {
        tracing::info!(root = %self.content_root().display(), "creating snapshot");
        let snapshot = self
            .ctx
            .store()
            .capture(self.ctx.content_root())
            .map_err(RolloutError::BackupFailed)?;

        Ok(Rollout {
            ctx: self.ctx,
            snapshot,
            state: BackedUp,
        })
    }
}

// =============================================================================
// BackedUp -> Published
// =============================================================================

impl<'a> Rollout<'a, BackedUp> {
    /// Copy the source tree into the content root.
    ///
    /// # Errors
    ///
    /// Returns `RolloutError::PublishFailed` with the number of entries
    /// already copied. The content root may be half updated.
    #[must_use = "rollout state must be used"]
    pub fn publish(self) -> TransitionResult<'a, Published, BackedUp> {
        tracing::info!(
            source = %self.ctx.source_dir().display(),
            root = %self.content_root().display(),
            "publishing content"
        );
        match publish::publish(
            self.ctx.source_dir(),
            self.ctx.content_root(),
            self.ctx.exclude(),
        ) {
            Ok(count) => Ok(self.transition(Published { count })),
            Err(e) => Err((self, e.into())),
        }
    }

    /// Restore the snapshot, if one was taken.
    ///
    /// # Errors
    ///
    /// Returns `RolloutError::RestoreFailed`, which is unrecoverable.
    pub fn rollback(self) -> Result<Restoration, RolloutError> {
        self.restore_snapshot()
    }
}

// =============================================================================
// Published -> Serving
// =============================================================================

impl<'a> Rollout<'a, Published> {
    /// Start the static server over the content root.
    ///
    /// # Errors
    ///
    /// Returns `RolloutError::Bind` when the port is taken or cannot be bound.
    #[must_use = "rollout state must be used"]
    pub async fn serve(self) -> TransitionResult<'a, Serving, Published> {
        let server_config = &self.ctx.config().server;
        let started = server::start(
            &server_config.host,
            server_config.port,
            self.ctx.content_root(),
            self.ctx.headers().clone(),
        )
        .await;

        match started {
            Ok(server) => {
                let count = self.state.count;
                Ok(self.transition(Serving { count, server }))
            }
            Err(e) => Err((self, e.into())),
        }
    }

    /// Restore the snapshot. No server is running yet.
    ///
    /// # Errors
    ///
    /// Returns `RolloutError::RestoreFailed`, which is unrecoverable.
    pub fn rollback(self) -> Result<Restoration, RolloutError> {
        self.restore_snapshot()
    }
}

// =============================================================================
// Serving -> Verified
// =============================================================================

impl<'a> Rollout<'a, Serving> {
    /// Poll the health endpoint until it answers 200 or attempts run out.
    ///
    /// # Errors
    ///
    /// Returns `RolloutError::VerificationFailed`; the server is still running
    /// in the returned state.
    #[must_use = "rollout state must be used"]
    pub async fn verify(self) -> TransitionResult<'a, Verified, Serving> {
        let url = self.ctx.health_url();
        let verdict = self.ctx.verifier().verify(&url).await;

        if !verdict.passed {
            let err = RolloutError::VerificationFailed {
                url,
                attempts: verdict.attempts,
            };
            return Err((self, err));
        }

        let Serving { count, server } = self.state;
        Ok(Rollout {
            ctx: self.ctx,
            snapshot: self.snapshot,
            state: Verified {
                count,
                server,
                attempts: verdict.attempts,
            },
        })
    }

    /// Stop the server, then restore the snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RolloutError::RestoreFailed`, which is unrecoverable.
    pub async fn rollback(self) -> Result<Restoration, RolloutError> {
        let Rollout {
            ctx,
            snapshot,
            state,
        } = self;
        state.server.stop().await;

        Rollout {
            ctx,
            snapshot,
            state: (),
        }
        .restore_snapshot()
    }
}

// =============================================================================
// Verified -> committed
// =============================================================================

impl Rollout<'_, Verified> {
    /// Finish the rollout, handing over the live server.
    ///
    /// The snapshot is kept in the backups directory.
    pub fn commit(self) -> ServerHandle {
        tracing::info!(
            published = self.state.count,
            attempts = self.state.attempts,
            addr = %self.state.server.local_addr(),
            "rollout committed"
        );
        self.state.server
    }
}
