// ABOUTME: Generic rollout struct parameterized by state marker.
// ABOUTME: Holds the shared context and the snapshot taken before publishing.

use std::path::Path;

use crate::snapshot::Snapshot;

use super::context::RolloutContext;
use super::state::{Init, Published, Serving, Verified};

/// A rollout in progress, parameterized by its current state.
///
/// The snapshot is `None` when the content root was empty at backup time;
/// rolling back from such a rollout leaves the new content in place.
#[derive(Debug)]
pub struct Rollout<'a, S> {
    pub(crate) ctx: &'a RolloutContext,
    pub(crate) snapshot: Option<Snapshot>,
    pub(crate) state: S,
}

impl<'a> Rollout<'a, Init> {
    pub fn new(ctx: &'a RolloutContext) -> Self {
        Rollout {
            ctx,
            snapshot: None,
            state: Init,
        }
    }
}

impl<S> Rollout<'_, S> {
    pub fn content_root(&self) -> &Path {
        self.ctx.content_root()
    }

    /// Snapshot taken at backup time, if the content root had anything in it.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }
}

impl Rollout<'_, Published> {
    /// Number of top-level entries copied.
    pub fn published(&self) -> usize {
        self.state.count()
    }
}

impl Rollout<'_, Serving> {
    pub fn published(&self) -> usize {
        self.state.count
    }

    pub fn local_addr(&self) -> std::net::SocketAddr {
        self.state.server.local_addr()
    }
}

impl Rollout<'_, Verified> {
    pub fn published(&self) -> usize {
        self.state.count
    }

    /// Health check requests issued before the server answered 200.
    pub fn attempts(&self) -> u32 {
        self.state.attempts
    }
}
