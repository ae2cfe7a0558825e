// ABOUTME: Rollout state marker types for the type state pattern.
// ABOUTME: Each state carries what the next transition or a rollback needs.

use crate::server::ServerHandle;

/// Nothing touched yet.
/// Available actions: `backup()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Init;

/// Current content captured (or found empty).
/// Available actions: `publish()`, `rollback()`
#[derive(Debug, Clone, Copy, Default)]
pub struct BackedUp;

/// New content copied into the content root.
/// Available actions: `serve()`, `rollback()`
#[derive(Debug, Clone, Copy)]
pub struct Published {
    pub(crate) count: usize,
}

impl Published {
    pub fn count(&self) -> usize {
        self.count
    }
}

/// Server running over the new content.
/// Available actions: `verify()`, `rollback()`
#[derive(Debug)]
pub struct Serving {
    pub(crate) count: usize,
    pub(crate) server: ServerHandle,
}

/// Health check passed.
/// Available actions: `commit()`
#[derive(Debug)]
pub struct Verified {
    pub(crate) count: usize,
    pub(crate) server: ServerHandle,
    pub(crate) attempts: u32,
}
