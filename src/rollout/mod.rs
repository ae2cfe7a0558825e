// ABOUTME: Rollout orchestration using the type state pattern.
// ABOUTME: Exports state markers, the Rollout struct, the controller and manual rollback.

mod context;
mod controller;
mod error;
mod manual;
#[allow(clippy::module_inception)]
mod rollout;
mod state;
mod transitions;

pub use context::RolloutContext;
pub use controller::{RolloutResult, run_rollout};
pub use error::RolloutError;
pub use manual::manual_rollback;
pub use rollout::Rollout;
pub use state::{BackedUp, Init, Published, Serving, Verified};
pub use transitions::{Restoration, TransitionResult};
