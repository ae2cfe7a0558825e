// ABOUTME: Command module aggregator for the webroll CLI.
// ABOUTME: Re-exports the deploy, rollback, snapshots and links command handlers.

mod deploy;
mod links;
mod rollback;

pub use deploy::deploy;
pub use links::links;
pub use rollback::{list_snapshots, rollback};
