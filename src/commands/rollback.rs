// ABOUTME: Rollback and snapshot listing commands.
// ABOUTME: Restores a stored snapshot without serving, or prints what is stored.

use webroll::config::Config;
use webroll::error::Result;
use webroll::rollout::{RolloutContext, manual_rollback};
use webroll::snapshot::SnapshotStore;

/// Restore `snapshot`, or the newest snapshot, into the content root.
pub fn rollback(config: Config, snapshot: Option<&str>) -> Result<()> {
    let ctx = RolloutContext::new(config)?;
    let restored = manual_rollback(&ctx, snapshot)?;

    println!(
        "Restored {} into {}",
        restored.name(),
        ctx.content_root().display()
    );
    Ok(())
}

pub fn list_snapshots(config: &Config) -> Result<()> {
    let store = SnapshotStore::new(&config.deploy.backup_dir);
    let snapshots = store.list()?;

    if snapshots.is_empty() {
        println!("No snapshots in {}", store.backup_dir().display());
        return Ok(());
    }

    for snapshot in &snapshots {
        println!(
            "{}  {} UTC",
            snapshot.name(),
            snapshot.id().taken_at().format("%Y-%m-%d %H:%M:%S")
        );
    }
    Ok(())
}
