// ABOUTME: Validated domain types shared across the rollout stages.
// ABOUTME: Ports are checked at parse time; snapshot names carry their timestamp.

mod port;
mod snapshot_id;

pub use port::{Port, PortError};
pub use snapshot_id::{SnapshotId, SnapshotIdError};
