// ABOUTME: Snapshot directory names derived from the capture timestamp.
// ABOUTME: Format is backup_YYYYMMDD_HHMMSS with an optional _N collision suffix.

use chrono::{NaiveDateTime, Timelike, Utc};
use std::fmt;
use thiserror::Error;

const PREFIX: &str = "backup_";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TIMESTAMP_LEN: usize = 15;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotIdError {
    #[error("snapshot name must start with 'backup_': {0}")]
    MissingPrefix(String),

    #[error("invalid snapshot timestamp in {0}")]
    InvalidTimestamp(String),

    #[error("invalid snapshot sequence suffix in {0}")]
    InvalidSequence(String),
}

/// Identifies a snapshot by its capture time (second resolution).
///
/// Two captures within the same second are told apart by `seq`, which is
/// zero for the first and rendered as a `_N` suffix otherwise. Ordering is
/// chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SnapshotId {
    taken_at: NaiveDateTime,
    seq: u32,
}

impl SnapshotId {
    /// Identifier for a capture taken now, in UTC so names stay ordered
    /// across daylight-saving changes.
    pub fn now() -> Self {
        Self::at(Utc::now().naive_utc())
    }

    pub fn at(taken_at: NaiveDateTime) -> Self {
        Self {
            taken_at: taken_at.with_nanosecond(0).unwrap_or(taken_at),
            seq: 0,
        }
    }

    /// Same timestamp with a different collision suffix.
    pub fn with_seq(self, seq: u32) -> Self {
        Self { seq, ..self }
    }

    pub fn parse(name: &str) -> Result<Self, SnapshotIdError> {
        let rest = name
            .strip_prefix(PREFIX)
            .ok_or_else(|| SnapshotIdError::MissingPrefix(name.to_string()))?;

        let (stamp, suffix) = match rest.get(..TIMESTAMP_LEN) {
            Some(stamp) => (stamp, &rest[TIMESTAMP_LEN..]),
            None => return Err(SnapshotIdError::InvalidTimestamp(name.to_string())),
        };

        let taken_at = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT)
            .map_err(|_| SnapshotIdError::InvalidTimestamp(name.to_string()))?;

        let seq = if suffix.is_empty() {
            0
        } else {
            suffix
                .strip_prefix('_')
                .and_then(|n| n.parse::<u32>().ok())
                .filter(|n| *n > 0)
                .ok_or_else(|| SnapshotIdError::InvalidSequence(name.to_string()))?
        };

        Ok(Self { taken_at, seq })
    }

    pub fn taken_at(&self) -> NaiveDateTime {
        self.taken_at
    }

    pub fn seq(&self) -> u32 {
        self.seq
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}", self.taken_at.format(TIMESTAMP_FORMAT))?;
        if self.seq > 0 {
            write!(f, "_{}", self.seq)?;
        }
        Ok(())
    }
}
